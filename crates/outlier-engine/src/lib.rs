//! Outlier Engine
//!
//! Partitions normalized measurements by pollutant and flags statistical
//! outliers in each group with the interquartile-range fence method.

mod classifier;
mod enriched;
mod error;
mod partition;
mod statistics;

pub use classifier::{ClassifierConfig, Enrichment, GroupBounds, IqrClassifier};
pub use enriched::{Classification, EnrichedMeasurement};
pub use error::ClassifierError;
pub use partition::{Group, Partition};
pub use statistics::{quantile_sorted, sorted_values, IqrBounds, ValueSummary};
