//! Enriched Dataset
//!
//! Runs the load pipeline (read, normalize, partition, classify) once and
//! holds the result as an immutable snapshot. Summary statistics and filter
//! vocabularies are derived at load time; queries borrow from the snapshot.

mod aggregate;
mod dataset;
mod query;

pub use aggregate::{BreakdownRow, FilterOptions, SummaryStats};
pub use dataset::{EnrichedDataset, LoadReport};
pub use query::{query, QueryFilter, Selector};

pub use outlier_engine::{
    ClassifierConfig, ClassifierError, EnrichedMeasurement, GroupBounds, IqrBounds, IqrClassifier,
};
pub use schema_normalizer::{
    CsvSource, DataSource, InputFormatError, JsonSource, Measurement, Normalizer, RawTable,
    SkippedRow, ValidationConfig, ValidationError, Validator, UNKNOWN,
};
