//! Schema Normalization
//!
//! Reads raw air-quality tables from heterogeneous sources and maps their
//! variant column names onto the canonical [`Measurement`] shape. Rows that
//! fail required-field validation are dropped and reported, never raised.

mod alias;
mod error;
mod measurement;
mod normalizer;
mod source;
mod validator;

pub use alias::{canonical_header, CanonicalField, ColumnMap};
pub use error::{InputFormatError, ValidationError};
pub use measurement::{pollutant_key, Measurement, UNKNOWN, UNKNOWN_SOURCE};
pub use normalizer::{parse_timestamp, NormalizedBatch, Normalizer, SkippedRow};
pub use source::{CsvSource, DataSource, JsonSource, RawTable};
pub use validator::{ValidationConfig, Validator};
