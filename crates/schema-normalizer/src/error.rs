//! Input and Validation Error Types

use thiserror::Error;

/// Fatal errors raised when the raw source cannot be read as a table
#[derive(Debug, Error)]
pub enum InputFormatError {
    /// Source could not be opened or read
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parser could not recover
    #[error("Malformed CSV input: {0}")]
    Csv(String),

    /// Input is not valid JSON
    #[error("Malformed JSON input: {0}")]
    Json(String),

    /// Input parsed but is not rows of named fields
    #[error("Input is not tabular: {0}")]
    NotTabular(String),
}

impl From<csv::Error> for InputFormatError {
    fn from(err: csv::Error) -> Self {
        InputFormatError::Csv(err.to_string())
    }
}

/// Per-row validation failures. A row carrying one of these is skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Cell could not be parsed as a number
    #[error("{field} value {raw:?} is not a number")]
    InvalidNumber { field: &'static str, raw: String },

    /// Parsed to NaN or infinity
    #[error("{field} value {value} is not finite")]
    NonFinite { field: &'static str, value: f64 },

    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
