//! Classifier Error Types

use thiserror::Error;

/// Errors constructing a classifier
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    /// Configuration value rejected
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}
