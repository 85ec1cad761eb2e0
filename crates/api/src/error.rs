//! Server Errors

use dataset::InputFormatError;
use thiserror::Error;

/// Failures that stop the server before or while serving
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Dataset could not be read: {0}")]
    Input(#[from] InputFormatError),

    #[error("Invalid classifier settings: {0}")]
    Classifier(#[from] dataset::ClassifierError),

    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("Invalid log level {level:?}: {reason}")]
    LogLevel { level: String, reason: String },

    #[error("Logging setup failed: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
