//! Error types for postlimit.

use thiserror::Error;

/// Main error type for postlimit operations.
#[derive(Error, Debug)]
pub enum PostlimitError {
    /// A unit symbol, either inside a duration string or requested as the
    /// output unit, is not in the unit table.
    #[error("unknown unit: '{0}'")]
    InvalidUnit(String),

    /// A configuration value that parsed but cannot be enforced
    #[error("{0}")]
    InvalidConfiguration(String),

    /// Activity store failures
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failures reported by moderation actions (reply, removal)
    #[error("Action error: {0}")]
    Action(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<::config::ConfigError> for PostlimitError {
    fn from(err: ::config::ConfigError) -> Self {
        PostlimitError::Config(err.to_string())
    }
}

/// Result type alias for postlimit operations.
pub type Result<T> = std::result::Result<T, PostlimitError>;
