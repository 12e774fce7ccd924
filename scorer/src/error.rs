//! Scorer error types

use shared::SharedError;
use thiserror::Error;

/// Result type for scorer setup operations
pub type ScorerResult<T> = Result<T, ScorerError>;

/// Scorer error types
///
/// Scoring itself never fails; these cover configuration and client setup.
#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("HTTP client error: {message}")]
    HttpClientError { message: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),
}

impl ScorerError {
    pub fn config(message: impl Into<String>) -> Self {
        ScorerError::ConfigError { message: message.into() }
    }
}
