use thiserror::Error;

use crate::dispatch::messages::DispatchError;
use crate::solicitations::StoreError;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Represents configuration-related errors (e.g., invalid environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents data validation errors (e.g., a rating outside 1-5).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents solicitation lifecycle violations and lookups of unknown records.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Represents failures talking to the assistant service.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Represents failures of the dispatcher's message channel.
    #[error("Channel error: {0}")]
    Channel(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Represents malformed JSON input or output.
    #[error("JSON error: {0}")]
    Json(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("I/O error: {}", err))
    }
}
