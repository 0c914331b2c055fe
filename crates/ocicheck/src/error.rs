//! Error types for conformance runs.
//!
//! Rule violations are never errors; they are reported as
//! [`Outcome::Fail`](crate::outcome::Outcome::Fail). These variants cover the
//! operational edges around the rule engine.

use thiserror::Error;

/// Result type alias for checker operations.
pub type Result<T> = std::result::Result<T, CheckError>;

/// Errors that can occur outside of rule evaluation.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Settings could not be assembled from files and environment.
    #[error("settings error: {0}")]
    Settings(#[from] Box<figment::Error>),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CheckError {
    fn from(err: figment::Error) -> Self {
        Self::Settings(Box::new(err))
    }
}
