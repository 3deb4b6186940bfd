// this_file: src/error.rs
//! Error types for the framekit library

use thiserror::Error;

/// Main error type for framekit operations
#[derive(Debug, Error)]
pub enum Error {
    /// Bytes for an image reference could not be fetched
    #[error("Fetch error for '{reference}': {reason}")]
    Fetch { reference: String, reason: String },

    /// Fetched bytes could not be decoded as an image
    #[error("Decode error for '{reference}': {reason}")]
    Decode { reference: String, reason: String },

    /// Rendered surface could not be encoded
    #[error("Encode error: {0}")]
    Encode(String),

    /// Archive could not be written or finalized
    #[error("Archive error: {0}")]
    Archive(String),

    /// Job description failed validation
    #[error("Invalid job: {reason}")]
    InvalidJob { reason: String },

    /// Invalid input parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Worker thread is gone or already served its job
    #[error("Worker closed: {0}")]
    WorkerClosed(String),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Convenience constructor for fetch failures.
    pub fn fetch(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Convenience constructor for decode failures.
    pub fn decode(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Convenience constructor for job validation failures.
    pub fn invalid_job(reason: impl Into<String>) -> Self {
        Self::InvalidJob {
            reason: reason.into(),
        }
    }
}

/// Result type alias for framekit operations
pub type Result<T> = std::result::Result<T, Error>;
