//! Error types for the retriever module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during retrieval.
#[derive(Debug, Error)]
pub enum RetrieverError {
    /// Retrieval command not found.
    #[error("Retrieval command not found: {path}")]
    CommandNotFound { path: PathBuf },

    /// Retrieval process failed.
    #[error("Retrieval failed: {reason}")]
    RetrievalFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Retrieval timed out.
    #[error("Retrieval timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RetrieverError {
    /// Creates a retrieval failed error with captured stderr.
    pub fn retrieval_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::RetrievalFailed {
            reason: reason.into(),
            stderr,
        }
    }
}
