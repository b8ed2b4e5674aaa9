//! Error types for the aggregator module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during aggregation.
#[derive(Debug, Error)]
pub enum AggregatorError {
    /// Aggregation command not found.
    #[error("Aggregation command not found: {path}")]
    CommandNotFound { path: PathBuf },

    /// Aggregation process failed.
    #[error("Aggregation failed: {reason}")]
    AggregationFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Aggregation timed out.
    #[error("Aggregation timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AggregatorError {
    /// Creates an aggregation failed error with captured stderr.
    pub fn aggregation_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::AggregationFailed {
            reason: reason.into(),
            stderr,
        }
    }
}
