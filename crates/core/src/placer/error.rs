//! Error types for the placer module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during promotion.
#[derive(Debug, Error)]
pub enum PlacerError {
    /// Staging directory not found.
    #[error("Staging directory not found: {path}")]
    StagingMissing { path: PathBuf },

    /// Failed to displace the previous final output.
    #[error("Failed to displace previous output: {path}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move the staged output into place.
    #[error("Failed to promote {staging} to {destination}")]
    PromoteFailed {
        staging: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
