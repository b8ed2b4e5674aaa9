//! Error types for the pipeline module.

use std::path::PathBuf;
use thiserror::Error;

use crate::aggregator::AggregatorError;
use crate::placer::PlacerError;
use crate::retriever::RetrieverError;

/// Errors that can occur during a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No stage was selected.
    #[error("No stages selected, pick at least one of retrieve, aggregate, clean")]
    NoStagesSelected,

    /// Another run holds the collection's lease.
    #[error("Another run is already active for collection '{collection_id}'")]
    CollectionBusy { collection_id: String },

    /// Aggregate was requested but the collection's input directory is
    /// absent.
    #[error("Input directory for collection '{collection_id}' not found: {path}")]
    InputMissing {
        collection_id: String,
        path: PathBuf,
    },

    /// Retrieve stage failed.
    #[error("Retrieve stage failed: {0}")]
    RetrievalFailed(#[from] RetrieverError),

    /// Aggregate stage failed; staging is left in place for inspection.
    #[error("Aggregate stage failed: {0}")]
    AggregationFailed(#[from] AggregatorError),

    /// Promotion of the staged output failed.
    #[error("Promotion failed: {0}")]
    PromotionFailed(#[from] PlacerError),

    /// Could not prepare the staging directory.
    #[error("Failed to prepare staging directory: {path}")]
    StagingSetupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Clean stage could not remove a directory.
    #[error("Clean stage failed for {path}")]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
