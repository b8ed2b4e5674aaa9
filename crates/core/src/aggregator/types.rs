//! Types for the aggregator module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::collection::CollectionId;

/// An aggregation request for one collection.
#[derive(Debug, Clone)]
pub struct AggregationJob {
    /// Collection being aggregated.
    pub collection_id: CollectionId,
    /// Directory holding the collection's retrieved content.
    pub input_dir: PathBuf,
    /// Freshly created staging directory the aggregator writes into.
    pub staging_dir: PathBuf,
}

/// Result of a successful aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Collection that was aggregated.
    pub collection_id: CollectionId,
    /// Staging directory holding the produced output.
    pub staging_dir: PathBuf,
    /// Total bytes written to staging.
    pub output_bytes: u64,
    /// Duration in milliseconds.
    pub duration_ms: u64,
}
