//! Types for the placer module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::collection::CollectionId;

/// A request to promote a staged output directory to its final location.
#[derive(Debug, Clone)]
pub struct PromotionJob {
    /// Collection whose output is being promoted.
    pub collection_id: CollectionId,
    /// Staging directory holding the new output.
    pub staging_dir: PathBuf,
    /// Final output directory to replace.
    pub final_dir: PathBuf,
}

/// Result of a successful promotion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionResult {
    /// Collection whose output was promoted.
    pub collection_id: CollectionId,
    /// Final output directory now holding the new content.
    pub final_dir: PathBuf,
    /// Whether a previous final output was displaced.
    pub displaced_previous: bool,
    /// Whether the displaced backup could not be removed and remains on disk.
    pub backup_left_behind: bool,
    /// Duration in milliseconds.
    pub duration_ms: u64,
}
