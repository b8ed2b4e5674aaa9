//! Types for the retriever module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::collection::CollectionId;

/// A retrieval request for one collection.
#[derive(Debug, Clone)]
pub struct RetrievalJob {
    /// Collection to retrieve.
    pub collection_id: CollectionId,
    /// Directory the retriever populates with the collection's content.
    pub target_dir: PathBuf,
}

/// Result of a successful retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Collection that was retrieved.
    pub collection_id: CollectionId,
    /// Directory now holding the retrieved content.
    pub target_dir: PathBuf,
    /// Duration in milliseconds.
    pub duration_ms: u64,
}
