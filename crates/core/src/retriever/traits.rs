//! Trait definitions for the retriever module.

use async_trait::async_trait;

use super::error::RetrieverError;
use super::types::{RetrievalJob, RetrievalResult};

/// A retriever that can populate a collection's input directory.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Returns the name of this retriever implementation.
    fn name(&self) -> &str;

    /// Retrieves the collection's content into the job's target directory.
    async fn retrieve(&self, job: RetrievalJob) -> Result<RetrievalResult, RetrieverError>;

    /// Validates that the retriever is properly configured and ready.
    async fn validate(&self) -> Result<(), RetrieverError>;
}
