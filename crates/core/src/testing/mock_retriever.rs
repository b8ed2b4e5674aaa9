//! Mock retriever for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::retriever::{RetrievalJob, RetrievalResult, Retriever, RetrieverError};

/// A recorded retrieval job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRetrieval {
    /// The job that was submitted.
    pub job: RetrievalJob,
    /// Whether the retrieval succeeded.
    pub success: bool,
}

/// Mock implementation of the Retriever trait.
///
/// Materializes a configurable set of files into the job's target directory
/// so downstream stages can operate on real input.
#[derive(Debug, Clone, Default)]
pub struct MockRetriever {
    retrievals: Arc<RwLock<Vec<RecordedRetrieval>>>,
    next_error: Arc<RwLock<Option<RetrieverError>>>,
    files: Arc<RwLock<Vec<(String, Vec<u8>)>>>,
    retrieval_duration: Arc<RwLock<Duration>>,
}

impl MockRetriever {
    /// Create a new mock retriever.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded retrievals.
    pub async fn recorded_retrievals(&self) -> Vec<RecordedRetrieval> {
        self.retrievals.read().await.clone()
    }

    /// Get the number of retrievals performed.
    pub async fn retrieval_count(&self) -> usize {
        self.retrievals.read().await.len()
    }

    /// Set the files written into the target directory on retrieval.
    pub async fn set_files(&self, files: Vec<(String, Vec<u8>)>) {
        *self.files.write().await = files;
    }

    /// Configure the next retrieval to fail with the given error.
    pub async fn set_next_error(&self, error: RetrieverError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set a simulated retrieval duration.
    pub async fn set_retrieval_duration(&self, duration: Duration) {
        *self.retrieval_duration.write().await = duration;
    }

    async fn take_error(&self) -> Option<RetrieverError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Retriever for MockRetriever {
    fn name(&self) -> &str {
        "mock"
    }

    async fn retrieve(&self, job: RetrievalJob) -> Result<RetrievalResult, RetrieverError> {
        if let Some(err) = self.take_error().await {
            self.retrievals.write().await.push(RecordedRetrieval {
                job,
                success: false,
            });
            return Err(err);
        }

        let duration = *self.retrieval_duration.read().await;
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }

        tokio::fs::create_dir_all(&job.target_dir).await?;
        for (name, content) in self.files.read().await.iter() {
            tokio::fs::write(job.target_dir.join(name), content).await?;
        }

        self.retrievals.write().await.push(RecordedRetrieval {
            job: job.clone(),
            success: true,
        });

        Ok(RetrievalResult {
            collection_id: job.collection_id,
            target_dir: job.target_dir,
            duration_ms: duration.as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), RetrieverError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(())
    }
}
