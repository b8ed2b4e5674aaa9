//! Mock aggregator for testing.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::aggregator::{AggregationJob, AggregationResult, Aggregator, AggregatorError};
use crate::placer::dir_size;

/// A recorded aggregation job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedAggregation {
    /// The job that was submitted.
    pub job: AggregationJob,
    /// Whether the aggregation succeeded.
    pub success: bool,
}

/// What the mock writes into the staging directory on success.
#[derive(Debug, Clone)]
pub enum MockAggregatorBehavior {
    /// Copy the input directory into staging unchanged.
    CopyInput,
    /// Write a fixed set of files.
    EmitFiles(Vec<(String, Vec<u8>)>),
}

/// Mock implementation of the Aggregator trait.
///
/// Writes real files into the staging directory so promotion can be tested
/// end to end. A configured error can be combined with partial files to
/// simulate an aggregation that dies midway.
#[derive(Debug, Clone)]
pub struct MockAggregator {
    aggregations: Arc<RwLock<Vec<RecordedAggregation>>>,
    next_error: Arc<RwLock<Option<AggregatorError>>>,
    behavior: Arc<RwLock<MockAggregatorBehavior>>,
    partial_files: Arc<RwLock<Vec<(String, Vec<u8>)>>>,
    aggregation_duration: Arc<RwLock<Duration>>,
}

impl Default for MockAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAggregator {
    /// Create a new mock aggregator that copies its input.
    pub fn new() -> Self {
        Self {
            aggregations: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            behavior: Arc::new(RwLock::new(MockAggregatorBehavior::CopyInput)),
            partial_files: Arc::new(RwLock::new(Vec::new())),
            aggregation_duration: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    /// Get all recorded aggregations.
    pub async fn recorded_aggregations(&self) -> Vec<RecordedAggregation> {
        self.aggregations.read().await.clone()
    }

    /// Get the number of aggregations performed.
    pub async fn aggregation_count(&self) -> usize {
        self.aggregations.read().await.len()
    }

    /// Set what the mock writes on success.
    pub async fn set_behavior(&self, behavior: MockAggregatorBehavior) {
        *self.behavior.write().await = behavior;
    }

    /// Configure the next aggregation to fail with the given error.
    pub async fn set_next_error(&self, error: AggregatorError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set files written to staging before a configured failure, simulating
    /// an aggregation interrupted midway.
    pub async fn set_partial_files_on_failure(&self, files: Vec<(String, Vec<u8>)>) {
        *self.partial_files.write().await = files;
    }

    /// Set a simulated aggregation duration.
    pub async fn set_aggregation_duration(&self, duration: Duration) {
        *self.aggregation_duration.write().await = duration;
    }

    async fn take_error(&self) -> Option<AggregatorError> {
        self.next_error.write().await.take()
    }

    fn copy_tree(source: &Path, destination: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(destination)?;
        for entry in std::fs::read_dir(source)? {
            let entry = entry?;
            let dest = destination.join(entry.file_name());
            if entry.file_type()?.is_dir() {
                Self::copy_tree(&entry.path(), &dest)?;
            } else {
                std::fs::copy(entry.path(), &dest)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Aggregator for MockAggregator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn aggregate(&self, job: AggregationJob) -> Result<AggregationResult, AggregatorError> {
        let duration = *self.aggregation_duration.read().await;
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }

        if let Some(err) = self.take_error().await {
            for (name, content) in self.partial_files.read().await.iter() {
                tokio::fs::write(job.staging_dir.join(name), content).await?;
            }
            self.aggregations.write().await.push(RecordedAggregation {
                job,
                success: false,
            });
            return Err(err);
        }

        match &*self.behavior.read().await {
            MockAggregatorBehavior::CopyInput => {
                Self::copy_tree(&job.input_dir, &job.staging_dir)?;
            }
            MockAggregatorBehavior::EmitFiles(files) => {
                for (name, content) in files {
                    tokio::fs::write(job.staging_dir.join(name), content).await?;
                }
            }
        }

        let output_bytes = dir_size(&job.staging_dir).await?;

        self.aggregations.write().await.push(RecordedAggregation {
            job: job.clone(),
            success: true,
        });

        Ok(AggregationResult {
            collection_id: job.collection_id,
            staging_dir: job.staging_dir,
            output_bytes,
            duration_ms: duration.as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), AggregatorError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionId;
    use tempfile::TempDir;

    fn job(input: &Path, staging: &Path) -> AggregationJob {
        AggregationJob {
            collection_id: CollectionId::new("col1").unwrap(),
            input_dir: input.to_path_buf(),
            staging_dir: staging.to_path_buf(),
        }
    }

    #[tokio::test]
    async fn test_copy_input_behavior() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input");
        let staging = temp.path().join("staging");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::create_dir_all(&staging).unwrap();
        std::fs::write(input.join("a.txt"), "content").unwrap();

        let aggregator = MockAggregator::new();
        let result = aggregator.aggregate(job(&input, &staging)).await.unwrap();

        assert_eq!(std::fs::read(staging.join("a.txt")).unwrap(), b"content");
        assert_eq!(result.output_bytes, "content".len() as u64);
    }

    #[tokio::test]
    async fn test_emit_files_behavior() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        std::fs::create_dir_all(&staging).unwrap();

        let aggregator = MockAggregator::new();
        aggregator
            .set_behavior(MockAggregatorBehavior::EmitFiles(vec![(
                "summary.xml".to_string(),
                b"<xml/>".to_vec(),
            )]))
            .await;

        aggregator
            .aggregate(job(&temp.path().join("input"), &staging))
            .await
            .unwrap();

        assert!(staging.join("summary.xml").exists());
    }

    #[tokio::test]
    async fn test_failure_writes_partial_files() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        std::fs::create_dir_all(&staging).unwrap();

        let aggregator = MockAggregator::new();
        aggregator
            .set_next_error(AggregatorError::aggregation_failed("died midway", None))
            .await;
        aggregator
            .set_partial_files_on_failure(vec![("partial.txt".to_string(), b"half".to_vec())])
            .await;

        let result = aggregator
            .aggregate(job(&temp.path().join("input"), &staging))
            .await;

        assert!(result.is_err());
        assert!(staging.join("partial.txt").exists());

        let recorded = aggregator.recorded_aggregations().await;
        assert_eq!(recorded.len(), 1);
        assert!(!recorded[0].success);
    }
}
