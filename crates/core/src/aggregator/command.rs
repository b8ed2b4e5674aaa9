//! Command-based aggregator implementation.

use async_trait::async_trait;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

use crate::placer::dir_size;
use crate::process::run_with_timeout;

use super::config::AggregatorConfig;
use super::error::AggregatorError;
use super::traits::Aggregator;
use super::types::{AggregationJob, AggregationResult};

/// Aggregator that delegates to an external command.
pub struct CommandAggregator {
    config: AggregatorConfig,
}

impl CommandAggregator {
    /// Creates a new command aggregator with the given configuration.
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Creates an aggregator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(AggregatorConfig::default())
    }

    /// Builds the argument list for an aggregation job.
    fn build_args(&self, job: &AggregationJob) -> Vec<String> {
        let mut args = self.config.extra_args.clone();
        args.push(job.collection_id.as_str().to_string());
        args.push(job.input_dir.to_string_lossy().to_string());
        args.push(job.staging_dir.to_string_lossy().to_string());
        args
    }
}

#[async_trait]
impl Aggregator for CommandAggregator {
    fn name(&self) -> &str {
        "command"
    }

    async fn aggregate(&self, job: AggregationJob) -> Result<AggregationResult, AggregatorError> {
        let start = Instant::now();

        let args = self.build_args(&job);
        debug!(
            command = %self.config.command.display(),
            ?args,
            "Invoking aggregation command"
        );

        let mut command = Command::new(&self.config.command);
        command
            .args(&args)
            .env("AGGREGATOR_COLLECTION_ID", job.collection_id.as_str())
            .env("AGGREGATOR_INPUT_DIR", &job.input_dir)
            .env("AGGREGATOR_OUTPUT_DIR", &job.staging_dir);

        let completed = run_with_timeout(command, self.config.timeout_secs)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AggregatorError::CommandNotFound {
                        path: self.config.command.clone(),
                    }
                } else {
                    AggregatorError::Io(e)
                }
            })?
            .ok_or(AggregatorError::Timeout {
                timeout_secs: self.config.timeout_secs,
            })?;

        if !completed.status.success() {
            return Err(AggregatorError::aggregation_failed(
                format!(
                    "aggregation command exited with code: {:?}",
                    completed.status.code()
                ),
                if completed.stderr.is_empty() {
                    None
                } else {
                    Some(completed.stderr)
                },
            ));
        }

        let output_bytes = dir_size(&job.staging_dir).await?;

        Ok(AggregationResult {
            collection_id: job.collection_id,
            staging_dir: job.staging_dir,
            output_bytes,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), AggregatorError> {
        if self.config.command.components().count() > 1 && !self.config.command.exists() {
            return Err(AggregatorError::CommandNotFound {
                path: self.config.command.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionId;
    use std::path::PathBuf;

    fn job() -> AggregationJob {
        AggregationJob {
            collection_id: CollectionId::new("col1").unwrap(),
            input_dir: PathBuf::from("/data/input/col1"),
            staging_dir: PathBuf::from("/data/temp/col1"),
        }
    }

    #[test]
    fn test_build_args_order() {
        let aggregator = CommandAggregator::new(
            AggregatorConfig::with_command("aggregate")
                .with_extra_args(vec!["--pretty".to_string()]),
        );
        let args = aggregator.build_args(&job());
        assert_eq!(
            args,
            vec!["--pretty", "col1", "/data/input/col1", "/data/temp/col1"]
        );
    }

    #[tokio::test]
    async fn test_validate_missing_explicit_path() {
        let aggregator =
            CommandAggregator::new(AggregatorConfig::with_command("/nonexistent/bin/aggregate"));
        let result = aggregator.validate().await;
        assert!(matches!(
            result,
            Err(AggregatorError::CommandNotFound { .. })
        ));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use tempfile::TempDir;

        fn sh_aggregator(script: &str) -> CommandAggregator {
            CommandAggregator::new(AggregatorConfig::with_command("/bin/sh").with_extra_args(
                vec!["-c".to_string(), script.to_string(), "sh".to_string()],
            ))
        }

        // Invoked as: sh -c '<script>' sh <collection_id> <input> <staging>,
        // so $1/$2/$3 are collection id, input dir and staging dir.

        #[tokio::test]
        async fn test_aggregate_copy_through() {
            let temp = TempDir::new().unwrap();
            let input = temp.path().join("input");
            let staging = temp.path().join("staging");
            std::fs::create_dir_all(&input).unwrap();
            std::fs::create_dir_all(&staging).unwrap();
            std::fs::write(input.join("a.txt"), "content").unwrap();

            let aggregator = sh_aggregator(r#"cp -r "$2"/. "$3"/"#);
            let result = aggregator
                .aggregate(AggregationJob {
                    collection_id: CollectionId::new("col1").unwrap(),
                    input_dir: input,
                    staging_dir: staging.clone(),
                })
                .await
                .unwrap();

            assert!(staging.join("a.txt").exists());
            assert_eq!(result.output_bytes, "content".len() as u64);
        }

        #[tokio::test]
        async fn test_aggregate_failure_carries_stderr() {
            let temp = TempDir::new().unwrap();
            let staging = temp.path().join("staging");
            std::fs::create_dir_all(&staging).unwrap();

            let aggregator = sh_aggregator("echo malformed record >&2; exit 1");
            let result = aggregator
                .aggregate(AggregationJob {
                    collection_id: CollectionId::new("col1").unwrap(),
                    input_dir: temp.path().join("input"),
                    staging_dir: staging,
                })
                .await;

            match result {
                Err(AggregatorError::AggregationFailed { stderr, .. }) => {
                    assert!(stderr.unwrap().contains("malformed record"));
                }
                other => panic!("expected AggregationFailed, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_aggregate_timeout() {
            let temp = TempDir::new().unwrap();
            let staging = temp.path().join("staging");
            std::fs::create_dir_all(&staging).unwrap();

            let aggregator = CommandAggregator::new(
                AggregatorConfig::with_command("/bin/sh")
                    .with_extra_args(vec![
                        "-c".to_string(),
                        "sleep 10".to_string(),
                        "sh".to_string(),
                    ])
                    .with_timeout(1),
            );
            let result = aggregator
                .aggregate(AggregationJob {
                    collection_id: CollectionId::new("col1").unwrap(),
                    input_dir: temp.path().join("input"),
                    staging_dir: staging,
                })
                .await;
            assert!(matches!(result, Err(AggregatorError::Timeout { .. })));
        }
    }
}
