//! Command-based retriever implementation.

use async_trait::async_trait;
use std::time::Instant;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

use crate::process::run_with_timeout;

use super::config::RetrieverConfig;
use super::error::RetrieverError;
use super::traits::Retriever;
use super::types::{RetrievalJob, RetrievalResult};

/// Retriever that delegates to an external command.
pub struct CommandRetriever {
    config: RetrieverConfig,
}

impl CommandRetriever {
    /// Creates a new command retriever with the given configuration.
    pub fn new(config: RetrieverConfig) -> Self {
        Self { config }
    }

    /// Creates a retriever with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RetrieverConfig::default())
    }

    /// Builds the argument list for a retrieval job.
    fn build_args(&self, job: &RetrievalJob) -> Vec<String> {
        let mut args = self.config.extra_args.clone();
        args.push(job.collection_id.as_str().to_string());
        args.push(job.target_dir.to_string_lossy().to_string());
        args
    }
}

#[async_trait]
impl Retriever for CommandRetriever {
    fn name(&self) -> &str {
        "command"
    }

    async fn retrieve(&self, job: RetrievalJob) -> Result<RetrievalResult, RetrieverError> {
        let start = Instant::now();

        // The external command may assume its target directory exists.
        fs::create_dir_all(&job.target_dir).await?;

        let args = self.build_args(&job);
        debug!(
            command = %self.config.command.display(),
            ?args,
            "Invoking retrieval command"
        );

        let mut command = Command::new(&self.config.command);
        command
            .args(&args)
            .env("AGGREGATOR_COLLECTION_ID", job.collection_id.as_str())
            .env("AGGREGATOR_TARGET_DIR", &job.target_dir);

        let completed = run_with_timeout(command, self.config.timeout_secs)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RetrieverError::CommandNotFound {
                        path: self.config.command.clone(),
                    }
                } else {
                    RetrieverError::Io(e)
                }
            })?
            .ok_or(RetrieverError::Timeout {
                timeout_secs: self.config.timeout_secs,
            })?;

        if !completed.status.success() {
            return Err(RetrieverError::retrieval_failed(
                format!(
                    "retrieval command exited with code: {:?}",
                    completed.status.code()
                ),
                if completed.stderr.is_empty() {
                    None
                } else {
                    Some(completed.stderr)
                },
            ));
        }

        Ok(RetrievalResult {
            collection_id: job.collection_id,
            target_dir: job.target_dir,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), RetrieverError> {
        // A bare command name is resolved through PATH at spawn time, only an
        // explicit path can be checked up front.
        if self.config.command.components().count() > 1 && !self.config.command.exists() {
            return Err(RetrieverError::CommandNotFound {
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

    fn job(target: &str) -> RetrievalJob {
        RetrievalJob {
            collection_id: CollectionId::new("col1").unwrap(),
            target_dir: PathBuf::from(target),
        }
    }

    #[test]
    fn test_build_args_order() {
        let retriever = CommandRetriever::new(
            RetrieverConfig::with_command("fetch").with_extra_args(vec!["--quiet".to_string()]),
        );
        let args = retriever.build_args(&job("/data/input/col1"));
        assert_eq!(args, vec!["--quiet", "col1", "/data/input/col1"]);
    }

    #[tokio::test]
    async fn test_validate_missing_explicit_path() {
        let retriever =
            CommandRetriever::new(RetrieverConfig::with_command("/nonexistent/bin/fetch"));
        let result = retriever.validate().await;
        assert!(matches!(
            result,
            Err(RetrieverError::CommandNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_validate_bare_command_name() {
        let retriever = CommandRetriever::new(RetrieverConfig::with_command("some-command"));
        assert!(retriever.validate().await.is_ok());
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use tempfile::TempDir;

        #[tokio::test]
        async fn test_retrieve_populates_target_dir() {
            let temp = TempDir::new().unwrap();
            let target = temp.path().join("input").join("col1");

            // Invoked as: sh -c '<script>' sh <collection_id> <target_dir>,
            // so $1 is the collection id and $2 the target directory.
            let config = RetrieverConfig::with_command("/bin/sh").with_extra_args(vec![
                "-c".to_string(),
                r#"echo "retrieved $1" > "$2"/marker"#.to_string(),
                "sh".to_string(),
            ]);
            let retriever = CommandRetriever::new(config);

            let result = retriever
                .retrieve(RetrievalJob {
                    collection_id: CollectionId::new("col1").unwrap(),
                    target_dir: target.clone(),
                })
                .await
                .unwrap();

            assert_eq!(result.target_dir, target);
            let marker = std::fs::read_to_string(target.join("marker")).unwrap();
            assert_eq!(marker.trim(), "retrieved col1");
        }

        #[tokio::test]
        async fn test_retrieve_nonzero_exit_is_fatal() {
            let temp = TempDir::new().unwrap();
            let config = RetrieverConfig::with_command("/bin/sh").with_extra_args(vec![
                "-c".to_string(),
                "echo no such collection >&2; exit 2".to_string(),
                "sh".to_string(),
            ]);
            let retriever = CommandRetriever::new(config);

            let result = retriever
                .retrieve(RetrievalJob {
                    collection_id: CollectionId::new("col1").unwrap(),
                    target_dir: temp.path().join("col1"),
                })
                .await;

            match result {
                Err(RetrieverError::RetrievalFailed { stderr, .. }) => {
                    assert!(stderr.unwrap().contains("no such collection"));
                }
                other => panic!("expected RetrievalFailed, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_retrieve_timeout() {
            let temp = TempDir::new().unwrap();
            let config = RetrieverConfig::with_command("/bin/sh")
                .with_extra_args(vec!["-c".to_string(), "sleep 10".to_string(), "sh".to_string()])
                .with_timeout(1);
            let retriever = CommandRetriever::new(config);

            let result = retriever
                .retrieve(RetrievalJob {
                    collection_id: CollectionId::new("col1").unwrap(),
                    target_dir: temp.path().join("col1"),
                })
                .await;
            assert!(matches!(result, Err(RetrieverError::Timeout { .. })));
        }
    }
}
