//! Pipeline runner implementation.

use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use crate::aggregator::{AggregationJob, Aggregator};
use crate::collection::CollectionId;
use crate::config::StorageConfig;
use crate::placer::{FsPlacer, PromotionJob};
use crate::retriever::{RetrievalJob, Retriever};

use super::error::PipelineError;
use super::locks::CollectionLocks;
use super::types::{RunReport, StageSet};

/// The pipeline runner.
///
/// One instance serves any number of runs; runs against the same collection
/// are mutually exclusive within the process.
pub struct PipelineRunner<R: Retriever, A: Aggregator> {
    storage: StorageConfig,
    retriever: Arc<R>,
    aggregator: Arc<A>,
    placer: FsPlacer,
    locks: CollectionLocks,
}

impl<R: Retriever, A: Aggregator> PipelineRunner<R, A> {
    /// Creates a new pipeline runner over the given roots and collaborators.
    pub fn new(storage: StorageConfig, retriever: R, aggregator: A) -> Self {
        Self {
            storage,
            retriever: Arc::new(retriever),
            aggregator: Arc::new(aggregator),
            placer: FsPlacer::with_defaults(),
            locks: CollectionLocks::new(),
        }
    }

    /// Replaces the default placer.
    pub fn with_placer(mut self, placer: FsPlacer) -> Self {
        self.placer = placer;
        self
    }

    fn input_dir(&self, collection_id: &CollectionId) -> PathBuf {
        self.storage.input_root.join(collection_id.dir_name())
    }

    fn final_dir(&self, collection_id: &CollectionId) -> PathBuf {
        self.storage.output_root.join(collection_id.dir_name())
    }

    fn staging_dir(&self, collection_id: &CollectionId) -> PathBuf {
        self.storage
            .resolved_temp_root()
            .join(collection_id.dir_name())
    }

    /// Runs the selected stages for one collection.
    ///
    /// Stages execute in fixed order retrieve → aggregate → clean; a failed
    /// stage aborts the rest of the run and earlier stages are not rolled
    /// back.
    pub async fn run(
        &self,
        collection_id: &CollectionId,
        stages: StageSet,
    ) -> Result<RunReport, PipelineError> {
        if stages.is_empty() {
            return Err(PipelineError::NoStagesSelected);
        }

        let _lease =
            self.locks
                .try_acquire(collection_id)
                .ok_or_else(|| PipelineError::CollectionBusy {
                    collection_id: collection_id.to_string(),
                })?;

        let start = Instant::now();
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();
        info!(%run_id, collection = %collection_id, %stages, "Starting pipeline run");

        let mut report = RunReport {
            run_id,
            collection_id: collection_id.clone(),
            stages,
            retrieval: None,
            aggregation: None,
            promotion: None,
            warnings: Vec::new(),
            started_at,
            finished_at: started_at,
            duration_ms: 0,
        };

        if stages.retrieve {
            self.run_retrieve(collection_id, &mut report).await?;
        }
        if stages.aggregate {
            self.run_aggregate(collection_id, &mut report).await?;
        }
        if stages.clean {
            self.run_clean(collection_id, &mut report).await?;
        }

        report.finished_at = Utc::now();
        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            %run_id,
            collection = %collection_id,
            duration_ms = report.duration_ms,
            "Pipeline run completed"
        );

        Ok(report)
    }

    async fn run_retrieve(
        &self,
        collection_id: &CollectionId,
        report: &mut RunReport,
    ) -> Result<(), PipelineError> {
        let target_dir = self.input_dir(collection_id);
        info!(collection = %collection_id, target = %target_dir.display(), "Retrieve stage");

        let result = self
            .retriever
            .retrieve(RetrievalJob {
                collection_id: collection_id.clone(),
                target_dir,
            })
            .await?;

        report.retrieval = Some(result);
        Ok(())
    }

    async fn run_aggregate(
        &self,
        collection_id: &CollectionId,
        report: &mut RunReport,
    ) -> Result<(), PipelineError> {
        let input_dir = self.input_dir(collection_id);
        if !input_dir.is_dir() {
            return Err(PipelineError::InputMissing {
                collection_id: collection_id.to_string(),
                path: input_dir,
            });
        }

        let staging_dir = self.staging_dir(collection_id);
        info!(
            collection = %collection_id,
            staging = %staging_dir.display(),
            "Aggregate stage"
        );

        // Staging is always rebuilt from scratch, never resumed.
        if staging_dir.exists() {
            info!(
                staging = %staging_dir.display(),
                "Discarding stale staging directory"
            );
            fs::remove_dir_all(&staging_dir)
                .await
                .map_err(|e| PipelineError::StagingSetupFailed {
                    path: staging_dir.clone(),
                    source: e,
                })?;
        }
        fs::create_dir_all(&staging_dir)
            .await
            .map_err(|e| PipelineError::StagingSetupFailed {
                path: staging_dir.clone(),
                source: e,
            })?;

        let result = match self
            .aggregator
            .aggregate(AggregationJob {
                collection_id: collection_id.clone(),
                input_dir,
                staging_dir: staging_dir.clone(),
            })
            .await
        {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    collection = %collection_id,
                    staging = %staging_dir.display(),
                    "Aggregation failed, staging left in place for inspection"
                );
                return Err(e.into());
            }
        };
        report.aggregation = Some(result);

        let promotion = self
            .placer
            .promote(PromotionJob {
                collection_id: collection_id.clone(),
                staging_dir,
                final_dir: self.final_dir(collection_id),
            })
            .await?;
        if promotion.backup_left_behind {
            report.warnings.push(format!(
                "displaced previous output could not be removed next to {}",
                promotion.final_dir.display()
            ));
        }
        report.promotion = Some(promotion);

        Ok(())
    }

    async fn run_clean(
        &self,
        collection_id: &CollectionId,
        report: &mut RunReport,
    ) -> Result<(), PipelineError> {
        info!(collection = %collection_id, "Clean stage");

        let input_dir = self.input_dir(collection_id);
        if input_dir.exists() {
            fs::remove_dir_all(&input_dir)
                .await
                .map_err(|e| PipelineError::CleanupFailed {
                    path: input_dir.clone(),
                    source: e,
                })?;
        } else {
            let warning = format!(
                "input directory {} not found during clean",
                input_dir.display()
            );
            warn!(collection = %collection_id, "{}", warning);
            report.warnings.push(warning);
        }

        let staging_dir = self.staging_dir(collection_id);
        if staging_dir.exists() {
            fs::remove_dir_all(&staging_dir)
                .await
                .map_err(|e| PipelineError::CleanupFailed {
                    path: staging_dir.clone(),
                    source: e,
                })?;
        }

        Ok(())
    }
}
