//! Types for the pipeline module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::aggregator::AggregationResult;
use crate::collection::CollectionId;
use crate::placer::PromotionResult;
use crate::retriever::RetrievalResult;

/// Selection of pipeline stages to execute.
///
/// Stages are independent of each other; any non-empty subset is valid and
/// execution order is always retrieve → aggregate → clean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSet {
    #[serde(default)]
    pub retrieve: bool,
    #[serde(default)]
    pub aggregate: bool,
    #[serde(default)]
    pub clean: bool,
}

impl StageSet {
    /// Returns an empty selection.
    pub fn none() -> Self {
        Self::default()
    }

    /// Selects every stage.
    pub fn all() -> Self {
        Self {
            retrieve: true,
            aggregate: true,
            clean: true,
        }
    }

    /// Selects only the retrieve stage.
    pub fn retrieve() -> Self {
        Self {
            retrieve: true,
            ..Self::default()
        }
    }

    /// Selects only the aggregate stage.
    pub fn aggregate() -> Self {
        Self {
            aggregate: true,
            ..Self::default()
        }
    }

    /// Selects only the clean stage.
    pub fn clean() -> Self {
        Self {
            clean: true,
            ..Self::default()
        }
    }

    /// Returns the union of two selections.
    pub fn union(self, other: Self) -> Self {
        Self {
            retrieve: self.retrieve || other.retrieve,
            aggregate: self.aggregate || other.aggregate,
            clean: self.clean || other.clean,
        }
    }

    /// Returns true when no stage is selected.
    pub fn is_empty(&self) -> bool {
        !self.retrieve && !self.aggregate && !self.clean
    }
}

impl fmt::Display for StageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.retrieve {
            names.push("retrieve");
        }
        if self.aggregate {
            names.push("aggregate");
        }
        if self.clean {
            names.push("clean");
        }
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join("+"))
        }
    }
}

/// Report of a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// Collection the run operated on.
    pub collection_id: CollectionId,
    /// Stages that were selected.
    pub stages: StageSet,
    /// Retrieve stage outcome, when the stage ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval: Option<RetrievalResult>,
    /// Aggregate stage outcome, when the stage ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<AggregationResult>,
    /// Promotion outcome, when the aggregate stage ran to completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionResult>,
    /// Non-fatal warnings collected during the run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}
