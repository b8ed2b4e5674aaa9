//! Trait definitions for the aggregator module.

use async_trait::async_trait;

use super::error::AggregatorError;
use super::types::{AggregationJob, AggregationResult};

/// An aggregator that transforms a collection's input directory into a
/// staged output directory.
#[async_trait]
pub trait Aggregator: Send + Sync {
    /// Returns the name of this aggregator implementation.
    fn name(&self) -> &str;

    /// Runs the aggregation for one collection.
    ///
    /// The staging directory exists and is empty when this is called. On
    /// failure the staging directory is left as-is for inspection.
    async fn aggregate(&self, job: AggregationJob) -> Result<AggregationResult, AggregatorError>;

    /// Validates that the aggregator is properly configured and ready.
    async fn validate(&self) -> Result<(), AggregatorError>;
}
