//! Pipeline module executing the staged retrieve → aggregate → clean run.
//!
//! The runner coordinates:
//! - Retrieve: an external program populates the collection's input directory
//! - Aggregate: an external program transforms the input into a staged
//!   output, which is then promoted to the final output directory
//! - Clean: the collection's input and staging directories are removed
//!
//! Stages are independently selectable but always execute in that order, and
//! a failed stage aborts the remainder of the run without rolling back the
//! stages before it.
//!
//! # Example
//!
//! ```ignore
//! use aggregator_core::{CollectionId, PipelineRunner, StageSet, StorageConfig};
//! use aggregator_core::{CommandAggregator, CommandRetriever};
//!
//! let storage = StorageConfig::new("/data/input", "/data/output");
//! let runner = PipelineRunner::new(
//!     storage,
//!     CommandRetriever::with_defaults(),
//!     CommandAggregator::with_defaults(),
//! );
//!
//! let collection = CollectionId::new("9200396")?;
//! let report = runner.run(&collection, StageSet::all()).await?;
//! println!("finished in {} ms", report.duration_ms);
//! ```

mod error;
mod locks;
mod runner;
mod types;

pub use error::PipelineError;
pub use locks::{CollectionLease, CollectionLocks};
pub use runner::PipelineRunner;
pub use types::{RunReport, StageSet};
