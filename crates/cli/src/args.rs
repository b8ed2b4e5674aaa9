//! CLI argument structures
//!
//! Stage selection follows the original runner surface: any non-empty subset
//! of retrieve/aggregate/clean, order independent, followed by the
//! collection identifier.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use aggregator_core::StageSet;

/// Run the staged retrieve/aggregate/clean pipeline for one collection
#[derive(Debug, Parser)]
#[command(name = "aggrunner")]
#[command(about = "aggrunner - staged retrieve/aggregate/clean runner", long_about = None)]
#[command(version)]
#[command(group(
    ArgGroup::new("stages")
        .required(true)
        .multiple(true)
        .args(["retrieve", "aggregate", "clean"])
))]
pub struct Cli {
    /// Retrieve the collection's metadata and full-text content
    #[arg(long)]
    pub retrieve: bool,

    /// Aggregate the retrieved content and promote the result
    #[arg(long)]
    pub aggregate: bool,

    /// Remove the collection's input and staging directories
    #[arg(long)]
    pub clean: bool,

    /// Collection identifier
    #[arg(value_name = "COLLECTION_ID")]
    pub collection_id: String,

    /// Path to the configuration file (default: $AGGREGATOR_CONFIG, then
    /// config.toml, then environment variables only)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Returns the selected stages.
    pub fn stage_set(&self) -> StageSet {
        StageSet {
            retrieve: self.retrieve,
            aggregate: self.aggregate,
            clean: self.clean,
        }
    }
}
