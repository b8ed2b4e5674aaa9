use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::aggregator::AggregatorConfig;
use crate::retriever::RetrieverConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub storage: StorageConfig,
    #[serde(default)]
    pub retriever: RetrieverConfig,
    #[serde(default)]
    pub aggregator: AggregatorConfig,
}

/// Directory roots owned by the caller.
///
/// The runner never creates or removes the input and output roots, it only
/// touches collection-named subdirectories beneath them. The temp root is
/// created on demand when staging begins.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root containing one input directory per collection.
    pub input_root: PathBuf,

    /// Root receiving one promoted output directory per collection.
    pub output_root: PathBuf,

    /// Staging root. Defaults to a `temp` directory next to the output root.
    #[serde(default)]
    pub temp_root: Option<PathBuf>,
}

impl StorageConfig {
    /// Creates a storage configuration with the default temp root.
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            temp_root: None,
        }
    }

    /// Sets an explicit temp root.
    pub fn with_temp_root(mut self, temp_root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(temp_root.into());
        self
    }

    /// Returns the effective temp root.
    pub fn resolved_temp_root(&self) -> PathBuf {
        match &self.temp_root {
            Some(path) => path.clone(),
            None => self
                .output_root
                .parent()
                .map(|parent| parent.join("temp"))
                .unwrap_or_else(|| PathBuf::from("temp")),
        }
    }
}
