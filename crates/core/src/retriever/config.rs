//! Configuration for the retriever module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the command-based retriever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Command invoked as `<command> [extra_args..] <collection_id> <target_dir>`.
    #[serde(default = "default_command")]
    pub command: PathBuf,

    /// Additional arguments placed before the positional ones.
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Timeout for a single retrieval in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_command() -> PathBuf {
    PathBuf::from("retrieve")
}

fn default_timeout() -> u64 {
    3600 // 1 hour
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            extra_args: Vec::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl RetrieverConfig {
    /// Creates a config for a specific command.
    pub fn with_command(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    /// Sets the extra arguments.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
