//! Configuration for the placer module.

use serde::{Deserialize, Serialize};

/// Configuration for the file system placer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacerConfig {
    /// Suffix appended to the final directory name while the previous output
    /// is displaced.
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,

    /// Whether to fall back to a recursive copy when staging and final
    /// output live on different filesystems.
    #[serde(default = "default_true")]
    pub fallback_to_copy: bool,
}

fn default_backup_suffix() -> String {
    "_old".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            backup_suffix: default_backup_suffix(),
            fallback_to_copy: true,
        }
    }
}

impl PlacerConfig {
    /// Sets the backup suffix.
    pub fn with_backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = suffix.into();
        self
    }

    /// Enables or disables the cross-filesystem copy fallback.
    pub fn with_copy_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_copy = enabled;
        self
    }
}
