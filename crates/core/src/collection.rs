//! Collection identifier handling.
//!
//! A collection identifier is an opaque, caller-supplied string naming one
//! unit of work. It is only ever used to derive subdirectory names under the
//! configured roots, so the raw value is sanitized before it touches the
//! filesystem.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid pattern"));

/// Error returned when a collection identifier cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("collection identifier must not be empty")]
pub struct InvalidCollectionId;

/// An opaque identifier for a collection of metadata and full-text content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(String);

impl CollectionId {
    /// Creates a collection identifier, rejecting empty or whitespace-only
    /// input.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidCollectionId> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InvalidCollectionId);
        }
        Ok(Self(raw))
    }

    /// Returns the raw identifier as passed by the caller.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the filesystem-safe directory name for this collection.
    ///
    /// Characters outside `[A-Za-z0-9._-]` become `_`. A leading dot is
    /// replaced too, so the result can never name a hidden or relative path
    /// component.
    pub fn dir_name(&self) -> String {
        let safe = UNSAFE_CHARS.replace_all(&self.0, "_");
        if safe.starts_with('.') {
            safe.replacen('.', "_", 1)
        } else {
            safe.into_owned()
        }
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CollectionId {
    type Err = InvalidCollectionId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
