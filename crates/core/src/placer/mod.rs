//! Placer module for promoting staged output to its final location.
//!
//! Promotion replaces the previous final output of a collection with the
//! freshly staged one:
//!
//! 1. an existing final directory is renamed aside with a backup suffix,
//!    displacing any backup left by an earlier run,
//! 2. the staging directory is renamed into place (with a recursive-copy
//!    fallback when staging lives on a different filesystem),
//! 3. the backup is removed.
//!
//! The swap is two renames, not a single atomic operation: a crash between
//! them can leave both the final directory and its backup on disk. That
//! window is an accepted limitation of the design.

mod config;
mod error;
mod fs_placer;
mod types;

pub use config::PlacerConfig;
pub use error::PlacerError;
pub use fs_placer::{dir_size, FsPlacer};
pub use types::{PromotionJob, PromotionResult};
