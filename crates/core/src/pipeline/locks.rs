//! Per-collection run leases.
//!
//! Two simultaneous runs against the same collection would race on the
//! staging directory and the promotion renames, so each run must hold the
//! collection's lease for its whole duration. Leases only cover this
//! process; mutual exclusion across processes remains the caller's
//! responsibility.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::collection::CollectionId;

/// Registry of per-collection leases.
///
/// Entries are retained for the life of the process.
#[derive(Debug, Default)]
pub struct CollectionLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// A held lease; dropping it releases the collection.
#[derive(Debug)]
pub struct CollectionLease {
    _guard: OwnedMutexGuard<()>,
}

impl CollectionLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to acquire the lease for a collection without waiting.
    ///
    /// Returns `None` when another run currently holds it.
    pub fn try_acquire(&self, collection_id: &CollectionId) -> Option<CollectionLease> {
        let lock = {
            let mut map = self.inner.lock().expect("collection lock registry poisoned");
            Arc::clone(
                map.entry(collection_id.as_str().to_string())
                    .or_default(),
            )
        };
        lock.try_lock_owned()
            .ok()
            .map(|guard| CollectionLease { _guard: guard })
    }
}
