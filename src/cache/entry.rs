//! Cache Entry Module
//!
//! A stored snapshot plus the metadata a partition needs to account for it.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use super::Weigh;

// == Cache Entry ==
/// A single immutable snapshot held by a partition.
///
/// The value sits behind an `Arc`: readers get a shared handle and an update
/// swaps the whole entry, so nobody ever sees a partially written value.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored snapshot
    pub value: Arc<V>,
    /// Approximate size in bytes, fixed at insertion
    pub weight: usize,
    /// Insertion timestamp (Unix milliseconds)
    pub stored_at: u64,
}

impl<V: Weigh> CacheEntry<V> {
    // == Constructor ==
    /// Wraps a shared snapshot, weighing it once.
    pub fn new(value: Arc<V>) -> Self {
        let weight = value.weight();

        Self {
            value,
            weight,
            stored_at: current_timestamp_ms(),
        }
    }
}

impl<V> CacheEntry<V> {
    // == Age ==
    /// Milliseconds since the snapshot was stored.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.stored_at)
    }
}

impl<V> Clone for CacheEntry<V> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            weight: self.weight,
            stored_at: self.stored_at,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds, 0 if the clock is before the epoch.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
