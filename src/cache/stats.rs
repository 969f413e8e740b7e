//! Cache Statistics Module
//!
//! Tracks per-partition metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks partition performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of `get` calls that found a value
    pub hits: u64,
    /// Number of `get` calls that found nothing
    pub misses: u64,
    /// Number of values stored (inserts and replacements)
    pub inserts: u64,
    /// Number of entries dropped by the capacity policy
    pub evictions: u64,
    /// Number of entries dropped by invalidation hooks
    pub invalidations: u64,
    /// Current number of entries in the partition
    pub total_entries: usize,
    /// Current aggregate weight of all entries
    pub total_bytes: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_invalidation(&mut self) {
        self.invalidations += 1;
    }

    // == Update Totals ==
    /// Updates the entry count and aggregate weight.
    pub fn set_totals(&mut self, entries: usize, bytes: usize) {
        self.total_entries = entries;
        self.total_bytes = bytes;
    }
}
