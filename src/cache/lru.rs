//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for partition eviction.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch stamps the key with a monotonically increasing tick:
/// - `order` maps tick -> key, so the first entry is the least recently used
/// - `ticks` maps key -> its current tick, so re-touching is O(log n)
#[derive(Debug, Default)]
pub struct LruTracker {
    order: BTreeMap<u64, String>,
    ticks: HashMap<String, u64>,
    next_tick: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, tracking it if new.
    pub fn touch(&mut self, key: &str) {
        if let Some(old) = self.ticks.get(key).copied() {
            self.order.remove(&old);
        }

        let tick = self.next_tick;
        self.next_tick += 1;

        self.order.insert(tick, key.to_string());
        self.ticks.insert(key.to_string(), tick);
    }

    // == Remove ==
    /// Stops tracking a key. Returns true if it was tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.ticks.remove(key) {
            Some(tick) => {
                self.order.remove(&tick);
                true
            }
            None => false,
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.order.first_key_value().map(|(_, key)| key.as_str())
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.ticks.contains_key(key)
    }

    // == Clear ==
    /// Forgets every tracked key. The tick counter keeps running.
    pub fn clear(&mut self) {
        self.order.clear();
        self.ticks.clear();
    }
}
