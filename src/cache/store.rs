//! Partition Store Module
//!
//! Single-threaded partition engine combining HashMap storage with LRU tracking
//! and count/byte budgets. `BoundedCache` wraps it for shared use.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{CacheEntry, CacheStats, LruTracker, PartitionLimits, Weigh};

/// Per-key generations kept before they are folded into the partition floor.
pub const MAX_TRACKED_GENERATIONS: usize = 4096;

// == Put Outcome ==
/// Result of storing a value into a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// Value stored; lists the keys evicted to make room
    Stored { evicted: Vec<String> },
    /// Value heavier than the whole budget; any previous entry was dropped
    Rejected,
}

// == Write Back ==
/// Result of reconciling a fetched value with the current partition content.
#[derive(Debug)]
pub enum WriteBack<V> {
    /// Equal to what readers already have; nothing published
    Unchanged,
    /// Stored and different from what readers had
    Changed(Arc<V>),
    /// An invalidation happened after the fetch started; value dropped
    Superseded,
}

// == Partition Store ==
/// Storage for one entity kind with LRU eviction.
#[derive(Debug)]
pub struct PartitionStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Count and byte budget
    limits: PartitionLimits,
    /// Aggregate weight of `entries`
    total_bytes: usize,
    /// Source of generation numbers
    clock: u64,
    /// Generation of the last invalidation or overwrite, per key
    generations: HashMap<String, u64>,
    /// Generation of the last clear; the epoch of every key is at least this
    floor: u64,
}

impl<V: Weigh> PartitionStore<V> {
    // == Constructor ==
    /// Creates an empty store with the given limits.
    pub fn new(limits: PartitionLimits) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            limits,
            total_bytes: 0,
            clock: 0,
            generations: HashMap::new(),
            floor: 0,
        }
    }

    // == Get ==
    /// Retrieves a value by key, marking it most recently used.
    pub fn get(&mut self, key: &str) -> Option<Arc<V>> {
        match self.entries.get(key) {
            Some(entry) => {
                let value = Arc::clone(&entry.value);
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Retrieves a value without touching LRU order or statistics.
    pub fn peek(&self, key: &str) -> Option<Arc<V>> {
        self.entries.get(key).map(|entry| Arc::clone(&entry.value))
    }

    // == Put ==
    /// Stores a snapshot, replacing any previous one under the same key.
    ///
    /// Least recently used entries are evicted until both the count and the
    /// byte budget hold again.
    pub fn put(&mut self, key: String, value: Arc<V>) -> PutOutcome {
        let entry = CacheEntry::new(value);

        // Replacement releases the old accounting first
        self.detach(&key);

        if !self.limits.admits(entry.weight) {
            self.sync_totals();
            return PutOutcome::Rejected;
        }

        let mut evicted = Vec::new();
        while self
            .limits
            .exceeded_by(self.entries.len() + 1, self.total_bytes + entry.weight)
        {
            let Some(oldest) = self.lru.evict_oldest() else {
                break;
            };
            if let Some(old) = self.entries.remove(&oldest) {
                self.total_bytes -= old.weight;
            }
            self.stats.record_eviction();
            evicted.push(oldest);
        }

        self.total_bytes += entry.weight;
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.record_insert();
        self.sync_totals();

        PutOutcome::Stored { evicted }
    }

    // == Remove ==
    /// Removes an entry by key. Returns true if it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.detach(key);
        self.sync_totals();
        removed
    }

    // == Invalidate ==
    /// Removes an entry on behalf of a local mutation and bumps its epoch.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.bump(key);
        let removed = self.remove(key);
        if removed {
            self.stats.record_invalidation();
        }
        removed
    }

    // == Overwrite ==
    /// Replaces an entry with a known-fresh value and bumps its epoch.
    pub fn overwrite(&mut self, key: String, value: Arc<V>) -> PutOutcome {
        self.bump(&key);
        self.put(key, value)
    }

    // == Epoch ==
    /// Invalidation epoch of `key`. Moves whenever `key` is invalidated or
    /// overwritten and whenever the whole partition is cleared.
    pub fn epoch(&self, key: &str) -> u64 {
        self.generations
            .get(key)
            .map_or(self.floor, |&generation| generation.max(self.floor))
    }

    fn bump(&mut self, key: &str) {
        self.clock += 1;
        if self.generations.len() >= MAX_TRACKED_GENERATIONS
            && !self.generations.contains_key(key)
        {
            // Folding supersedes every fetch in flight, like a clear
            self.floor = self.clock;
            self.generations.clear();
            return;
        }
        self.generations.insert(key.to_string(), self.clock);
    }

    // == Clear ==
    /// Drops every entry. Counted as invalidations.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.clock += 1;
        self.floor = self.clock;
        self.generations.clear();
        self.entries.clear();
        self.lru.clear();
        self.total_bytes = 0;
        self.stats.invalidations += count as u64;
        self.sync_totals();
        count
    }

    // == Stats ==
    /// Returns current partition statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    pub fn limits(&self) -> PartitionLimits {
        self.limits
    }

    // == LRU Age ==
    /// Milliseconds since the entry next in line for eviction was stored.
    pub fn lru_age_ms(&self) -> Option<u64> {
        let key = self.lru.peek_oldest()?;
        self.entries.get(key).map(CacheEntry::age_ms)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    fn detach(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(old) => {
                self.total_bytes -= old.weight;
                self.lru.remove(key);
                true
            }
            None => false,
        }
    }

    fn sync_totals(&mut self) {
        self.stats.set_totals(self.entries.len(), self.total_bytes);
    }
}

impl<V: Weigh + PartialEq> PartitionStore<V> {
    // == Write Back ==
    /// Reconciles a fetched value with the partition.
    ///
    /// `epoch` is the value of `epoch(key)` when the fetch started. `baseline` is
    /// what the reader was shown, used when the entry vanished meanwhile.
    pub fn write_back(
        &mut self,
        key: &str,
        value: Arc<V>,
        epoch: u64,
        baseline: Option<&V>,
    ) -> WriteBack<V> {
        if self.epoch(key) != epoch {
            return WriteBack::Superseded;
        }

        let current = self.peek(key);
        if current.as_deref() == Some(&*value) {
            return WriteBack::Unchanged;
        }

        let seen_before = current.is_none() && baseline == Some(&*value);
        self.put(key.to_string(), Arc::clone(&value));

        if seen_before {
            WriteBack::Unchanged
        } else {
            WriteBack::Changed(value)
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn store(max_entries: usize) -> PartitionStore<String> {
        PartitionStore::new(PartitionLimits::entries(max_entries))
    }

    fn put(store: &mut PartitionStore<String>, key: &str, value: &str) -> PutOutcome {
        store.put(key.to_string(), Arc::new(value.to_string()))
    }

    #[test]
    fn test_store_new() {
        let store = store(10);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.epoch("u1"), 0);
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = store(10);

        put(&mut store, "u1_nickname", "alice");
        let value = store.get("u1_nickname").unwrap();

        assert_eq!(value.as_str(), "alice");
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_bytes(), 5);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(10);
        assert!(store.get("missing").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_overwrite_replaces_accounting() {
        let mut store = store(10);

        put(&mut store, "u1", "alice");
        put(&mut store, "u1", "al");

        assert_eq!(store.get("u1").unwrap().as_str(), "al");
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_bytes(), 2);
        assert_eq!(store.stats().inserts, 2);
    }

    #[test]
    fn test_store_remove() {
        let mut store = store(10);

        put(&mut store, "u1", "alice");
        assert!(store.remove("u1"));
        assert!(!store.remove("u1"));
        assert!(store.get("u1").is_none());
        assert_eq!(store.total_bytes(), 0);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = store(2);

        put(&mut store, "a", "1");
        put(&mut store, "b", "2");
        let outcome = put(&mut store, "c", "3");

        assert_eq!(
            outcome,
            PutOutcome::Stored {
                evicted: vec!["a".to_string()]
            }
        );
        assert!(store.get("a").is_none());
        assert_eq!(store.get("b").unwrap().as_str(), "2");
        assert_eq!(store.get("c").unwrap().as_str(), "3");
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = store(2);

        put(&mut store, "a", "1");
        put(&mut store, "b", "2");
        store.get("a");
        put(&mut store, "c", "3");

        assert!(store.get("a").is_some());
        assert!(store.get("b").is_none());
    }

    #[test]
    fn test_store_peek_does_not_touch() {
        let mut store = store(2);

        put(&mut store, "a", "1");
        put(&mut store, "b", "2");
        assert!(store.peek("a").is_some());
        put(&mut store, "c", "3");

        assert!(store.peek("a").is_none());
        assert_eq!(store.stats().hits, 0);
    }

    #[test]
    fn test_store_byte_budget_evicts_several() {
        let mut store = PartitionStore::new(PartitionLimits::entries(10).with_max_bytes(10));

        put(&mut store, "a", "xxxx");
        put(&mut store, "b", "xxxx");
        let outcome = put(&mut store, "c", "xxxxxxxx");

        assert_eq!(
            outcome,
            PutOutcome::Stored {
                evicted: vec!["a".to_string(), "b".to_string()]
            }
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_bytes(), 8);
    }

    #[test]
    fn test_store_rejects_oversize_and_drops_previous() {
        let mut store = PartitionStore::new(PartitionLimits::entries(10).with_max_bytes(4));

        put(&mut store, "a", "ok");
        put(&mut store, "b", "ok");
        let outcome = put(&mut store, "a", "too large");

        assert_eq!(outcome, PutOutcome::Rejected);
        assert!(store.get("a").is_none());
        assert!(store.get("b").is_some());
        assert_eq!(store.total_bytes(), 2);
    }

    #[test]
    fn test_store_invalidate_bumps_epoch() {
        let mut store = store(10);

        put(&mut store, "u1", "alice");
        assert!(store.invalidate("u1"));
        let first = store.epoch("u1");
        assert!(!store.invalidate("u1"));

        assert!(store.epoch("u1") > first);
        assert_eq!(store.stats().invalidations, 1);
    }

    #[test]
    fn test_store_epoch_is_per_key() {
        let mut store = store(10);
        put(&mut store, "u2", "bob");
        let before = store.epoch("u2");

        store.invalidate("u1");
        store.overwrite("u3".to_string(), Arc::new("carol".to_string()));

        assert_eq!(store.epoch("u2"), before);
        assert!(store.epoch("u1") > before);
        assert!(store.epoch("u3") > before);
    }

    #[test]
    fn test_store_clear_moves_every_epoch() {
        let mut store = store(10);
        store.invalidate("u1");
        let u1 = store.epoch("u1");
        let u2 = store.epoch("u2");

        store.clear();

        assert!(store.epoch("u1") > u1);
        assert!(store.epoch("u2") > u2);
    }

    #[test]
    fn test_store_generations_fold_when_full() {
        let mut store = store(10);
        for i in 0..MAX_TRACKED_GENERATIONS {
            store.invalidate(&format!("k{}", i));
        }
        let untouched = store.epoch("other");

        store.invalidate("one_more");

        assert!(store.epoch("other") > untouched);
        assert!(store.generations.is_empty());
    }

    #[test]
    fn test_store_lru_age_follows_eviction_order() {
        let mut store = store(2);
        assert_eq!(store.lru_age_ms(), None);

        put(&mut store, "a", "1");
        store.entries.get_mut("a").unwrap().stored_at -= 5_000;
        put(&mut store, "b", "2");
        assert!(store.lru_age_ms().unwrap() >= 5_000);

        store.get("a");
        assert!(store.lru_age_ms().unwrap() < 5_000);
    }

    #[test]
    fn test_store_clear() {
        let mut store = store(10);

        put(&mut store, "a", "1");
        put(&mut store, "b", "2");

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert_eq!(store.stats().total_entries, 0);
        assert_eq!(store.stats().invalidations, 2);
    }

    #[test]
    fn test_write_back_unchanged() {
        let mut store = store(10);
        put(&mut store, "u1", "alice");

        let result = store.write_back("u1", Arc::new("alice".to_string()), 0, None);
        assert!(matches!(result, WriteBack::Unchanged));
        assert_eq!(store.stats().inserts, 1);
    }

    #[test]
    fn test_write_back_changed() {
        let mut store = store(10);
        put(&mut store, "u1", "alice");

        let result = store.write_back("u1", Arc::new("alice2".to_string()), 0, None);
        assert!(matches!(result, WriteBack::Changed(v) if v.as_str() == "alice2"));
        assert_eq!(store.peek("u1").unwrap().as_str(), "alice2");
    }

    #[test]
    fn test_write_back_superseded_by_invalidation() {
        let mut store = store(10);
        put(&mut store, "u1", "alice");
        let epoch = store.epoch("u1");

        store.invalidate("u1");
        let result = store.write_back("u1", Arc::new("alice".to_string()), epoch, None);

        assert!(matches!(result, WriteBack::Superseded));
        assert!(store.peek("u1").is_none());
    }

    #[test]
    fn test_write_back_ignores_invalidation_of_other_key() {
        let mut store = store(10);
        put(&mut store, "u2", "bob");
        let epoch = store.epoch("u2");

        store.invalidate("u1");
        let result = store.write_back("u2", Arc::new("bobby".to_string()), epoch, None);

        assert!(matches!(result, WriteBack::Changed(v) if v.as_str() == "bobby"));
        assert_eq!(store.peek("u2").unwrap().as_str(), "bobby");
    }

    #[test]
    fn test_write_back_restores_evicted_without_change() {
        let mut store = store(1);
        put(&mut store, "u1", "alice");
        put(&mut store, "u2", "bob");

        let baseline = "alice".to_string();
        let result = store.write_back("u1", Arc::new("alice".to_string()), 0, Some(&baseline));

        assert!(matches!(result, WriteBack::Unchanged));
        assert_eq!(store.peek("u1").unwrap().as_str(), "alice");
    }
}
