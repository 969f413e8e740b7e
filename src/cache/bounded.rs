//! Thread-safe bounded partition shared between readers and writers.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::{CacheStats, PartitionLimits, PartitionStore, PutOutcome, Weigh, WriteBack};

/// A named, capacity-limited key/value partition.
///
/// This cache is:
/// - Thread-safe: every operation runs under one short mutex section
/// - Synchronous: no operation suspends or performs I/O
/// - Clone-friendly: clones share the same underlying store
pub struct BoundedCache<V> {
    inner: Arc<Mutex<PartitionStore<V>>>,
    name: Arc<str>,
}

// Manual Clone implementation that doesn't require V: Clone
impl<V> Clone for BoundedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            name: Arc::clone(&self.name),
        }
    }
}

impl<V: Weigh> BoundedCache<V> {
    /// Create a new partition with the given name and limits.
    pub fn new(name: impl Into<Arc<str>>, limits: PartitionLimits) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PartitionStore::new(limits))),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn limits(&self) -> PartitionLimits {
        self.inner.lock().limits()
    }

    /// Get a value, marking it most recently used.
    ///
    /// Returns `None` on a miss. A miss is never an error: entries may be
    /// evicted at any time.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.inner.lock().get(key)
    }

    /// Get a value without affecting LRU order or hit statistics.
    pub fn peek(&self, key: &str) -> Option<Arc<V>> {
        self.inner.lock().peek(key)
    }

    /// Insert or replace a value.
    pub fn put(&self, key: impl Into<String>, value: V) -> PutOutcome {
        self.put_shared(key, Arc::new(value))
    }

    /// Insert or replace an already shared snapshot.
    pub fn put_shared(&self, key: impl Into<String>, value: Arc<V>) -> PutOutcome {
        let key = key.into();
        let outcome = self.inner.lock().put(key.clone(), value);
        self.log_put(&key, &outcome);
        outcome
    }

    /// Remove an entry. Returns true if it existed.
    pub fn remove(&self, key: &str) -> bool {
        self.inner.lock().remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().peek(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Drop every entry. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let count = self.inner.lock().clear();
        debug!(partition = %self.name, count, "Partition cleared");
        count
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// Age of the least recently used entry, `None` when empty.
    pub fn lru_age_ms(&self) -> Option<u64> {
        self.inner.lock().lru_age_ms()
    }

    /// Current invalidation epoch of `key`.
    pub fn epoch(&self, key: &str) -> u64 {
        self.inner.lock().epoch(key)
    }

    /// Remove an entry because a local mutation made it stale.
    pub(crate) fn invalidate(&self, key: &str) -> bool {
        let removed = self.inner.lock().invalidate(key);
        debug!(partition = %self.name, key, removed, "Entry invalidated");
        removed
    }

    /// Replace an entry with a value the write path knows to be fresh.
    pub(crate) fn overwrite(&self, key: &str, value: Arc<V>) -> PutOutcome {
        let outcome = self.inner.lock().overwrite(key.to_string(), value);
        self.log_put(key, &outcome);
        outcome
    }

    fn log_put(&self, key: &str, outcome: &PutOutcome) {
        match outcome {
            PutOutcome::Stored { evicted } if !evicted.is_empty() => {
                debug!(partition = %self.name, key, ?evicted, "Evicted to make room");
            }
            PutOutcome::Stored { .. } => {}
            PutOutcome::Rejected => {
                warn!(partition = %self.name, key, "Value exceeds partition budget, not cached");
            }
        }
    }
}

impl<V: Weigh + PartialEq> BoundedCache<V> {
    /// Reconcile a fetched value against the current content, atomically.
    pub(crate) fn write_back(
        &self,
        key: &str,
        value: Arc<V>,
        epoch: u64,
        baseline: Option<&V>,
    ) -> WriteBack<V> {
        let result = self.inner.lock().write_back(key, value, epoch, baseline);
        if matches!(result, WriteBack::Superseded) {
            debug!(partition = %self.name, key, "Fetch predates invalidation, dropped");
        }
        result
    }
}

impl<V: Weigh> std::fmt::Debug for BoundedCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedCache")
            .field("name", &self.name)
            .field("entry_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clone_shares_store() {
        let cache: BoundedCache<u32> = BoundedCache::new("posts", PartitionLimits::entries(2));
        let other = cache.clone();

        cache.put("a", 1);
        assert_eq!(other.get("a").as_deref(), Some(&1));
        assert_eq!(other.name(), "posts");
    }

    #[test]
    fn test_remove_then_get_misses() {
        let cache: BoundedCache<u32> = BoundedCache::new("users", PartitionLimits::unbounded());

        cache.put("u1", 1);
        assert!(cache.remove("u1"));
        assert!(cache.get("u1").is_none());

        cache.put("u1", 2);
        assert_eq!(cache.get("u1").as_deref(), Some(&2));
    }

    #[test]
    fn test_overwrite_bumps_epoch() {
        let cache: BoundedCache<String> = BoundedCache::new("texts", PartitionLimits::entries(4));

        cache.put("u1_nickname", "alice".to_string());
        cache.put("u2_nickname", "bob".to_string());
        let before = cache.epoch("u1_nickname");
        let other = cache.epoch("u2_nickname");
        cache.overwrite("u1_nickname", Arc::new("alice2".to_string()));

        assert!(cache.epoch("u1_nickname") > before);
        assert_eq!(cache.epoch("u2_nickname"), other);
        assert_eq!(cache.peek("u1_nickname").unwrap().as_str(), "alice2");
    }

    #[test]
    fn test_concurrent_writers_respect_capacity() {
        let cache: BoundedCache<Vec<u8>> = BoundedCache::new("avatars", PartitionLimits::entries(8));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        let key = format!("{}_{}", t, i);
                        cache.put(key.clone(), vec![t as u8; 16]);
                        if let Some(value) = cache.get(&key) {
                            assert_eq!(value.len(), 16);
                            assert!(value.iter().all(|b| *b == t as u8));
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 8);
        assert_eq!(cache.stats().total_entries, cache.len());
    }
}
