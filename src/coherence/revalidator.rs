//! Stale-while-revalidate reads over one partition.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use super::{EventBus, ReadEvent, Subscription};
use crate::cache::{BoundedCache, CacheStats, PartitionLimits, PutOutcome, Weigh, WriteBack};
use crate::error::FetchError;

/// Where the value returned by a read came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSource {
    /// Warm read: served from the partition, refresh running
    Cache,
    /// Cold read: fetched from the remote source
    Remote,
}

/// How a background refresh ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshResult {
    /// Remote value equal to the cached one; nothing published
    Unchanged,
    /// Remote value differed; stored and published once
    Changed,
    /// An invalidation happened while fetching; result dropped
    Superseded,
    /// Remote fetch failed; the stale value stays
    Failed(FetchError),
    /// The refresh task panicked or the runtime shut down
    Aborted,
}

/// Handle on a detached refresh.
///
/// Dropping it does not cancel anything: the refresh still runs to completion
/// and updates the partition for future readers.
#[derive(Debug)]
pub struct RefreshHandle {
    task: JoinHandle<RefreshResult>,
}

impl RefreshHandle {
    /// Wait for the refresh to finish.
    pub async fn wait(self) -> RefreshResult {
        self.task.await.unwrap_or(RefreshResult::Aborted)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Successful read.
#[derive(Debug)]
pub struct ReadOutcome<V> {
    pub value: Arc<V>,
    pub source: ReadSource,
    /// Present for warm reads only
    pub refresh: Option<RefreshHandle>,
}

/// Coordinates one partition with the remote fetch supplied per read.
pub struct Revalidator<V> {
    cache: BoundedCache<V>,
    events: EventBus<V>,
}

impl<V> Clone for Revalidator<V> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            events: self.events.clone(),
        }
    }
}

impl<V> Revalidator<V>
where
    V: Weigh + PartialEq + Send + Sync + 'static,
{
    pub fn new(name: impl Into<Arc<str>>, limits: PartitionLimits) -> Self {
        Self::with_cache(BoundedCache::new(name, limits))
    }

    pub fn with_cache(cache: BoundedCache<V>) -> Self {
        Self {
            cache,
            events: EventBus::new(),
        }
    }

    /// The underlying partition.
    pub fn cache(&self) -> &BoundedCache<V> {
        &self.cache
    }

    pub fn subscribe(&self) -> Subscription<V> {
        self.events.subscribe()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Read `key`, serving the cached value first when there is one.
    ///
    /// Warm: publishes `Cached`, returns at once and refreshes in the
    /// background; a refresh failure is swallowed. Cold: publishes `Loading`,
    /// awaits `fetch`, then `Loaded` or `Failed`; a failure leaves the
    /// partition untouched and is returned.
    pub async fn read<F, Fut>(&self, key: &str, fetch: F) -> Result<ReadOutcome<V>, FetchError>
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let epoch = self.cache.epoch(key);

        if let Some(cached) = self.cache.get(key) {
            self.events.publish(ReadEvent::Cached {
                key: key.to_string(),
                value: Arc::clone(&cached),
            });
            let refresh = self.spawn_refresh(key.to_string(), Arc::clone(&cached), epoch, fetch);

            return Ok(ReadOutcome {
                value: cached,
                source: ReadSource::Cache,
                refresh: Some(refresh),
            });
        }

        self.events.publish(ReadEvent::Loading {
            key: key.to_string(),
        });

        match fetch(key.to_string()).await {
            Ok(value) => {
                let value = Arc::new(value);
                self.cache.write_back(key, Arc::clone(&value), epoch, None);
                self.events.publish(ReadEvent::Loaded {
                    key: key.to_string(),
                    value: Arc::clone(&value),
                });

                Ok(ReadOutcome {
                    value,
                    source: ReadSource::Remote,
                    refresh: None,
                })
            }
            Err(error) => {
                debug!(partition = %self.cache.name(), key, %error, "Cold read failed");
                self.events.publish(ReadEvent::Failed {
                    key: key.to_string(),
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    fn spawn_refresh<F, Fut>(
        &self,
        key: String,
        served: Arc<V>,
        epoch: u64,
        fetch: F,
    ) -> RefreshHandle
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let cache = self.cache.clone();
        let events = self.events.clone();

        let task = tokio::spawn(async move {
            let fetched = match fetch(key.clone()).await {
                Ok(value) => Arc::new(value),
                Err(error) => {
                    debug!(partition = %cache.name(), key = %key, %error, "Refresh failed, keeping stale value");
                    return RefreshResult::Failed(error);
                }
            };

            match cache.write_back(&key, fetched, epoch, Some(&*served)) {
                WriteBack::Changed(value) => {
                    debug!(partition = %cache.name(), key = %key, "Refresh changed value");
                    events.publish(ReadEvent::Changed { key, value });
                    RefreshResult::Changed
                }
                WriteBack::Unchanged => RefreshResult::Unchanged,
                WriteBack::Superseded => RefreshResult::Superseded,
            }
        });

        RefreshHandle { task }
    }

    /// Drop `key` on behalf of a local mutation. Subscribers hear about it
    /// only when an entry was actually removed.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.cache.invalidate(key);
        if removed {
            self.events.publish(ReadEvent::Invalidated {
                key: key.to_string(),
            });
        }
        removed
    }

    /// Replace `key` with a value the write path knows to be current.
    pub fn overwrite(&self, key: &str, value: V) -> PutOutcome {
        let value = Arc::new(value);
        let outcome = self.cache.overwrite(key, Arc::clone(&value));
        match outcome {
            PutOutcome::Stored { .. } => {
                self.events.publish(ReadEvent::Changed {
                    key: key.to_string(),
                    value,
                });
            }
            PutOutcome::Rejected => {
                self.events.publish(ReadEvent::Invalidated {
                    key: key.to_string(),
                });
            }
        }
        outcome
    }
}
