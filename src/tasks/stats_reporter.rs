//! Stats Reporter Task
//!
//! Background task that periodically logs per-partition statistics.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::registry::CacheRegistry;

/// Spawns a background task that logs partition statistics every interval.
///
/// Reading statistics only takes each partition lock briefly, so the task
/// never delays readers. Abort the returned handle during shutdown.
///
/// # Example
/// ```ignore
/// let registry = CacheRegistry::from_config(&config);
/// let reporter = spawn_stats_reporter(registry.clone(), 60);
/// // Later, during shutdown:
/// reporter.abort();
/// ```
pub fn spawn_stats_reporter(registry: CacheRegistry, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting stats reporter with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;
            report(&registry);
        }
    })
}

/// Logs one line per partition. Returns the number of entries across partitions.
pub fn report(registry: &CacheRegistry) -> usize {
    let mut total = 0;

    for partition in registry.stats() {
        let stats = &partition.stats;
        total += stats.total_entries;

        if stats.hits + stats.misses == 0 && stats.total_entries == 0 {
            debug!(partition = %partition.partition, "Partition idle");
            continue;
        }

        info!(
            partition = %partition.partition,
            entries = stats.total_entries,
            bytes = stats.total_bytes,
            hits = stats.hits,
            misses = stats.misses,
            evictions = stats.evictions,
            invalidations = stats.invalidations,
            hit_rate = stats.hit_rate(),
            lru_age_ms = ?partition.lru_age_ms,
            "Partition stats"
        );
    }

    total
}
