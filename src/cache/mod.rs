//! Cache Module
//!
//! Bounded in-memory partitions with LRU eviction and count/byte budgets.

mod bounded;
mod entry;
mod limits;
mod lru;
mod stats;
mod store;
mod weigh;


// Re-export public types
pub use bounded::BoundedCache;
pub use entry::CacheEntry;
pub use limits::PartitionLimits;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::{PartitionStore, PutOutcome, WriteBack};
pub use weigh::Weigh;
