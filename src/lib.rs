//! Social Cache - bounded stale-while-revalidate cache core
//!
//! Keeps per-entity-kind partitions (avatars, display texts, profiles, posts,
//! recent users, chats) between a social client's view-models and its remote
//! database. Reads serve the cached snapshot first and reconcile with the
//! remote source in the background; write paths invalidate through hooks.

pub mod api;
pub mod cache;
pub mod coherence;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod keys;
pub mod models;
pub mod registry;
pub mod tasks;

pub use api::AppState;
pub use cache::{BoundedCache, PartitionLimits};
pub use coherence::{ReadEvent, ReadOutcome, ReadSource, RefreshResult, Revalidator};
pub use config::Config;
pub use error::{CacheError, FetchError};
pub use invalidation::InvalidationHooks;
pub use keys::PartitionId;
pub use registry::CacheRegistry;
pub use tasks::spawn_stats_reporter;
