//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Stats Reporter: Logs per-partition statistics at configured intervals

mod stats_reporter;

pub use stats_reporter::{report, spawn_stats_reporter};
