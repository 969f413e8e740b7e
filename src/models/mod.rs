//! Cached entities and diagnostics DTOs
//!
//! `entities` holds the snapshot types stored in partitions; `responses` the
//! bodies returned by the diagnostics API.

pub mod entities;
pub mod responses;

// Re-export commonly used types
pub use entities::{
    AvatarImage, ChatRow, ChatRows, Post, PostCollection, RecentUser, RecentUsers, UserProfile,
};
pub use responses::{HealthResponse, InvalidateResponse, PartitionStatsResponse, StatsResponse};
