//! Configuration Module
//!
//! Loads partition limits and diagnostics settings from environment variables.

use std::env;

use crate::cache::PartitionLimits;

const MIB: usize = 1024 * 1024;

/// Cache core configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Avatar images: count and byte budget
    pub avatars: PartitionLimits,
    /// Nickname / full-name strings
    pub texts: PartitionLimits,
    /// User profiles, unbounded unless configured
    pub users: PartitionLimits,
    /// Post collections keyed by user
    pub posts: PartitionLimits,
    /// Recent-search user lists
    pub recent_users: PartitionLimits,
    /// Chat rows keyed by user
    pub chats: PartitionLimits,
    /// Diagnostics HTTP port
    pub server_port: u16,
    /// Stats reporter interval in seconds, 0 disables it
    pub stats_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `AVATAR_CACHE_ENTRIES` / `AVATAR_CACHE_BYTES` (default: 200 / 200 MiB)
    /// - `TEXT_CACHE_ENTRIES` / `TEXT_CACHE_BYTES` (default: 200 / 20 MiB)
    /// - `USER_CACHE_ENTRIES` (default: unbounded)
    /// - `POST_CACHE_ENTRIES` (default: 10)
    /// - `RECENT_USERS_CACHE_ENTRIES` (default: 2)
    /// - `CHAT_CACHE_ENTRIES` (default: 10)
    /// - `SERVER_PORT` (default: 3000)
    /// - `STATS_INTERVAL` (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            avatars: PartitionLimits {
                max_entries: env_or("AVATAR_CACHE_ENTRIES", defaults.avatars.max_entries),
                max_bytes: env_or("AVATAR_CACHE_BYTES", defaults.avatars.max_bytes),
            },
            texts: PartitionLimits {
                max_entries: env_or("TEXT_CACHE_ENTRIES", defaults.texts.max_entries),
                max_bytes: env_or("TEXT_CACHE_BYTES", defaults.texts.max_bytes),
            },
            users: PartitionLimits {
                max_entries: env_or("USER_CACHE_ENTRIES", defaults.users.max_entries),
                max_bytes: None,
            },
            posts: PartitionLimits {
                max_entries: env_or("POST_CACHE_ENTRIES", defaults.posts.max_entries),
                max_bytes: None,
            },
            recent_users: PartitionLimits {
                max_entries: env_or(
                    "RECENT_USERS_CACHE_ENTRIES",
                    defaults.recent_users.max_entries,
                ),
                max_bytes: None,
            },
            chats: PartitionLimits {
                max_entries: env_or("CHAT_CACHE_ENTRIES", defaults.chats.max_entries),
                max_bytes: None,
            },
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
            stats_interval: env_parse("STATS_INTERVAL").unwrap_or(defaults.stats_interval),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_or(name: &str, default: Option<usize>) -> Option<usize> {
    env_parse(name).or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            avatars: PartitionLimits::entries(200).with_max_bytes(200 * MIB),
            texts: PartitionLimits::entries(200).with_max_bytes(20 * MIB),
            users: PartitionLimits::unbounded(),
            posts: PartitionLimits::entries(10),
            recent_users: PartitionLimits::entries(2),
            chats: PartitionLimits::entries(10),
            server_port: 3000,
            stats_interval: 60,
        }
    }
}
