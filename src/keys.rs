//! Partition identifiers and the key scheme of each entity kind.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CacheError;

/// Fixed key of the single recent-users list.
pub const RECENT_USERS_KEY: &str = "users";

/// One independent cache table per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionId {
    Avatars,
    Texts,
    Users,
    Posts,
    RecentUsers,
    Chats,
}

impl PartitionId {
    pub const ALL: [PartitionId; 6] = [
        PartitionId::Avatars,
        PartitionId::Texts,
        PartitionId::Users,
        PartitionId::Posts,
        PartitionId::RecentUsers,
        PartitionId::Chats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionId::Avatars => "avatars",
            PartitionId::Texts => "texts",
            PartitionId::Users => "users",
            PartitionId::Posts => "posts",
            PartitionId::RecentUsers => "recent_users",
            PartitionId::Chats => "chats",
        }
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartitionId {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartitionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| CacheError::UnknownPartition(s.to_string()))
    }
}

/// Display-text fields cached per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Nickname,
    FullName,
}

impl TextField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::Nickname => "nickname",
            TextField::FullName => "fullName",
        }
    }
}

/// `<userId>_avatar`
pub fn avatar_key(user_id: &str) -> String {
    format!("{}_avatar", user_id)
}

/// `<userId>_<field>`
pub fn text_key(user_id: &str, field: TextField) -> String {
    format!("{}_{}", user_id, field.as_str())
}

/// Profiles, posts and chats are keyed by the bare user id.
pub fn user_key(user_id: &str) -> String {
    user_id.to_string()
}
