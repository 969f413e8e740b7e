//! Cache registry - the single owner of every partition.
//!
//! Built once at startup and handed to every consumer by clone; clones share
//! the same partitions.

use serde::Serialize;
use tracing::info;

use crate::cache::{CacheStats, PartitionLimits, Weigh};
use crate::coherence::Revalidator;
use crate::config::Config;
use crate::invalidation::InvalidationHooks;
use crate::keys::PartitionId;
use crate::models::{AvatarImage, ChatRows, PostCollection, RecentUsers, UserProfile};

/// Snapshot of one partition's limits and counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionStats {
    pub partition: PartitionId,
    pub limits: PartitionLimits,
    pub stats: CacheStats,
    /// Milliseconds since the next eviction candidate was stored
    pub lru_age_ms: Option<u64>,
}

/// Type-erased operations shared by every partition.
pub trait PartitionOps: Send + Sync {
    fn stats(&self) -> PartitionStats;
    fn invalidate(&self, key: &str) -> bool;
    fn clear(&self) -> usize;
    fn len(&self) -> usize;
}

struct Typed<'a, V> {
    id: PartitionId,
    partition: &'a Revalidator<V>,
}

impl<'a, V> Typed<'a, V> {
    fn new(id: PartitionId, partition: &'a Revalidator<V>) -> Self {
        Self { id, partition }
    }
}

impl<V> PartitionOps for Typed<'_, V>
where
    V: Weigh + PartialEq + Send + Sync + 'static,
{
    fn stats(&self) -> PartitionStats {
        PartitionStats {
            partition: self.id,
            limits: self.partition.cache().limits(),
            stats: self.partition.stats(),
            lru_age_ms: self.partition.cache().lru_age_ms(),
        }
    }

    fn invalidate(&self, key: &str) -> bool {
        self.partition.invalidate(key)
    }

    fn clear(&self) -> usize {
        self.partition.cache().clear()
    }

    fn len(&self) -> usize {
        self.partition.cache().len()
    }
}

/// Central registry holding one partition per entity kind.
#[derive(Clone)]
pub struct CacheRegistry {
    avatars: Revalidator<AvatarImage>,
    texts: Revalidator<String>,
    users: Revalidator<UserProfile>,
    posts: Revalidator<PostCollection>,
    recent_users: Revalidator<RecentUsers>,
    chats: Revalidator<ChatRows>,
}

impl CacheRegistry {
    /// Create every partition with the limits from `config`.
    pub fn from_config(config: &Config) -> Self {
        let registry = Self {
            avatars: Revalidator::new(PartitionId::Avatars.as_str(), config.avatars),
            texts: Revalidator::new(PartitionId::Texts.as_str(), config.texts),
            users: Revalidator::new(PartitionId::Users.as_str(), config.users),
            posts: Revalidator::new(PartitionId::Posts.as_str(), config.posts),
            recent_users: Revalidator::new(PartitionId::RecentUsers.as_str(), config.recent_users),
            chats: Revalidator::new(PartitionId::Chats.as_str(), config.chats),
        };
        info!("Cache registry initialized with {} partitions", PartitionId::ALL.len());
        registry
    }

    pub fn avatars(&self) -> &Revalidator<AvatarImage> {
        &self.avatars
    }

    pub fn texts(&self) -> &Revalidator<String> {
        &self.texts
    }

    pub fn users(&self) -> &Revalidator<UserProfile> {
        &self.users
    }

    pub fn posts(&self) -> &Revalidator<PostCollection> {
        &self.posts
    }

    pub fn recent_users(&self) -> &Revalidator<RecentUsers> {
        &self.recent_users
    }

    pub fn chats(&self) -> &Revalidator<ChatRows> {
        &self.chats
    }

    /// Invalidation contract for write-path collaborators.
    pub fn hooks(&self) -> InvalidationHooks {
        InvalidationHooks::new(self.clone())
    }

    /// Run `f` against the type-erased view of one partition.
    pub fn with_partition<R>(&self, id: PartitionId, f: impl FnOnce(&dyn PartitionOps) -> R) -> R {
        match id {
            PartitionId::Avatars => f(&Typed::new(id, &self.avatars)),
            PartitionId::Texts => f(&Typed::new(id, &self.texts)),
            PartitionId::Users => f(&Typed::new(id, &self.users)),
            PartitionId::Posts => f(&Typed::new(id, &self.posts)),
            PartitionId::RecentUsers => f(&Typed::new(id, &self.recent_users)),
            PartitionId::Chats => f(&Typed::new(id, &self.chats)),
        }
    }

    /// Drop one entry and notify that partition's subscribers.
    pub fn invalidate(&self, id: PartitionId, key: &str) -> bool {
        self.with_partition(id, |p| p.invalidate(key))
    }

    pub fn partition_stats(&self, id: PartitionId) -> PartitionStats {
        self.with_partition(id, |p| p.stats())
    }

    pub fn stats(&self) -> Vec<PartitionStats> {
        PartitionId::ALL
            .into_iter()
            .map(|id| self.partition_stats(id))
            .collect()
    }

    /// Empty every partition. Returns the number of entries dropped.
    pub fn clear_all(&self) -> usize {
        let dropped = PartitionId::ALL
            .into_iter()
            .map(|id| self.with_partition(id, |p| p.clear()))
            .sum();
        info!("Cleared {} cached entries", dropped);
        dropped
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dbg = f.debug_struct("CacheRegistry");
        for id in PartitionId::ALL {
            dbg.field(id.as_str(), &self.with_partition(id, |p| p.len()));
        }
        dbg.finish()
    }
}
