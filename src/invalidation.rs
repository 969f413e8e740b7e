//! Invalidation hooks called by write-path collaborators.
//!
//! Every hook finishes its cache work before returning, so a read started
//! after the mutation's completion sees the new value or a clean miss.
//! Hooks also bump the epoch of every key they touch, which makes fetches of
//! those keys already in flight drop their (pre-mutation) results instead of
//! writing them back. Fetches of other keys are unaffected.

use tracing::debug;

use crate::cache::{PutOutcome, Weigh};
use crate::coherence::Revalidator;
use crate::keys::{avatar_key, text_key, user_key, PartitionId, TextField, RECENT_USERS_KEY};
use crate::models::{AvatarImage, UserProfile};
use crate::registry::CacheRegistry;

/// Invalidation contract over a registry.
#[derive(Debug, Clone)]
pub struct InvalidationHooks {
    registry: CacheRegistry,
}

impl InvalidationHooks {
    pub fn new(registry: CacheRegistry) -> Self {
        Self { registry }
    }

    /// Remove `key` from `partition`. Returns true if an entry was dropped.
    pub fn invalidate(&self, partition: PartitionId, key: &str) -> bool {
        self.registry.invalidate(partition, key)
    }

    /// Replace `key` with a known-fresh value, avoiding a round trip.
    pub fn overwrite<V>(&self, partition: &Revalidator<V>, key: &str, value: V) -> PutOutcome
    where
        V: Weigh + PartialEq + Send + Sync + 'static,
    {
        partition.overwrite(key, value)
    }

    // == Avatars ==

    pub fn avatar_uploaded(&self, user_id: &str, image: AvatarImage) {
        debug!(user_id, "Avatar uploaded");
        self.overwrite(self.registry.avatars(), &avatar_key(user_id), image);
    }

    pub fn avatar_removed(&self, user_id: &str) {
        self.invalidate(PartitionId::Avatars, &avatar_key(user_id));
    }

    // == Profile ==

    /// The write path saved `profile` and knows it is authoritative.
    pub fn profile_edited(&self, user_id: &str, profile: UserProfile) {
        debug!(user_id, "Profile edited");
        let texts = self.registry.texts();
        self.overwrite(
            texts,
            &text_key(user_id, TextField::Nickname),
            profile.nickname.clone(),
        );
        self.overwrite(
            texts,
            &text_key(user_id, TextField::FullName),
            profile.full_name(),
        );
        self.overwrite(self.registry.users(), &user_key(user_id), profile);
    }

    /// Only the nickname is known; the rest of the profile must be refetched.
    pub fn nickname_changed(&self, user_id: &str, nickname: &str) {
        self.overwrite(
            self.registry.texts(),
            &text_key(user_id, TextField::Nickname),
            nickname.to_string(),
        );
        self.invalidate(PartitionId::Users, &user_key(user_id));
    }

    /// Follow or unfollow touched the follower/following lists of `user_id`.
    pub fn follow_graph_changed(&self, user_id: &str) {
        self.invalidate(PartitionId::Users, &user_key(user_id));
    }

    // == Posts ==

    pub fn post_created(&self, user_id: &str) {
        self.invalidate(PartitionId::Posts, &user_key(user_id));
    }

    pub fn post_deleted(&self, user_id: &str, post_id: &str) {
        debug!(user_id, post_id, "Post deleted");
        self.invalidate(PartitionId::Posts, &user_key(user_id));
    }

    // == Chats ==

    pub fn chat_deleted(&self, user_id: &str, chat_id: &str) {
        debug!(user_id, chat_id, "Chat deleted");
        self.invalidate(PartitionId::Chats, &user_key(user_id));
    }

    pub fn message_sent(&self, user_id: &str) {
        self.invalidate(PartitionId::Chats, &user_key(user_id));
    }

    // == Recent users ==

    pub fn recent_contacts_changed(&self) {
        self.invalidate(PartitionId::RecentUsers, RECENT_USERS_KEY);
    }
}
