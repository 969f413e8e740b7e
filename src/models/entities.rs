//! Cached entity snapshots
//!
//! Value types stored in each partition. They compare by full value, which is
//! what warm refreshes use to decide whether anything changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::Weigh;

// == Avatar ==
/// Encoded avatar image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarImage {
    pub bytes: Vec<u8>,
}

impl AvatarImage {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl Weigh for AvatarImage {
    fn weight(&self) -> usize {
        self.bytes.len()
    }
}

// == User Profile ==
/// Profile record with the follow graph of one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    /// User ids following this user
    #[serde(default)]
    pub followers: Vec<String>,
    /// User ids this user follows
    #[serde(default)]
    pub following: Vec<String>,
}

impl UserProfile {
    /// "First Last", trimmed when either part is empty.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl Weigh for UserProfile {
    fn weight(&self) -> usize {
        self.first_name.weight()
            + self.last_name.weight()
            + self.nickname.weight()
            + self.followers.weight()
            + self.following.weight()
    }
}

// == Posts ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author_id: String,
    #[serde(default)]
    pub caption: String,
    /// Encoded image, when the post carries one
    #[serde(default)]
    pub image: Option<Vec<u8>>,
    #[serde(default)]
    pub likes: u64,
    pub created_at: DateTime<Utc>,
}

impl Weigh for Post {
    fn weight(&self) -> usize {
        self.id.weight() + self.author_id.weight() + self.caption.weight() + self.image.weight() + 8
    }
}

/// Posts of one user, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCollection(Vec<Post>);

impl PostCollection {
    /// Sorts by `created_at`, newest first.
    pub fn new(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self(posts)
    }

    pub fn posts(&self) -> &[Post] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, post_id: &str) -> bool {
        self.0.iter().any(|p| p.id == post_id)
    }
}

impl Weigh for PostCollection {
    fn weight(&self) -> usize {
        self.0.weight()
    }
}

// == Recent Users ==
/// A recently contacted user, as shown in search suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentUser {
    pub user_id: String,
    pub nickname: String,
}

impl Weigh for RecentUser {
    fn weight(&self) -> usize {
        self.user_id.weight() + self.nickname.weight()
    }
}

/// Recently contacted users in caller-defined order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentUsers(pub Vec<RecentUser>);

impl Weigh for RecentUsers {
    fn weight(&self) -> usize {
        self.0.weight()
    }
}

// == Chats ==
/// Summary row of one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRow {
    pub id: String,
    pub peer_id: String,
    pub last_message: String,
    pub modified_at: DateTime<Utc>,
}

impl Weigh for ChatRow {
    fn weight(&self) -> usize {
        self.id.weight() + self.peer_id.weight() + self.last_message.weight() + 12
    }
}

/// Chat rows of one user, most recently modified first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRows(Vec<ChatRow>);

impl ChatRows {
    pub fn new(mut rows: Vec<ChatRow>) -> Self {
        rows.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Self(rows)
    }

    pub fn rows(&self) -> &[ChatRow] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Weigh for ChatRows {
    fn weight(&self) -> usize {
        self.0.weight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(id: &str, hour: u32) -> Post {
        Post {
            id: id.to_string(),
            author_id: "u1".to_string(),
            caption: String::new(),
            image: None,
            likes: 0,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_post_collection_newest_first() {
        let posts = PostCollection::new(vec![post("old", 1), post("new", 9), post("mid", 5)]);
        let ids: Vec<_> = posts.posts().iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["new", "mid", "old"]);
        assert!(posts.contains("mid"));
    }

    #[test]
    fn test_chat_rows_most_recent_first() {
        let row = |id: &str, hour| ChatRow {
            id: id.to_string(),
            peer_id: "u2".to_string(),
            last_message: "hi".to_string(),
            modified_at: Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
        };
        let rows = ChatRows::new(vec![row("a", 3), row("b", 7)]);

        assert_eq!(rows.rows()[0].id, "b");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_profile_full_name_and_equality() {
        let profile = UserProfile {
            first_name: "Alice".to_string(),
            nickname: "alice".to_string(),
            ..Default::default()
        };
        assert_eq!(profile.full_name(), "Alice");

        let mut renamed = profile.clone();
        renamed.nickname = "alice2".to_string();
        assert_ne!(profile, renamed);
    }

    #[test]
    fn test_profile_deserialize_camel_case() {
        let json = r#"{"firstName":"A","lastName":"B","nickname":"ab","followers":["u2"]}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.full_name(), "A B");
        assert_eq!(profile.followers, vec!["u2".to_string()]);
        assert!(profile.following.is_empty());
    }

    #[test]
    fn test_weights() {
        assert_eq!(AvatarImage::new(vec![0u8; 64]).weight(), 64);
        assert_eq!(post("p1", 1).weight(), 2 + 2 + 8);
    }
}
