//! Persisted records.
//!
//! Every record is stored as a JSON string under its own key. `seq` is assigned by the
//! store inside the committing script and breaks `created_at` ties when ordering.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::keys::collection;

/// A record type living in one collection of the keyspace.
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;

    fn created_at(&self) -> DateTime<Utc>;

    fn seq(&self) -> u64;

    /// Explicit ordering key: creation time, then store sequence.
    fn order_key(&self) -> (DateTime<Utc>, u64) {
        (self.created_at(), self.seq())
    }
}

/// Sorts newest first by [`Record::order_key`].
pub fn sort_newest_first<T: Record>(items: &mut [T]) {
    items.sort_by(|a, b| compare_order(b, a));
}

/// Sorts oldest first by [`Record::order_key`].
pub fn sort_oldest_first<T: Record>(items: &mut [T]) {
    items.sort_by(compare_order);
}

fn compare_order<T: Record>(a: &T, b: &T) -> Ordering {
    a.order_key().cmp(&b.order_key())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct User {
    pub id: String,
    /// Identity assigned by the external auth provider.
    pub external_id: String,
    pub name: String,
    /// Routing handle, unique case-insensitively.
    pub handle: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub seq: u64,
}

impl Record for User {
    const COLLECTION: &'static str = collection::USERS;

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub content: String,
    /// Opaque URL returned by the upload service.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub seq: u64,
}

impl Record for Post {
    const COLLECTION: &'static str = collection::POSTS;

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub seq: u64,
}

impl Record for Comment {
    const COLLECTION: &'static str = collection::COMMENTS;

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn seq(&self) -> u64 {
        self.seq
    }
}

/// Identified by `(user_id, post_id)`; stored under the composite key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: String,
    pub post_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub seq: u64,
}

impl Record for Like {
    const COLLECTION: &'static str = collection::LIKES;

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn seq(&self) -> u64 {
        self.seq
    }
}

/// Identified by `(follower_id, followee_id)`; never a self edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: String,
    pub followee_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub seq: u64,
}

impl Record for Follow {
    const COLLECTION: &'static str = collection::FOLLOWS;

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Like => "LIKE",
            NotificationKind::Comment => "COMMENT",
            NotificationKind::Follow => "FOLLOW",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Notification {
    pub id: String,
    pub recipient_id: String,
    /// The user whose action produced this notification.
    pub actor_id: String,
    pub kind: NotificationKind,
    pub post_id: Option<String>,
    /// Only set for [`NotificationKind::Comment`].
    pub comment_id: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub seq: u64,
}

impl Record for Notification {
    const COLLECTION: &'static str = collection::NOTIFICATIONS;

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn seq(&self) -> u64 {
        self.seq
    }
}

/// End state of a toggle as observed once the store settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ToggleState {
    On,
    Off,
}

impl ToggleState {
    pub fn is_on(self) -> bool {
        matches!(self, ToggleState::On)
    }
}
