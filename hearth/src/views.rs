//! Denormalized read models produced by the feed and notification assemblers.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{NotificationKind, User};

/// Compact user projection embedded in feed items and notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub handle: String,
    pub avatar: Option<String>,
}

impl UserSummary {
    /// Display name, falling back to the handle when the name is blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.handle
        } else {
            &self.name
        }
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            handle: user.handle.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct FeedComment {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: UserSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct FeedPost {
    pub id: String,
    pub content: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: UserSummary,
    /// Oldest first.
    pub comments: Vec<FeedComment>,
    pub liked_by: BTreeSet<String>,
    pub like_count: usize,
    pub comment_count: usize,
}

impl FeedPost {
    pub fn liked_by_viewer(&self, viewer_id: &str) -> bool {
        self.liked_by.contains(viewer_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PostPreview {
    pub id: String,
    pub content: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CommentPreview {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct NotificationView {
    pub id: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub actor: UserSummary,
    pub post: Option<PostPreview>,
    pub comment: Option<CommentPreview>,
}

/// A user with relationship counts, as shown on a profile page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Profile {
    pub user: User,
    pub follower_count: u64,
    pub following_count: u64,
    pub post_count: u64,
}

/// A follow suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Suggestion {
    pub user: UserSummary,
    pub follower_count: u64,
}

/// What a post deletion removed along with the post itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PostDeletion {
    pub notifications: u64,
    pub comments: u64,
    pub likes: u64,
}

/// Outcome of resolving an external identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Resolution {
    pub user: User,
    /// `true` when this call created the user.
    pub created: bool,
}
