//! Notification fanout.
//!
//! Engines never write notifications themselves. They attach a [`NotificationDraft`] to the
//! mutation command, and the shared Lua `fanout` routine (`lua/fanout.lua`, prepended to every
//! mutation script) materialises it inside the same script as the triggering write. That routine
//! resolves the recipient and drops the draft when recipient and actor are the same user.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    id::generate_record_id,
    keys::{KeyContext, collection, index},
    types::NotificationKind,
};

/// Who receives a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Recipient {
    /// Author of the post the command touches, resolved inside the script.
    PostAuthor,
    User(String),
}

/// Key fragments the fanout routine needs to write and index a notification.
#[derive(Debug, Clone, Serialize)]
pub struct FanoutKeys {
    pub notification_prefix: String,
    pub recipient_index_prefix: String,
    pub post_index_prefix: String,
    pub sequence: String,
}

impl FanoutKeys {
    pub fn new(keys: &KeyContext<'_>) -> Self {
        Self {
            notification_prefix: keys.entity_prefix(collection::NOTIFICATIONS),
            recipient_index_prefix: keys.index_prefix(index::USER_NOTIFICATIONS),
            post_index_prefix: keys.index_prefix(index::POST_NOTIFICATIONS),
            sequence: keys.sequence(),
        }
    }
}

/// A notification the store should emit if, and only if, the surrounding mutation commits.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationDraft {
    pub id: String,
    pub kind: NotificationKind,
    pub actor_id: String,
    pub recipient: Recipient,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub keys: FanoutKeys,
}

impl NotificationDraft {
    fn new(
        keys: &KeyContext<'_>,
        kind: NotificationKind,
        actor_id: &str,
        recipient: Recipient,
        post_id: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_record_id(),
            kind,
            actor_id: actor_id.to_string(),
            recipient,
            post_id: post_id.map(str::to_string),
            created_at,
            keys: FanoutKeys::new(keys),
        }
    }

    /// LIKE addressed to the liked post's author.
    pub fn like(keys: &KeyContext<'_>, actor_id: &str, post_id: &str, created_at: DateTime<Utc>) -> Self {
        Self::new(keys, NotificationKind::Like, actor_id, Recipient::PostAuthor, Some(post_id), created_at)
    }

    /// COMMENT addressed to the post's author; the script attaches the new comment id.
    pub fn comment(keys: &KeyContext<'_>, actor_id: &str, post_id: &str, created_at: DateTime<Utc>) -> Self {
        Self::new(
            keys,
            NotificationKind::Comment,
            actor_id,
            Recipient::PostAuthor,
            Some(post_id),
            created_at,
        )
    }

    /// FOLLOW addressed to the followee, with no post or comment reference.
    pub fn follow(keys: &KeyContext<'_>, actor_id: &str, followee_id: &str, created_at: DateTime<Utc>) -> Self {
        Self::new(
            keys,
            NotificationKind::Follow,
            actor_id,
            Recipient::User(followee_id.to_string()),
            None,
            created_at,
        )
    }
}
