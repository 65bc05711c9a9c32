use chrono::Utc;
use log::{info, warn};

use super::{Hearth, record_from_reply, require_id};
use crate::{
    errors::FeedError,
    fanout::NotificationDraft,
    id::generate_record_id,
    invalidation::FEED_PATH,
    keys::collection,
    runtime::commands::{build_comment_create, build_like_create, build_like_delete},
    types::{Comment, Like, ToggleState},
};

impl Hearth {
    /// Flips the like of `user_id` on `post_id` and reports where it landed.
    ///
    /// The like key is the only serialization point: a create that finds the key taken
    /// becomes a delete, and a delete that finds it gone starts another round.
    pub async fn toggle_like(&self, user_id: &str, post_id: &str) -> Result<ToggleState, FeedError> {
        require_id("user", user_id)?;
        require_id("post", post_id)?;
        let keys = self.keys();
        let now = Utc::now();
        let like = Like {
            user_id: user_id.to_string(),
            post_id: post_id.to_string(),
            created_at: now,
            seq: 0,
        };
        let draft = NotificationDraft::like(&keys, user_id, post_id, now);

        let state = match self
            .toggle_edge(
                || build_like_create(&keys, &like, draft.clone()),
                || build_like_delete(&keys, user_id, post_id),
            )
            .await?
        {
            Some(state) => state,
            None => {
                warn!("like {user_id}/{post_id} stayed contended, re-reading");
                if self.is_liked(user_id, post_id).await? {
                    ToggleState::On
                } else {
                    ToggleState::Off
                }
            }
        };
        match state {
            ToggleState::On => info!("{user_id} liked {post_id}"),
            ToggleState::Off => info!("{user_id} unliked {post_id}"),
        }

        self.invalidate(FEED_PATH);
        Ok(state)
    }

    pub async fn is_liked(&self, user_id: &str, post_id: &str) -> Result<bool, FeedError> {
        let key = self.keys().composite(collection::LIKES, user_id, post_id);
        let mut conn = self.connection();
        self.repo::<Like>().key_exists(&mut conn, &key).await
    }

    /// Adds a comment; the post author is notified in the same atomic write unless they wrote it.
    pub async fn create_comment(&self, author_id: &str, post_id: &str, content: &str) -> Result<Comment, FeedError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(FeedError::invalid("content", "required", "comment cannot be empty"));
        }
        require_id("user", author_id)?;
        require_id("post", post_id)?;

        let keys = self.keys();
        let comment = Comment {
            id: generate_record_id(),
            post_id: post_id.to_string(),
            author_id: author_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            seq: 0,
        };
        let draft = NotificationDraft::comment(&keys, author_id, post_id, comment.created_at);
        let reply = self.run(build_comment_create(&keys, &comment, draft)?).await?;
        let comment: Comment = record_from_reply(&reply)?;

        info!("{author_id} commented {} on {post_id}", comment.id);
        self.invalidate(FEED_PATH);
        Ok(comment)
    }
}
