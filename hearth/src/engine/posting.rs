use chrono::Utc;
use log::info;

use super::{Hearth, count_from_reply, record_from_reply, require_id};
use crate::{
    errors::FeedError,
    id::generate_record_id,
    invalidation::{FEED_PATH, profile_path},
    runtime::commands::{build_post_create, build_post_delete},
    types::Post,
    views::PostDeletion,
};

/// An empty or whitespace-only image reference means "no image".
fn normalize_image(image: Option<&str>) -> Option<String> {
    image.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

impl Hearth {
    /// Publishes a post. Content may only be blank when an image is attached.
    pub async fn create_post(&self, author_id: &str, content: &str, image: Option<&str>) -> Result<Post, FeedError> {
        require_id("user", author_id)?;
        let image = normalize_image(image);
        if content.trim().is_empty() && image.is_none() {
            return Err(FeedError::invalid("content", "required", "a post needs text or an image"));
        }

        let post = Post {
            id: generate_record_id(),
            author_id: author_id.to_string(),
            content: content.to_string(),
            image,
            created_at: Utc::now(),
            seq: 0,
        };
        let command = build_post_create(&self.keys(), &post)?;
        let reply = self.run(command).await?;
        let post: Post = record_from_reply(&reply)?;

        info!("post {} created by {}", post.id, post.author_id);
        self.invalidate(FEED_PATH);
        self.invalidate_author_profile(&reply);
        Ok(post)
    }

    /// Deletes a post owned by `caller_id` together with its notifications, comments and likes.
    pub async fn delete_post(&self, caller_id: &str, post_id: &str) -> Result<PostDeletion, FeedError> {
        require_id("post", post_id)?;
        let reply = self.run(build_post_delete(&self.keys(), caller_id, post_id)).await?;
        let removed = PostDeletion {
            notifications: count_from_reply(&reply, "notifications"),
            comments: count_from_reply(&reply, "comments"),
            likes: count_from_reply(&reply, "likes"),
        };

        info!(
            "post {post_id} deleted by {caller_id} ({} notifications, {} comments, {} likes)",
            removed.notifications, removed.comments, removed.likes
        );
        self.invalidate(FEED_PATH);
        self.invalidate_author_profile(&reply);
        Ok(removed)
    }

    /// Post scripts echo the author's handle so the profile page can be refreshed too.
    fn invalidate_author_profile(&self, reply: &serde_json::Value) {
        if let Some(handle) = reply.get("author_handle").and_then(|v| v.as_str()) {
            self.invalidate(&profile_path(handle));
        }
    }
}
