//! Result-wrapped operations on behalf of one signed-in viewer.
//!
//! Every method returns an [`ActionResult`], so callers never see a raw store error.

use log::warn;

use crate::{
    engine::Hearth,
    errors::{ActionResult, FeedError},
    types::{Comment, Post, ToggleState},
    views::{FeedPost, NotificationView, PostDeletion},
};

#[derive(Clone)]
pub struct Session {
    hearth: Hearth,
    viewer_id: String,
}

fn wrap<T>(action: &str, result: Result<T, FeedError>) -> ActionResult<T> {
    if let Err(err) = &result
        && err.kind().is_retryable()
    {
        warn!("{action} failed: {err}");
    }
    ActionResult::from(result)
}

impl Session {
    pub fn new(hearth: Hearth, viewer_id: impl Into<String>) -> Self {
        Self {
            hearth,
            viewer_id: viewer_id.into(),
        }
    }

    pub fn viewer_id(&self) -> &str {
        &self.viewer_id
    }

    pub fn hearth(&self) -> &Hearth {
        &self.hearth
    }

    /// `image` is the upload service's URL; an empty string means no image.
    pub async fn create_post(&self, content: &str, image: &str) -> ActionResult<Post> {
        wrap("create_post", self.hearth.create_post(&self.viewer_id, content, Some(image)).await)
    }

    pub async fn delete_post(&self, post_id: &str) -> ActionResult<PostDeletion> {
        wrap("delete_post", self.hearth.delete_post(&self.viewer_id, post_id).await)
    }

    pub async fn toggle_like(&self, post_id: &str) -> ActionResult<ToggleState> {
        wrap("toggle_like", self.hearth.toggle_like(&self.viewer_id, post_id).await)
    }

    pub async fn create_comment(&self, post_id: &str, content: &str) -> ActionResult<Comment> {
        wrap("create_comment", self.hearth.create_comment(&self.viewer_id, post_id, content).await)
    }

    pub async fn toggle_follow(&self, followee_id: &str) -> ActionResult<ToggleState> {
        wrap("toggle_follow", self.hearth.toggle_follow(&self.viewer_id, followee_id).await)
    }

    pub async fn list_feed(&self) -> ActionResult<Vec<FeedPost>> {
        wrap("list_feed", self.hearth.list_feed().await)
    }

    pub async fn get_profile_feed(&self, handle: &str) -> ActionResult<Vec<FeedPost>> {
        wrap("get_profile_feed", self.hearth.profile_feed_by_handle(handle).await)
    }

    pub async fn get_liked_feed(&self, handle: &str) -> ActionResult<Vec<FeedPost>> {
        wrap("get_liked_feed", self.hearth.liked_feed_by_handle(handle).await)
    }

    pub async fn list_notifications(&self) -> ActionResult<Vec<NotificationView>> {
        wrap("list_notifications", self.hearth.list_notifications(&self.viewer_id).await)
    }

    /// Returns how many notifications flipped to read.
    pub async fn mark_read(&self, notification_ids: &[String]) -> ActionResult<u64> {
        wrap("mark_read", self.hearth.mark_read(&self.viewer_id, notification_ids).await)
    }
}
