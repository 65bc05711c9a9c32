//! Serializable mutation commands.
//!
//! Each command is executed by exactly one Lua script, which is the unit of atomicity:
//! the primary write, its index maintenance and any notification either all land or none do.

use serde::Serialize;
use serde_json::Value;

use crate::{
    errors::{FeedError, ValidationError},
    fanout::NotificationDraft,
    keys::{KeyContext, collection, index},
    types::{Comment, Follow, Like, Post, User},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationCommand {
    ResolveUser(UserResolve),
    UpdateUser(UserUpdate),
    CreatePost(PostCreate),
    DeletePost(PostDelete),
    CreateLike(LikeCreate),
    DeleteLike(LikeDelete),
    CreateComment(CommentCreate),
    CreateFollow(FollowCreate),
    DeleteFollow(FollowDelete),
    MarkRead(MarkRead),
}

impl MutationCommand {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            MutationCommand::ResolveUser(_) => "resolve_user",
            MutationCommand::UpdateUser(_) => "update_user",
            MutationCommand::CreatePost(_) => "create_post",
            MutationCommand::DeletePost(_) => "delete_post",
            MutationCommand::CreateLike(_) => "create_like",
            MutationCommand::DeleteLike(_) => "delete_like",
            MutationCommand::CreateComment(_) => "create_comment",
            MutationCommand::CreateFollow(_) => "create_follow",
            MutationCommand::DeleteFollow(_) => "delete_follow",
            MutationCommand::MarkRead(_) => "mark_read",
        }
    }

    /// JSON handed to the script as `ARGV[1]`: the inner command without the enum tag.
    pub fn to_payload(&self) -> Result<String, FeedError> {
        let encoded = match self {
            MutationCommand::ResolveUser(cmd) => serde_json::to_string(cmd),
            MutationCommand::UpdateUser(cmd) => serde_json::to_string(cmd),
            MutationCommand::CreatePost(cmd) => serde_json::to_string(cmd),
            MutationCommand::DeletePost(cmd) => serde_json::to_string(cmd),
            MutationCommand::CreateLike(cmd) => serde_json::to_string(cmd),
            MutationCommand::DeleteLike(cmd) => serde_json::to_string(cmd),
            MutationCommand::CreateComment(cmd) => serde_json::to_string(cmd),
            MutationCommand::CreateFollow(cmd) => serde_json::to_string(cmd),
            MutationCommand::DeleteFollow(cmd) => serde_json::to_string(cmd),
            MutationCommand::MarkRead(cmd) => serde_json::to_string(cmd),
        };
        encoded.map_err(|err| FeedError::Other {
            message: format!("failed to serialize {} command: {err}", self.name()).into(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UserResolve {
    pub user_key: String,
    pub user_prefix: String,
    pub external_key: String,
    pub handle_key: String,
    pub handle: String,
    pub users_index: String,
    pub sequence_key: String,
    pub payload_json: String,
}

/// A single top-level field assignment on a stored user.
#[derive(Debug, Serialize)]
pub struct FieldAssignment {
    pub field: &'static str,
    pub value: Value,
}

#[derive(Debug, Serialize)]
pub struct UserUpdate {
    pub user_key: String,
    pub user_id: String,
    pub assignments: Vec<FieldAssignment>,
}

#[derive(Debug, Serialize)]
pub struct PostCreate {
    pub author_key: String,
    pub author_id: String,
    pub post_key: String,
    pub posts_index: String,
    pub author_posts_key: String,
    pub sequence_key: String,
    pub payload_json: String,
}

#[derive(Debug, Serialize)]
pub struct PostDelete {
    pub post_key: String,
    pub post_id: String,
    pub caller_id: String,
    pub author_key: String,
    pub posts_index: String,
    pub author_posts_key: String,
    pub post_notifications_key: String,
    pub notification_prefix: String,
    pub recipient_index_prefix: String,
    pub post_comments_key: String,
    pub comment_prefix: String,
    pub post_likes_key: String,
    pub like_prefix: String,
    pub user_likes_prefix: String,
}

#[derive(Debug, Serialize)]
pub struct LikeCreate {
    pub user_key: String,
    pub user_id: String,
    pub post_key: String,
    pub post_id: String,
    pub like_key: String,
    pub post_likes_key: String,
    pub user_likes_key: String,
    pub sequence_key: String,
    pub payload_json: String,
    pub notification: NotificationDraft,
}

#[derive(Debug, Serialize)]
pub struct LikeDelete {
    pub user_id: String,
    pub post_key: String,
    pub post_id: String,
    pub like_key: String,
    pub post_likes_key: String,
    pub user_likes_key: String,
}

#[derive(Debug, Serialize)]
pub struct CommentCreate {
    pub author_key: String,
    pub author_id: String,
    pub post_key: String,
    pub post_id: String,
    pub comment_key: String,
    pub post_comments_key: String,
    pub sequence_key: String,
    pub payload_json: String,
    pub notification: NotificationDraft,
}

#[derive(Debug, Serialize)]
pub struct FollowCreate {
    pub follower_key: String,
    pub follower_id: String,
    pub followee_key: String,
    pub followee_id: String,
    pub follow_key: String,
    pub following_key: String,
    pub followers_key: String,
    pub sequence_key: String,
    pub payload_json: String,
    pub notification: NotificationDraft,
}

#[derive(Debug, Serialize)]
pub struct FollowDelete {
    pub follower_id: String,
    pub followee_id: String,
    pub follow_key: String,
    pub following_key: String,
    pub followers_key: String,
}

#[derive(Debug, Serialize)]
pub struct MarkRead {
    pub recipient_id: String,
    pub notification_prefix: String,
    pub notification_ids: Vec<String>,
}

fn encode_record<T: Serialize>(record: &T) -> Result<String, ValidationError> {
    serde_json::to_string(record).map_err(|err| {
        ValidationError::single("payload", "serialization_error", format!("failed to serialize payload: {err}"))
    })
}

pub fn build_user_resolve(keys: &KeyContext<'_>, user: &User) -> Result<MutationCommand, ValidationError> {
    let handle = user.handle.to_lowercase();
    Ok(MutationCommand::ResolveUser(UserResolve {
        user_key: keys.entity(collection::USERS, &user.id),
        user_prefix: keys.entity_prefix(collection::USERS),
        external_key: keys.unique(collection::USERS, "external_id", &user.external_id),
        handle_key: keys.unique(collection::USERS, "handle", &handle),
        handle,
        users_index: keys.global_index(index::ALL_USERS),
        sequence_key: keys.sequence(),
        payload_json: encode_record(user)?,
    }))
}

pub fn build_user_update(keys: &KeyContext<'_>, user_id: &str, assignments: Vec<FieldAssignment>) -> MutationCommand {
    MutationCommand::UpdateUser(UserUpdate {
        user_key: keys.entity(collection::USERS, user_id),
        user_id: user_id.to_string(),
        assignments,
    })
}

pub fn build_post_create(keys: &KeyContext<'_>, post: &Post) -> Result<MutationCommand, ValidationError> {
    Ok(MutationCommand::CreatePost(PostCreate {
        author_key: keys.entity(collection::USERS, &post.author_id),
        author_id: post.author_id.clone(),
        post_key: keys.entity(collection::POSTS, &post.id),
        posts_index: keys.global_index(index::ALL_POSTS),
        author_posts_key: keys.index(index::USER_POSTS, &post.author_id),
        sequence_key: keys.sequence(),
        payload_json: encode_record(post)?,
    }))
}

pub fn build_post_delete(keys: &KeyContext<'_>, caller_id: &str, post_id: &str) -> MutationCommand {
    MutationCommand::DeletePost(PostDelete {
        post_key: keys.entity(collection::POSTS, post_id),
        post_id: post_id.to_string(),
        caller_id: caller_id.to_string(),
        author_key: keys.entity(collection::USERS, caller_id),
        posts_index: keys.global_index(index::ALL_POSTS),
        author_posts_key: keys.index(index::USER_POSTS, caller_id),
        post_notifications_key: keys.index(index::POST_NOTIFICATIONS, post_id),
        notification_prefix: keys.entity_prefix(collection::NOTIFICATIONS),
        recipient_index_prefix: keys.index_prefix(index::USER_NOTIFICATIONS),
        post_comments_key: keys.index(index::POST_COMMENTS, post_id),
        comment_prefix: keys.entity_prefix(collection::COMMENTS),
        post_likes_key: keys.index(index::POST_LIKES, post_id),
        like_prefix: keys.entity_prefix(collection::LIKES),
        user_likes_prefix: keys.index_prefix(index::USER_LIKES),
    })
}

pub fn build_like_create(
    keys: &KeyContext<'_>,
    like: &Like,
    notification: NotificationDraft,
) -> Result<MutationCommand, ValidationError> {
    Ok(MutationCommand::CreateLike(LikeCreate {
        user_key: keys.entity(collection::USERS, &like.user_id),
        user_id: like.user_id.clone(),
        post_key: keys.entity(collection::POSTS, &like.post_id),
        post_id: like.post_id.clone(),
        like_key: keys.composite(collection::LIKES, &like.user_id, &like.post_id),
        post_likes_key: keys.index(index::POST_LIKES, &like.post_id),
        user_likes_key: keys.index(index::USER_LIKES, &like.user_id),
        sequence_key: keys.sequence(),
        payload_json: encode_record(like)?,
        notification,
    }))
}

pub fn build_like_delete(keys: &KeyContext<'_>, user_id: &str, post_id: &str) -> MutationCommand {
    MutationCommand::DeleteLike(LikeDelete {
        user_id: user_id.to_string(),
        post_key: keys.entity(collection::POSTS, post_id),
        post_id: post_id.to_string(),
        like_key: keys.composite(collection::LIKES, user_id, post_id),
        post_likes_key: keys.index(index::POST_LIKES, post_id),
        user_likes_key: keys.index(index::USER_LIKES, user_id),
    })
}

pub fn build_comment_create(
    keys: &KeyContext<'_>,
    comment: &Comment,
    notification: NotificationDraft,
) -> Result<MutationCommand, ValidationError> {
    Ok(MutationCommand::CreateComment(CommentCreate {
        author_key: keys.entity(collection::USERS, &comment.author_id),
        author_id: comment.author_id.clone(),
        post_key: keys.entity(collection::POSTS, &comment.post_id),
        post_id: comment.post_id.clone(),
        comment_key: keys.entity(collection::COMMENTS, &comment.id),
        post_comments_key: keys.index(index::POST_COMMENTS, &comment.post_id),
        sequence_key: keys.sequence(),
        payload_json: encode_record(comment)?,
        notification,
    }))
}

pub fn build_follow_create(
    keys: &KeyContext<'_>,
    follow: &Follow,
    notification: NotificationDraft,
) -> Result<MutationCommand, ValidationError> {
    Ok(MutationCommand::CreateFollow(FollowCreate {
        follower_key: keys.entity(collection::USERS, &follow.follower_id),
        follower_id: follow.follower_id.clone(),
        followee_key: keys.entity(collection::USERS, &follow.followee_id),
        followee_id: follow.followee_id.clone(),
        follow_key: keys.composite(collection::FOLLOWS, &follow.follower_id, &follow.followee_id),
        following_key: keys.index(index::FOLLOWING, &follow.follower_id),
        followers_key: keys.index(index::FOLLOWERS, &follow.followee_id),
        sequence_key: keys.sequence(),
        payload_json: encode_record(follow)?,
        notification,
    }))
}

pub fn build_follow_delete(keys: &KeyContext<'_>, follower_id: &str, followee_id: &str) -> MutationCommand {
    MutationCommand::DeleteFollow(FollowDelete {
        follower_id: follower_id.to_string(),
        followee_id: followee_id.to_string(),
        follow_key: keys.composite(collection::FOLLOWS, follower_id, followee_id),
        following_key: keys.index(index::FOLLOWING, follower_id),
        followers_key: keys.index(index::FOLLOWERS, followee_id),
    })
}

pub fn build_mark_read(keys: &KeyContext<'_>, recipient_id: &str, notification_ids: Vec<String>) -> MutationCommand {
    MutationCommand::MarkRead(MarkRead {
        recipient_id: recipient_id.to_string(),
        notification_prefix: keys.entity_prefix(collection::NOTIFICATIONS),
        notification_ids,
    })
}
