use std::collections::{HashMap, HashSet};

use log::{info, warn};

use super::{Hearth, count_from_reply};
use crate::{
    errors::FeedError,
    id::is_record_id,
    invalidation::NOTIFICATIONS_PATH,
    keys::index,
    repository::index as idx,
    runtime::commands::build_mark_read,
    types::{Comment, Notification, NotificationKind, Post, User, sort_newest_first},
    views::{CommentPreview, NotificationView, PostPreview, UserSummary},
};

fn unique_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    ids.collect::<HashSet<_>>().into_iter().map(str::to_string).collect()
}

impl Hearth {
    async fn load_notifications(&self, recipient_id: &str) -> Result<Vec<Notification>, FeedError> {
        let mut conn = self.connection();
        let ids = idx::newest_first(&mut conn, &self.keys().index(index::USER_NOTIFICATIONS, recipient_id)).await?;
        self.repo::<Notification>().get_many(&mut conn, &ids).await
    }

    /// The recipient's notifications, newest first, joined with actor, post and comment.
    pub async fn list_notifications(&self, recipient_id: &str) -> Result<Vec<NotificationView>, FeedError> {
        let notifications = self.load_notifications(recipient_id).await?;
        if notifications.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.connection();

        let actor_ids = unique_ids(notifications.iter().map(|n| n.actor_id.as_str()));
        let post_ids = unique_ids(notifications.iter().filter_map(|n| n.post_id.as_deref()));
        let comment_ids = unique_ids(
            notifications
                .iter()
                .filter(|n| n.kind == NotificationKind::Comment)
                .filter_map(|n| n.comment_id.as_deref()),
        );

        let users = self.repo::<User>().get_many(&mut conn, &actor_ids).await?;
        let posts = self.repo::<Post>().get_many(&mut conn, &post_ids).await?;
        let comments = self.repo::<Comment>().get_many(&mut conn, &comment_ids).await?;

        Ok(assemble_notifications(notifications, &users, &posts, &comments))
    }

    /// Marks the given notifications of `recipient_id` as read; returns how many flipped.
    ///
    /// Ids that are unknown, already read or addressed to someone else are skipped.
    pub async fn mark_read(&self, recipient_id: &str, notification_ids: &[String]) -> Result<u64, FeedError> {
        let ids: Vec<String> = notification_ids.iter().filter(|id| is_record_id(id)).cloned().collect();
        if ids.is_empty() {
            return Ok(0);
        }
        let reply = self.run(build_mark_read(&self.keys(), recipient_id, ids)).await?;
        let updated = count_from_reply(&reply, "updated");
        if updated > 0 {
            info!("{recipient_id} marked {updated} notifications read");
            self.invalidate(NOTIFICATIONS_PATH);
        }
        Ok(updated)
    }

    pub async fn unread_count(&self, recipient_id: &str) -> Result<u64, FeedError> {
        let notifications = self.load_notifications(recipient_id).await?;
        Ok(notifications.iter().filter(|n| !n.read).count() as u64)
    }
}

/// Joins notifications with their referenced records, newest first.
///
/// A notification whose actor is missing is dropped; a missing post or comment only
/// empties the corresponding preview.
pub fn assemble_notifications(
    mut notifications: Vec<Notification>,
    users: &[User],
    posts: &[Post],
    comments: &[Comment],
) -> Vec<NotificationView> {
    let users: HashMap<&str, &User> = users.iter().map(|u| (u.id.as_str(), u)).collect();
    let posts: HashMap<&str, &Post> = posts.iter().map(|p| (p.id.as_str(), p)).collect();
    let comments: HashMap<&str, &Comment> = comments.iter().map(|c| (c.id.as_str(), c)).collect();

    sort_newest_first(&mut notifications);
    notifications
        .into_iter()
        .filter_map(|notification| {
            let Some(actor) = users.get(notification.actor_id.as_str()) else {
                warn!("notification {} has unknown actor {}", notification.id, notification.actor_id);
                return None;
            };
            let post = notification
                .post_id
                .as_deref()
                .and_then(|id| posts.get(id))
                .map(|post| PostPreview {
                    id: post.id.clone(),
                    content: post.content.clone(),
                    image: post.image.clone(),
                });
            let comment = match notification.kind {
                NotificationKind::Comment => notification
                    .comment_id
                    .as_deref()
                    .and_then(|id| comments.get(id))
                    .map(|comment| CommentPreview {
                        id: comment.id.clone(),
                        content: comment.content.clone(),
                    }),
                _ => None,
            };
            Some(NotificationView {
                id: notification.id,
                kind: notification.kind,
                read: notification.read,
                created_at: notification.created_at,
                actor: UserSummary::from(*actor),
                post,
                comment,
            })
        })
        .collect()
}
