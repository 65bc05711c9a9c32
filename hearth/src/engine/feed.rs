use std::collections::{BTreeSet, HashMap, HashSet};

use log::warn;
use redis::{FromRedisValue, Value as RedisValue};

use super::Hearth;
use crate::{
    errors::FeedError,
    keys::{collection, index},
    repository::{decode, index as idx},
    types::{Comment, Post, User, sort_newest_first, sort_oldest_first},
    views::{FeedComment, FeedPost, UserSummary},
};

/// One post as read inside a single MULTI/EXEC snapshot.
struct PostSnapshot {
    post: Post,
    comment_ids: Vec<String>,
    liker_ids: Vec<String>,
}

fn from_value<T: FromRedisValue>(value: Option<&RedisValue>) -> Result<T, FeedError> {
    let value = value.ok_or_else(|| FeedError::Other {
        message: "feed snapshot is missing a reply".into(),
    })?;
    Ok(T::from_redis_value(value)?)
}

impl Hearth {
    /// Every post, newest first.
    pub async fn list_feed(&self) -> Result<Vec<FeedPost>, FeedError> {
        let mut conn = self.connection();
        let ids = idx::newest_first(&mut conn, &self.keys().global_index(index::ALL_POSTS)).await?;
        self.load_feed(&ids).await
    }

    /// Posts authored by `user_id`, newest first.
    pub async fn get_profile_feed(&self, user_id: &str) -> Result<Vec<FeedPost>, FeedError> {
        let mut conn = self.connection();
        self.repo::<User>().get_or_error(&mut conn, user_id).await?;
        let ids = idx::newest_first(&mut conn, &self.keys().index(index::USER_POSTS, user_id)).await?;
        self.load_feed(&ids).await
    }

    /// Posts liked by `user_id`, newest post first.
    pub async fn get_liked_feed(&self, user_id: &str) -> Result<Vec<FeedPost>, FeedError> {
        let mut conn = self.connection();
        self.repo::<User>().get_or_error(&mut conn, user_id).await?;
        let ids = idx::members(&mut conn, &self.keys().index(index::USER_LIKES, user_id)).await?;
        self.load_feed(&ids).await
    }

    pub async fn profile_feed_by_handle(&self, handle: &str) -> Result<Vec<FeedPost>, FeedError> {
        let user = self.user_by_handle(handle).await?;
        self.get_profile_feed(&user.id).await
    }

    pub async fn liked_feed_by_handle(&self, handle: &str) -> Result<Vec<FeedPost>, FeedError> {
        let user = self.user_by_handle(handle).await?;
        self.get_liked_feed(&user.id).await
    }

    /// Joins posts with authors, comments and likers.
    ///
    /// Posts, comment ids and liker ids come from one atomic pipeline, so counts always
    /// agree with the lists they summarize.
    async fn load_feed(&self, post_ids: &[String]) -> Result<Vec<FeedPost>, FeedError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys = self.keys();
        let mut conn = self.connection();

        let post_keys: Vec<String> = post_ids.iter().map(|id| keys.entity(collection::POSTS, id)).collect();
        let mut pipe = redis::pipe();
        pipe.atomic();
        pipe.cmd("MGET").arg(&post_keys);
        for id in post_ids {
            pipe.cmd("ZRANGE").arg(keys.index(index::POST_COMMENTS, id)).arg(0).arg(-1);
            pipe.cmd("SMEMBERS").arg(keys.index(index::POST_LIKES, id));
        }
        let replies: Vec<RedisValue> = pipe.query_async(&mut conn).await?;

        let raw_posts: Vec<Option<String>> = from_value(replies.first())?;
        let mut snapshots = Vec::with_capacity(post_ids.len());
        for (slot, raw) in raw_posts.iter().enumerate() {
            // A post deleted between the index read and the snapshot simply drops out.
            let Some(raw) = raw else { continue };
            snapshots.push(PostSnapshot {
                post: decode::<Post>(raw)?,
                comment_ids: from_value(replies.get(1 + slot * 2))?,
                liker_ids: from_value(replies.get(2 + slot * 2))?,
            });
        }

        let comment_ids: Vec<String> = snapshots.iter().flat_map(|s| s.comment_ids.iter().cloned()).collect();
        let comments = self.repo::<Comment>().get_many(&mut conn, &comment_ids).await?;

        let author_ids: Vec<String> = snapshots
            .iter()
            .map(|s| s.post.author_id.clone())
            .chain(comments.iter().map(|c| c.author_id.clone()))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let users = self.repo::<User>().get_many(&mut conn, &author_ids).await?;

        let mut posts = Vec::with_capacity(snapshots.len());
        let mut likes = HashMap::new();
        for snapshot in snapshots {
            likes.insert(snapshot.post.id.clone(), snapshot.liker_ids);
            posts.push(snapshot.post);
        }
        Ok(assemble_feed(posts, comments, likes, &users))
    }
}

/// Builds feed items from loaded records.
///
/// Posts come out newest first and comments oldest first. Records whose author cannot be
/// found are dropped.
pub fn assemble_feed(
    mut posts: Vec<Post>,
    mut comments: Vec<Comment>,
    mut likes: HashMap<String, Vec<String>>,
    users: &[User],
) -> Vec<FeedPost> {
    let authors: HashMap<&str, UserSummary> = users.iter().map(|u| (u.id.as_str(), UserSummary::from(u))).collect();

    sort_newest_first(&mut posts);
    sort_oldest_first(&mut comments);

    let mut comments_by_post: HashMap<String, Vec<FeedComment>> = HashMap::new();
    for comment in comments {
        let Some(author) = authors.get(comment.author_id.as_str()) else {
            warn!("comment {} has unknown author {}", comment.id, comment.author_id);
            continue;
        };
        comments_by_post.entry(comment.post_id).or_default().push(FeedComment {
            id: comment.id,
            content: comment.content,
            created_at: comment.created_at,
            author: author.clone(),
        });
    }

    posts
        .into_iter()
        .filter_map(|post| {
            let Some(author) = authors.get(post.author_id.as_str()) else {
                warn!("post {} has unknown author {}", post.id, post.author_id);
                return None;
            };
            let comments = comments_by_post.remove(&post.id).unwrap_or_default();
            let liked_by: BTreeSet<String> = likes.remove(&post.id).unwrap_or_default().into_iter().collect();
            Some(FeedPost {
                comment_count: comments.len(),
                like_count: liked_by.len(),
                id: post.id,
                content: post.content,
                image: post.image,
                created_at: post.created_at,
                author: author.clone(),
                comments,
                liked_by,
            })
        })
        .collect()
}
