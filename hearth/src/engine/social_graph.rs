use std::collections::HashSet;

use chrono::Utc;
use log::{info, warn};

use super::{Hearth, require_id};
use crate::{
    errors::FeedError,
    fanout::NotificationDraft,
    invalidation::FEED_PATH,
    keys::index,
    repository::index as idx,
    runtime::commands::{build_follow_create, build_follow_delete},
    types::{Follow, ToggleState, User},
    views::{Suggestion, UserSummary},
};

/// How many accounts "who to follow" offers when the caller does not say.
pub const DEFAULT_SUGGESTIONS: usize = 3;

impl Hearth {
    /// Flips the edge `follower_id -> followee_id`. Following yourself is rejected up front.
    pub async fn toggle_follow(&self, follower_id: &str, followee_id: &str) -> Result<ToggleState, FeedError> {
        if follower_id == followee_id {
            return Err(FeedError::invalid("followee_id", "self_follow", "cannot follow yourself"));
        }
        require_id("user", follower_id)?;
        require_id("user", followee_id)?;

        let keys = self.keys();
        let now = Utc::now();
        let follow = Follow {
            follower_id: follower_id.to_string(),
            followee_id: followee_id.to_string(),
            created_at: now,
            seq: 0,
        };
        let draft = NotificationDraft::follow(&keys, follower_id, followee_id, now);

        let state = match self
            .toggle_edge(
                || build_follow_create(&keys, &follow, draft.clone()),
                || build_follow_delete(&keys, follower_id, followee_id),
            )
            .await?
        {
            Some(state) => state,
            None => {
                warn!("follow {follower_id}/{followee_id} stayed contended, re-reading");
                if self.is_following(follower_id, followee_id).await? {
                    ToggleState::On
                } else {
                    ToggleState::Off
                }
            }
        };
        match state {
            ToggleState::On => info!("{follower_id} followed {followee_id}"),
            ToggleState::Off => info!("{follower_id} unfollowed {followee_id}"),
        }

        self.invalidate(FEED_PATH);
        Ok(state)
    }

    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> Result<bool, FeedError> {
        let mut conn = self.connection();
        idx::is_member(&mut conn, &self.keys().index(index::FOLLOWING, follower_id), followee_id).await
    }

    /// Users following `user_id`.
    pub async fn followers(&self, user_id: &str) -> Result<Vec<UserSummary>, FeedError> {
        self.summaries_in(&self.keys().index(index::FOLLOWERS, user_id)).await
    }

    /// Users `user_id` follows.
    pub async fn following(&self, user_id: &str) -> Result<Vec<UserSummary>, FeedError> {
        self.summaries_in(&self.keys().index(index::FOLLOWING, user_id)).await
    }

    async fn summaries_in(&self, set_key: &str) -> Result<Vec<UserSummary>, FeedError> {
        let mut conn = self.connection();
        let mut ids = idx::members(&mut conn, set_key).await?;
        ids.sort();
        let users = self.repo::<User>().get_many(&mut conn, &ids).await?;
        Ok(users.iter().map(UserSummary::from).collect())
    }

    /// "Who to follow": accounts the viewer does not follow yet, most-followed first.
    pub async fn suggest_users(&self, viewer_id: &str, limit: usize) -> Result<Vec<Suggestion>, FeedError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let keys = self.keys();
        let mut conn = self.connection();

        let following: HashSet<String> = idx::members(&mut conn, &keys.index(index::FOLLOWING, viewer_id))
            .await?
            .into_iter()
            .collect();
        let candidates: Vec<String> = idx::newest_first(&mut conn, &keys.global_index(index::ALL_USERS))
            .await?
            .into_iter()
            .filter(|id| id != viewer_id && !following.contains(id))
            .collect();

        let follower_keys: Vec<String> = candidates.iter().map(|id| keys.index(index::FOLLOWERS, id)).collect();
        let counts = idx::set_lens(&mut conn, &follower_keys).await?;
        let users = self.repo::<User>().get_many(&mut conn, &candidates).await?;

        let mut ranked: Vec<(u64, usize, &User)> = users
            .iter()
            .filter_map(|user| {
                let slot = candidates.iter().position(|id| id == &user.id)?;
                Some((counts.get(slot).copied().unwrap_or(0), slot, user))
            })
            .collect();
        // Stable on ties: newer accounts first, as read from the index.
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|(follower_count, _, user)| Suggestion {
                user: UserSummary::from(user),
                follower_count,
            })
            .collect())
    }
}
