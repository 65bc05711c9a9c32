use chrono::Utc;
use log::info;
use redis::cmd;
use serde::Deserialize;
use serde_json::Value;

use super::{Hearth, record_from_reply, require_id};
use crate::{
    errors::{FeedError, ValidationError, ValidationIssue},
    id::generate_record_id,
    invalidation::{FEED_PATH, profile_path},
    keys::{collection, index},
    repository::index as idx,
    runtime::commands::{FieldAssignment, build_user_resolve, build_user_update},
    types::User,
    validators::{is_valid_email, is_valid_handle, is_valid_url},
    views::{Profile, Resolution},
};

/// What the external auth provider knows about a signed-in identity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityClaims {
    pub external_id: String,
    pub name: String,
    pub handle: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

/// Profile fields to overwrite. `None` keeps the stored value; an empty string clears an
/// optional field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    fn into_assignments(self) -> Result<Vec<FieldAssignment>, ValidationError> {
        let mut issues = Vec::new();
        let mut assignments = Vec::new();

        if let Some(name) = self.name {
            let name = name.trim();
            if name.is_empty() {
                issues.push(ValidationIssue::new("name", "required", "name cannot be empty"));
            } else {
                assignments.push(FieldAssignment {
                    field: "name",
                    value: Value::String(name.to_string()),
                });
            }
        }

        if let Some(website) = self.website.as_deref().map(str::trim)
            && !website.is_empty()
            && !is_valid_url(website)
        {
            issues.push(ValidationIssue::new("website", "url", "website must be a valid URL"));
        }

        for (field, value) in [
            ("bio", self.bio),
            ("location", self.location),
            ("website", self.website),
            ("avatar", self.avatar),
        ] {
            let Some(value) = value else { continue };
            let value = value.trim();
            assignments.push(FieldAssignment {
                field,
                value: if value.is_empty() {
                    Value::Null
                } else {
                    Value::String(value.to_string())
                },
            });
        }

        if issues.is_empty() {
            Ok(assignments)
        } else {
            Err(ValidationError::new(issues))
        }
    }
}

fn validate_claims(claims: &IdentityClaims) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    if claims.external_id.trim().is_empty() {
        issues.push(ValidationIssue::new("external_id", "required", "external id is required"));
    }
    if !is_valid_handle(&claims.handle) {
        issues.push(ValidationIssue::new(
            "handle",
            "format",
            "handle must be 1-32 letters, digits or underscores",
        ));
    }
    if let Some(email) = claims.email.as_deref()
        && !email.is_empty()
        && !is_valid_email(email)
    {
        issues.push(ValidationIssue::new("email", "email", "email address is not valid"));
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(issues))
    }
}

impl Hearth {
    /// Get-or-create the user behind an external identity. Safe to call on every sign-in.
    pub async fn resolve_user(&self, claims: IdentityClaims) -> Result<Resolution, FeedError> {
        validate_claims(&claims)?;
        let name = match claims.name.trim() {
            "" => claims.handle.clone(),
            name => name.to_string(),
        };
        let candidate = User {
            id: generate_record_id(),
            external_id: claims.external_id.trim().to_string(),
            name,
            handle: claims.handle,
            email: claims.email.filter(|email| !email.is_empty()),
            avatar: claims.avatar.filter(|avatar| !avatar.trim().is_empty()),
            bio: None,
            location: None,
            website: None,
            created_at: Utc::now(),
            seq: 0,
        };

        let reply = self.run(build_user_resolve(&self.keys(), &candidate)?).await?;
        let user: User = record_from_reply(&reply)?;
        let created = reply.get("created").and_then(Value::as_bool).unwrap_or(false);
        if created {
            info!("user {} (@{}) created for {}", user.id, user.handle, user.external_id);
        }
        Ok(Resolution { user, created })
    }

    /// Looks a user up by handle, case-insensitively.
    pub async fn user_by_handle(&self, handle: &str) -> Result<User, FeedError> {
        if !is_valid_handle(handle) {
            return Err(FeedError::not_found("user", handle));
        }
        let key = self.keys().unique(collection::USERS, "handle", &handle.to_lowercase());
        let mut conn = self.connection();
        let user_id: Option<String> = cmd("GET").arg(&key).query_async(&mut conn).await?;
        match user_id {
            Some(user_id) => self.repo::<User>().get_or_error(&mut conn, &user_id).await,
            None => Err(FeedError::not_found("user", handle)),
        }
    }

    /// User plus follower, following and post counts.
    pub async fn get_profile(&self, handle: &str) -> Result<Profile, FeedError> {
        let user = self.user_by_handle(handle).await?;
        let keys = self.keys();
        let mut conn = self.connection();
        let follower_count = idx::set_len(&mut conn, &keys.index(index::FOLLOWERS, &user.id)).await?;
        let following_count = idx::set_len(&mut conn, &keys.index(index::FOLLOWING, &user.id)).await?;
        let post_count = idx::sorted_len(&mut conn, &keys.index(index::USER_POSTS, &user.id)).await?;
        Ok(Profile {
            user,
            follower_count,
            following_count,
            post_count,
        })
    }

    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<User, FeedError> {
        require_id("user", user_id)?;
        let assignments = update.into_assignments()?;
        if assignments.is_empty() {
            let mut conn = self.connection();
            return self.repo::<User>().get_or_error(&mut conn, user_id).await;
        }

        let reply = self.run(build_user_update(&self.keys(), user_id, assignments)).await?;
        let user: User = record_from_reply(&reply)?;

        info!("user {} updated their profile", user.id);
        self.invalidate(&profile_path(&user.handle));
        self.invalidate(FEED_PATH);
        Ok(user)
    }
}
