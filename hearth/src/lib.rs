//! hearth: social feed backend on Redis.
//!
//! Posts, likes, comments, follows and the notifications they produce. Every mutation runs
//! as one Lua script, so a like and its notification (or a post and its cascade) commit
//! together or not at all. Reads assemble denormalized feed and notification views.
//!
//! ```ignore
//! let hearth = Hearth::connect("redis://127.0.0.1/", "hearth").await?;
//! let alice = hearth.resolve_user(claims).await?.user;
//! let post = hearth.create_post(&alice.id, "hello", None).await?;
//! let state = hearth.toggle_like(&bob_id, &post.id).await?;
//! ```

pub mod engine;
pub mod errors;
pub mod fanout;
pub mod id;
pub mod invalidation;
pub mod keys;
pub mod repository;
pub mod runtime;
pub mod session;
pub mod types;
pub mod validators;
pub mod views;

pub use engine::{DEFAULT_SUGGESTIONS, Hearth, IdentityClaims, ProfileUpdate};
pub use errors::{ActionResult, ErrorKind, FeedError, ValidationError, ValidationIssue};
pub use invalidation::{FeedInvalidator, InvalidationError, LogInvalidator, NoopInvalidator, RecordingInvalidator};
pub use session::Session;
pub use types::{Comment, Follow, Like, Notification, NotificationKind, Post, ToggleState, User};
pub use views::{
    CommentPreview, FeedComment, FeedPost, NotificationView, PostDeletion, PostPreview, Profile, Resolution, Suggestion,
    UserSummary,
};

/// Glob matching every key written under `prefix`. Useful for test cleanup.
pub fn cleanup_pattern(prefix: &str) -> String {
    keys::KeyContext::new(prefix, keys::SERVICE).pattern()
}
