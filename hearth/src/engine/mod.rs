//! The `Hearth` handle and the operations grouped by concern.
//!
//! - `posting` - create and delete posts (with cascade)
//! - `engagement` - like toggling and comments
//! - `social_graph` - follow toggling and suggestions
//! - `notifications` - listing and read-state
//! - `feed` - feed, profile and liked-post reads
//! - `users` - identity resolution and profiles

mod engagement;
mod feed;
mod notifications;
mod posting;
mod social_graph;
mod users;

pub use feed::assemble_feed;
pub use notifications::assemble_notifications;
pub use social_graph::DEFAULT_SUGGESTIONS;
pub use users::{IdentityClaims, ProfileUpdate};

use std::sync::Arc;

use log::{debug, warn};
use redis::aio::ConnectionManager;
use serde_json::Value;

use crate::{
    errors::{FeedError, ValidationError},
    id::is_record_id,
    invalidation::{FeedInvalidator, NoopInvalidator},
    keys::{KeyContext, SERVICE},
    repository::{Repo, decode},
    runtime::{MutationExecutor, RedisExecutor, commands::MutationCommand},
    session::Session,
    types::{Record, ToggleState},
};

/// Create/delete rounds a toggle attempts before settling for a re-read of the edge.
const TOGGLE_ROUNDS: usize = 8;

/// Entry point for every social operation.
///
/// Cloning is cheap: the connection manager multiplexes one Redis connection and the
/// invalidator is shared.
#[derive(Clone)]
pub struct Hearth {
    conn: ConnectionManager,
    prefix: String,
    invalidator: Arc<dyn FeedInvalidator>,
}

impl Hearth {
    /// Create a handle over an existing connection; keys live under `prefix`.
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
            invalidator: Arc::new(NoopInvalidator),
        }
    }

    /// Open a connection manager for `url` and wrap it.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, FeedError> {
        let redis_client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(redis_client).await?;
        Ok(Self::new(conn, prefix))
    }

    /// Replace the post-commit invalidation signal.
    pub fn with_invalidator(mut self, invalidator: Arc<dyn FeedInvalidator>) -> Self {
        self.invalidator = invalidator;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Get a clone of the connection manager for advanced operations.
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Bind a viewer to this handle for the result-wrapped surface.
    pub fn session(&self, viewer_id: impl Into<String>) -> Session {
        Session::new(self.clone(), viewer_id)
    }

    pub(crate) fn keys(&self) -> KeyContext<'_> {
        KeyContext::new(&self.prefix, SERVICE)
    }

    pub(crate) fn repo<T: Record>(&self) -> Repo<T> {
        Repo::new(self.prefix.clone())
    }

    pub(crate) async fn run(&self, command: MutationCommand) -> Result<Value, FeedError> {
        let mut conn = self.conn.clone();
        let mut executor = RedisExecutor::new(&mut conn);
        executor.execute(command).await
    }

    /// Flips a composite-key edge: create it, or delete it if the create found it present.
    ///
    /// Losing both races in a round means another caller flipped the edge twice in between,
    /// so the round starts over. Each returned state is a transition this call committed;
    /// `None` means every round was contended.
    pub(crate) async fn toggle_edge(
        &self,
        create: impl Fn() -> Result<MutationCommand, ValidationError>,
        delete: impl Fn() -> MutationCommand,
    ) -> Result<Option<ToggleState>, FeedError> {
        for round in 1..=TOGGLE_ROUNDS {
            match self.run(create()?).await {
                Ok(_) => return Ok(Some(ToggleState::On)),
                Err(FeedError::Conflict { key }) => debug!("{key} already present, removing"),
                Err(err) => return Err(err),
            }
            match self.run(delete()).await {
                Ok(_) => return Ok(Some(ToggleState::Off)),
                Err(FeedError::Conflict { key }) => warn!("{key} vanished during toggle (round {round})"),
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }

    /// Fires the invalidation signal; a failure is logged and otherwise ignored.
    pub(crate) fn invalidate(&self, path: &str) {
        if let Err(err) = self.invalidator.invalidate(path) {
            warn!("{err}");
        }
    }
}

/// Ids are spliced into keys, so anything we could not have generated cannot exist.
pub(crate) fn require_id(entity: &'static str, id: &str) -> Result<(), FeedError> {
    if is_record_id(id) {
        Ok(())
    } else {
        Err(FeedError::not_found(entity, id))
    }
}

/// Decodes the `record_json` a creating script echoes back with its store sequence.
pub(crate) fn record_from_reply<T: Record>(reply: &Value) -> Result<T, FeedError> {
    let raw = reply.get("record_json").and_then(Value::as_str).ok_or_else(|| FeedError::Other {
        message: "script reply is missing record_json".into(),
    })?;
    decode(raw)
}

pub(crate) fn count_from_reply(reply: &Value, field: &str) -> u64 {
    reply.get(field).and_then(Value::as_u64).unwrap_or(0)
}
