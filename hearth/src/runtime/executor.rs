use std::borrow::Cow;

use log::debug;
use redis::{Script, aio::ConnectionLike};
use serde_json::Value;

use crate::{
    errors::FeedError,
    runtime::{
        commands::MutationCommand,
        scripts::{
            COMMENT_CREATE_SCRIPT, FOLLOW_CREATE_SCRIPT, FOLLOW_DELETE_SCRIPT, LIKE_CREATE_SCRIPT,
            LIKE_DELETE_SCRIPT, MARK_READ_SCRIPT, POST_CREATE_SCRIPT, POST_DELETE_SCRIPT, USER_RESOLVE_SCRIPT,
            USER_UPDATE_SCRIPT,
        },
    },
};

fn script_for(command: &MutationCommand) -> &'static Script {
    match command {
        MutationCommand::ResolveUser(_) => &USER_RESOLVE_SCRIPT,
        MutationCommand::UpdateUser(_) => &USER_UPDATE_SCRIPT,
        MutationCommand::CreatePost(_) => &POST_CREATE_SCRIPT,
        MutationCommand::DeletePost(_) => &POST_DELETE_SCRIPT,
        MutationCommand::CreateLike(_) => &LIKE_CREATE_SCRIPT,
        MutationCommand::DeleteLike(_) => &LIKE_DELETE_SCRIPT,
        MutationCommand::CreateComment(_) => &COMMENT_CREATE_SCRIPT,
        MutationCommand::CreateFollow(_) => &FOLLOW_CREATE_SCRIPT,
        MutationCommand::DeleteFollow(_) => &FOLLOW_DELETE_SCRIPT,
        MutationCommand::MarkRead(_) => &MARK_READ_SCRIPT,
    }
}

/// Runs one command as one script invocation and returns the script's `ok` reply.
pub async fn execute_command<C>(conn: &mut C, command: &MutationCommand) -> Result<Value, FeedError>
where
    C: ConnectionLike + Send,
{
    let payload = command.to_payload()?;
    debug!("executing {} ({} bytes)", command.name(), payload.len());

    let mut invocation = script_for(command).prepare_invoke();
    invocation.arg(payload);
    let raw: String = invocation.invoke_async(conn).await.map_err(FeedError::from)?;

    let value: Value = serde_json::from_str(&raw).map_err(|err| FeedError::Other {
        message: Cow::Owned(format!("failed to parse lua response: {err}")),
    })?;

    match value.get("error") {
        Some(error) => Err(error_from_reply(error.as_str(), &value)),
        None => Ok(value),
    }
}

/// Maps a script error reply onto the error taxonomy.
pub fn error_from_reply(code: Option<&str>, reply: &Value) -> FeedError {
    let text = |field: &str| reply.get(field).and_then(|v| v.as_str()).map(|s| s.to_string());

    match code {
        Some("entity_not_found") => FeedError::NotFound {
            entity: entity_name(text("entity").as_deref()),
            id: text("entity_id"),
        },
        Some("duplicate_key") | Some("absent_key") => FeedError::Conflict {
            key: text("key").unwrap_or_default(),
        },
        Some("unauthorized") => FeedError::Unauthorized {
            action: Cow::Owned(text("action").unwrap_or_else(|| "mutation".to_string())),
        },
        Some("unique_violation") => {
            let field = text("field").unwrap_or_else(|| "value".to_string());
            let message = format!("{field} is already taken");
            FeedError::invalid(field, "unique", message)
        }
        Some("invalid_input") => FeedError::invalid(
            text("field").unwrap_or_else(|| "input".to_string()),
            "invalid",
            text("message").unwrap_or_else(|| "invalid input".to_string()),
        ),
        Some(other) => FeedError::Other {
            message: Cow::Owned(other.to_string()),
        },
        None => FeedError::Other {
            message: Cow::Borrowed("lua_error"),
        },
    }
}

fn entity_name(raw: Option<&str>) -> &'static str {
    match raw {
        Some("user") => "user",
        Some("post") => "post",
        Some("comment") => "comment",
        Some("notification") => "notification",
        _ => "record",
    }
}

#[allow(async_fn_in_trait)]
pub trait MutationExecutor {
    async fn execute(&mut self, command: MutationCommand) -> Result<Value, FeedError>;
}

pub struct RedisExecutor<'a, C>
where
    C: ConnectionLike + Send,
{
    connection: &'a mut C,
}

impl<'a, C> RedisExecutor<'a, C>
where
    C: ConnectionLike + Send,
{
    pub fn new(connection: &'a mut C) -> Self {
        Self { connection }
    }
}

impl<'a, C> MutationExecutor for RedisExecutor<'a, C>
where
    C: ConnectionLike + Send,
{
    async fn execute(&mut self, command: MutationCommand) -> Result<Value, FeedError> {
        execute_command(&mut *self.connection, &command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;

    #[test]
    fn maps_script_error_codes() {
        let reply = json!({"error": "entity_not_found", "entity": "post", "entity_id": "p1"});
        match error_from_reply(Some("entity_not_found"), &reply) {
            FeedError::NotFound { entity, id } => {
                assert_eq!(entity, "post");
                assert_eq!(id.as_deref(), Some("p1"));
            }
            other => panic!("unexpected {other:?}"),
        }

        let reply = json!({"error": "duplicate_key", "key": "t:social:likes:u:p"});
        assert_eq!(error_from_reply(Some("duplicate_key"), &reply).kind(), ErrorKind::Conflict);

        let reply = json!({"error": "absent_key", "key": "k"});
        assert_eq!(error_from_reply(Some("absent_key"), &reply).kind(), ErrorKind::Conflict);

        let reply = json!({"error": "unauthorized", "action": "delete post"});
        assert_eq!(error_from_reply(Some("unauthorized"), &reply).kind(), ErrorKind::Unauthorized);

        let reply = json!({"error": "unique_violation", "field": "handle"});
        assert_eq!(error_from_reply(Some("unique_violation"), &reply).kind(), ErrorKind::InvalidInput);

        let reply = json!({"error": "boom"});
        assert_eq!(error_from_reply(Some("boom"), &reply).kind(), ErrorKind::Internal);
        assert_eq!(error_from_reply(None, &reply).kind(), ErrorKind::Internal);
    }
}
