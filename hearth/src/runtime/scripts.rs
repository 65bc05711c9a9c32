use redis::Script;
use std::sync::LazyLock;

pub const PRELUDE_SCRIPT_BODY: &str = include_str!("../../lua/prelude.lua");
pub const FANOUT_SCRIPT_BODY: &str = include_str!("../../lua/fanout.lua");

pub const USER_RESOLVE_SCRIPT_BODY: &str = include_str!("../../lua/user_resolve.lua");
pub const USER_UPDATE_SCRIPT_BODY: &str = include_str!("../../lua/user_update.lua");
pub const POST_CREATE_SCRIPT_BODY: &str = include_str!("../../lua/post_create.lua");
pub const POST_DELETE_SCRIPT_BODY: &str = include_str!("../../lua/post_delete.lua");
pub const LIKE_CREATE_SCRIPT_BODY: &str = include_str!("../../lua/like_create.lua");
pub const LIKE_DELETE_SCRIPT_BODY: &str = include_str!("../../lua/like_delete.lua");
pub const COMMENT_CREATE_SCRIPT_BODY: &str = include_str!("../../lua/comment_create.lua");
pub const FOLLOW_CREATE_SCRIPT_BODY: &str = include_str!("../../lua/follow_create.lua");
pub const FOLLOW_DELETE_SCRIPT_BODY: &str = include_str!("../../lua/follow_delete.lua");
pub const MARK_READ_SCRIPT_BODY: &str = include_str!("../../lua/notifications_mark_read.lua");

/// Prepends the shared helpers and the fanout routine to a script body.
pub fn compose(body: &str) -> String {
    format!("{PRELUDE_SCRIPT_BODY}\n{FANOUT_SCRIPT_BODY}\n{body}")
}

fn composed(body: &str) -> Script {
    Script::new(&compose(body))
}

pub static USER_RESOLVE_SCRIPT: LazyLock<Script> = LazyLock::new(|| composed(USER_RESOLVE_SCRIPT_BODY));
pub static USER_UPDATE_SCRIPT: LazyLock<Script> = LazyLock::new(|| composed(USER_UPDATE_SCRIPT_BODY));
pub static POST_CREATE_SCRIPT: LazyLock<Script> = LazyLock::new(|| composed(POST_CREATE_SCRIPT_BODY));
pub static POST_DELETE_SCRIPT: LazyLock<Script> = LazyLock::new(|| composed(POST_DELETE_SCRIPT_BODY));
pub static LIKE_CREATE_SCRIPT: LazyLock<Script> = LazyLock::new(|| composed(LIKE_CREATE_SCRIPT_BODY));
pub static LIKE_DELETE_SCRIPT: LazyLock<Script> = LazyLock::new(|| composed(LIKE_DELETE_SCRIPT_BODY));
pub static COMMENT_CREATE_SCRIPT: LazyLock<Script> = LazyLock::new(|| composed(COMMENT_CREATE_SCRIPT_BODY));
pub static FOLLOW_CREATE_SCRIPT: LazyLock<Script> = LazyLock::new(|| composed(FOLLOW_CREATE_SCRIPT_BODY));
pub static FOLLOW_DELETE_SCRIPT: LazyLock<Script> = LazyLock::new(|| composed(FOLLOW_DELETE_SCRIPT_BODY));
pub static MARK_READ_SCRIPT: LazyLock<Script> = LazyLock::new(|| composed(MARK_READ_SCRIPT_BODY));
