use anyhow::Result;
use clap::Args;
use hearth::ToggleState;

use super::{connect, session_for};
use crate::config::HearthContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const LIKE_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Likes",
    commands: &[
        "hearth like --as grace <POST_ID>     # Like, or unlike if already liked",
        "hearth --output json like --as grace <POST_ID>",
    ],
}];

pub const COMMENT_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Comments",
    commands: &["hearth comment --as grace <POST_ID> \"Lovely\""],
}];

#[derive(Args)]
pub struct LikeArgs {
    /// Handle of the liking user
    #[arg(long = "as")]
    pub user: String,

    pub post_id: String,
}

#[derive(Args)]
pub struct CommentArgs {
    /// Handle of the commenting user
    #[arg(long = "as")]
    pub user: String,

    pub post_id: String,

    pub content: String,
}

pub async fn handle_like(args: LikeArgs, ctx: &HearthContext, output: &OutputManager) -> Result<()> {
    let hearth = connect(ctx, output).await?;
    let session = session_for(&hearth, &args.user).await?;
    let result = session.toggle_like(&args.post_id).await;
    if let Some(state) = result.data() {
        match state {
            ToggleState::On => output.success(&format!("@{} likes {}", args.user, args.post_id)),
            ToggleState::Off => output.info(&format!("@{} no longer likes {}", args.user, args.post_id)),
        }
    }
    output.action(result)
}

pub async fn handle_comment(args: CommentArgs, ctx: &HearthContext, output: &OutputManager) -> Result<()> {
    let hearth = connect(ctx, output).await?;
    let session = session_for(&hearth, &args.user).await?;
    output.action(session.create_comment(&args.post_id, &args.content).await)
}
