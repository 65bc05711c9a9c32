use anyhow::Result;
use clap::Args;
use hearth::ToggleState;

use super::{connect, session_for};
use crate::config::HearthContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Follows",
    commands: &[
        "hearth follow --as grace ada          # Follow, or unfollow if already following",
        "hearth follow --as grace ada --status # Only report whether grace follows ada",
    ],
}];

#[derive(Args)]
pub struct FollowArgs {
    /// Handle of the follower
    #[arg(long = "as")]
    pub follower: String,

    /// Handle to follow or unfollow
    pub followee: String,

    /// Report the current state without changing it
    #[arg(long)]
    pub status: bool,
}

pub async fn handle_follow(args: FollowArgs, ctx: &HearthContext, output: &OutputManager) -> Result<()> {
    let hearth = connect(ctx, output).await?;
    let session = session_for(&hearth, &args.follower).await?;
    let followee = hearth.user_by_handle(&args.followee).await?;

    if args.status {
        let following = hearth.is_following(session.viewer_id(), &followee.id).await?;
        let state = if following { ToggleState::On } else { ToggleState::Off };
        return output.display(&state);
    }

    let result = session.toggle_follow(&followee.id).await;
    if let Some(state) = result.data() {
        match state {
            ToggleState::On => output.success(&format!("@{} now follows @{}", args.follower, followee.handle)),
            ToggleState::Off => output.info(&format!("@{} unfollowed @{}", args.follower, followee.handle)),
        }
    }
    output.action(result)
}
