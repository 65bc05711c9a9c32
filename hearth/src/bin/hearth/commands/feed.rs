use anyhow::Result;
use clap::Subcommand;

use super::{connect, session_for};
use crate::config::HearthContext;
use crate::examples::ExampleGroup;
use crate::output::{OutputFormat, OutputManager};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Feeds",
    commands: &[
        "hearth feed all --as ada              # Every post, newest first",
        "hearth feed profile --as ada grace    # Posts by @grace",
        "hearth feed liked --as ada grace      # Posts @grace liked",
        "hearth --output compact feed all --as ada",
    ],
}];

#[derive(Subcommand)]
pub enum FeedCommands {
    /// Every post, newest first
    #[command(name = "all")]
    All {
        /// Viewing user
        #[arg(long = "as")]
        viewer: String,
    },

    /// Posts authored by a user
    #[command(name = "profile")]
    Profile {
        #[arg(long = "as")]
        viewer: String,

        handle: String,
    },

    /// Posts liked by a user
    #[command(name = "liked")]
    Liked {
        #[arg(long = "as")]
        viewer: String,

        handle: String,
    },
}

pub async fn handle_feed_commands(command: FeedCommands, ctx: &HearthContext, output: &OutputManager) -> Result<()> {
    let hearth = connect(ctx, output).await?;

    let (viewer, result) = match command {
        FeedCommands::All { viewer } => {
            let session = session_for(&hearth, &viewer).await?;
            output.heading("Feed");
            (session.viewer_id().to_string(), session.list_feed().await)
        }
        FeedCommands::Profile { viewer, handle } => {
            let session = session_for(&hearth, &viewer).await?;
            output.heading(&format!("Posts by @{handle}"));
            (session.viewer_id().to_string(), session.get_profile_feed(&handle).await)
        }
        FeedCommands::Liked { viewer, handle } => {
            let session = session_for(&hearth, &viewer).await?;
            output.heading(&format!("Liked by @{handle}"));
            (session.viewer_id().to_string(), session.get_liked_feed(&handle).await)
        }
    };

    if matches!(output.options.output_format, OutputFormat::Table)
        && let Some(posts) = result.data()
    {
        let liked = posts.iter().filter(|post| post.liked_by_viewer(&viewer)).count();
        output.verbose(&format!("{} posts, {liked} liked by you", posts.len()));
    }
    output.action(result)
}
