use anyhow::Result;
use clap::Subcommand;

use super::{connect, session_for};
use crate::config::HearthContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Posts",
    commands: &[
        "hearth post create --as ada \"First light\"                          # Text post",
        "hearth post create --as ada --image https://cdn.example/1.png \"\"   # Image-only post",
        "hearth post delete --as ada <POST_ID>                               # Deletes comments, likes, notifications",
    ],
}];

#[derive(Subcommand)]
pub enum PostCommands {
    /// Publish a post
    #[command(name = "create")]
    Create {
        /// Author handle
        #[arg(long = "as")]
        author: String,

        /// Post text (may be empty when an image is given)
        #[arg(default_value = "")]
        content: String,

        /// Image URL from the upload service
        #[arg(long, default_value = "")]
        image: String,
    },

    /// Delete one of your posts and everything hanging off it
    #[command(name = "delete")]
    Delete {
        /// Handle of the caller; must be the author
        #[arg(long = "as")]
        caller: String,

        post_id: String,
    },
}

pub async fn handle_post_commands(command: PostCommands, ctx: &HearthContext, output: &OutputManager) -> Result<()> {
    let hearth = connect(ctx, output).await?;

    match command {
        PostCommands::Create { author, content, image } => {
            let session = session_for(&hearth, &author).await?;
            output.action(session.create_post(&content, &image).await)?;
        }
        PostCommands::Delete { caller, post_id } => {
            let session = session_for(&hearth, &caller).await?;
            output.action(session.delete_post(&post_id).await)?;
        }
    }

    Ok(())
}
