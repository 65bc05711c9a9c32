use anyhow::Result;
use clap::Subcommand;

use super::{connect, session_for};
use crate::config::HearthContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Notifications",
    commands: &[
        "hearth notifications list --as ada            # Newest first",
        "hearth notifications unread --as ada",
        "hearth notifications read --as ada <ID> <ID>  # Mark specific notifications read",
        "hearth notifications read --as ada --all",
    ],
}];

#[derive(Subcommand)]
pub enum NotificationCommands {
    /// List notifications, newest first
    #[command(name = "list")]
    List {
        #[arg(long = "as")]
        recipient: String,
    },

    /// Count unread notifications
    #[command(name = "unread")]
    Unread {
        #[arg(long = "as")]
        recipient: String,
    },

    /// Mark notifications read
    #[command(name = "read")]
    Read {
        #[arg(long = "as")]
        recipient: String,

        /// Notification ids
        ids: Vec<String>,

        /// Mark every notification read
        #[arg(long, conflicts_with = "ids")]
        all: bool,
    },
}

pub async fn handle_notification_commands(
    command: NotificationCommands,
    ctx: &HearthContext,
    output: &OutputManager,
) -> Result<()> {
    let hearth = connect(ctx, output).await?;

    match command {
        NotificationCommands::List { recipient } => {
            let session = session_for(&hearth, &recipient).await?;
            output.heading(&format!("Notifications for @{recipient}"));
            output.action(session.list_notifications().await)?;
        }
        NotificationCommands::Unread { recipient } => {
            let session = session_for(&hearth, &recipient).await?;
            let unread = hearth.unread_count(session.viewer_id()).await?;
            output.display(&unread)?;
        }
        NotificationCommands::Read { recipient, ids, all } => {
            let session = session_for(&hearth, &recipient).await?;
            let ids = if all {
                hearth
                    .list_notifications(session.viewer_id())
                    .await?
                    .into_iter()
                    .filter(|view| !view.read)
                    .map(|view| view.id)
                    .collect()
            } else {
                ids
            };
            if ids.is_empty() {
                output.warning("Nothing to mark read");
            }
            output.action(session.mark_read(&ids).await)?;
        }
    }

    Ok(())
}
