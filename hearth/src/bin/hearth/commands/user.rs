use anyhow::Result;
use clap::Subcommand;
use hearth::{DEFAULT_SUGGESTIONS, IdentityClaims, ProfileUpdate};

use super::connect;
use crate::config::HearthContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Identities",
        commands: &[
            "hearth user resolve auth0|42 ada --name \"Ada Lovelace\"   # Get-or-create a user",
            "hearth user show ada                                      # Profile with counts",
        ],
    },
    ExampleGroup {
        title: "Profiles",
        commands: &[
            "hearth user update ada --bio \"Analyst\" --website https://ada.dev",
            "hearth user suggest ada --limit 5                         # Who to follow",
            "hearth user followers ada",
        ],
    },
];

#[derive(Subcommand)]
pub enum UserCommands {
    /// Get-or-create the user for an external identity
    #[command(name = "resolve")]
    Resolve {
        /// Identity id issued by the auth provider
        external_id: String,

        /// Routing handle (letters, digits, underscores)
        handle: String,

        /// Display name (defaults to the handle)
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long)]
        email: Option<String>,

        /// Avatar URL
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Show a profile with follower, following and post counts
    #[command(name = "show")]
    Show { handle: String },

    /// Update profile fields (an empty value clears an optional field)
    #[command(name = "update")]
    Update {
        handle: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        website: Option<String>,

        #[arg(long)]
        avatar: Option<String>,
    },

    /// Suggest accounts to follow
    #[command(name = "suggest")]
    Suggest {
        handle: String,

        #[arg(long, default_value_t = DEFAULT_SUGGESTIONS)]
        limit: usize,
    },

    /// List followers of a user
    #[command(name = "followers")]
    Followers { handle: String },

    /// List accounts a user follows
    #[command(name = "following")]
    Following { handle: String },
}

pub async fn handle_user_commands(command: UserCommands, ctx: &HearthContext, output: &OutputManager) -> Result<()> {
    let hearth = connect(ctx, output).await?;

    match command {
        UserCommands::Resolve {
            external_id,
            handle,
            name,
            email,
            avatar,
        } => {
            let resolution = hearth
                .resolve_user(IdentityClaims {
                    external_id,
                    name,
                    handle,
                    email,
                    avatar,
                })
                .await?;
            if resolution.created {
                output.success(&format!("Created @{}", resolution.user.handle));
            } else {
                output.info(&format!("@{} already exists", resolution.user.handle));
            }
            output.display(&resolution)?;
        }
        UserCommands::Show { handle } => {
            let profile = hearth.get_profile(&handle).await?;
            output.display(&profile)?;
        }
        UserCommands::Update {
            handle,
            name,
            bio,
            location,
            website,
            avatar,
        } => {
            let user = hearth.user_by_handle(&handle).await?;
            let updated = hearth
                .update_profile(
                    &user.id,
                    ProfileUpdate {
                        name,
                        bio,
                        location,
                        website,
                        avatar,
                    },
                )
                .await?;
            output.success(&format!("Updated @{}", updated.handle));
            output.display(&updated)?;
        }
        UserCommands::Suggest { handle, limit } => {
            let user = hearth.user_by_handle(&handle).await?;
            output.heading(&format!("Who to follow for @{}", user.handle));
            let suggestions = hearth.suggest_users(&user.id, limit).await?;
            output.display(&suggestions)?;
        }
        UserCommands::Followers { handle } => {
            let user = hearth.user_by_handle(&handle).await?;
            output.heading(&format!("Followers of @{}", user.handle));
            output.display(&hearth.followers(&user.id).await?)?;
        }
        UserCommands::Following { handle } => {
            let user = hearth.user_by_handle(&handle).await?;
            output.heading(&format!("@{} follows", user.handle));
            output.display(&hearth.following(&user.id).await?)?;
        }
    }

    Ok(())
}
