pub mod engage;
pub mod feed;
pub mod follow;
pub mod notifications;
pub mod post;
pub mod user;

use std::sync::Arc;

use anyhow::{Context, Result};
use hearth::{Hearth, LogInvalidator, Session};

use crate::config::HearthContext;
use crate::output::OutputManager;

/// Connect to the configured store. Invalidation signals are logged.
pub async fn connect(ctx: &HearthContext, output: &OutputManager) -> Result<Hearth> {
    let url = ctx.redis_url()?;
    output.verbose(&format!("connecting to {url} (prefix '{}')", ctx.prefix()));
    let hearth = Hearth::connect(&url, ctx.prefix())
        .await
        .context("Failed to connect to Redis")?;
    Ok(hearth.with_invalidator(Arc::new(LogInvalidator)))
}

/// Act as the user owning `handle`.
pub async fn session_for(hearth: &Hearth, handle: &str) -> Result<Session> {
    let user = hearth
        .user_by_handle(handle)
        .await
        .with_context(|| format!("No user with handle @{handle}"))?;
    Ok(hearth.session(user.id))
}
