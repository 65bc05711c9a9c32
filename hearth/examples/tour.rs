//! Walks through likes, follows and notifications against a local Redis.
//!
//! ```text
//! REDIS_URL=redis://127.0.0.1/ RUST_LOG=hearth=info cargo run --example tour
//! ```

use anyhow::{Result, ensure};
use hearth::{Hearth, IdentityClaims, LogInvalidator, NotificationKind, ToggleState, cleanup_pattern};
use std::sync::Arc;

async fn sign_in(hearth: &Hearth, handle: &str) -> Result<hearth::User> {
    let resolution = hearth
        .resolve_user(IdentityClaims {
            external_id: format!("tour|{handle}"),
            name: handle.to_uppercase(),
            handle: handle.to_string(),
            ..Default::default()
        })
        .await?;
    Ok(resolution.user)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
    let prefix = format!("tour_{}", &hearth::id::generate_record_id()[..8]);
    let hearth = Hearth::connect(&url, prefix.clone())
        .await?
        .with_invalidator(Arc::new(LogInvalidator));

    let a = sign_in(&hearth, "author").await?;
    let b = sign_in(&hearth, "reader").await?;

    // likes
    let post = hearth.create_post(&a.id, "hello", None).await?;
    ensure!(hearth.toggle_like(&b.id, &post.id).await? == ToggleState::On);
    ensure!(hearth.list_notifications(&a.id).await?.len() == 1);
    ensure!(hearth.toggle_like(&b.id, &post.id).await? == ToggleState::Off);
    ensure!(hearth.list_notifications(&a.id).await?.len() == 1);
    ensure!(hearth.toggle_like(&a.id, &post.id).await? == ToggleState::On);
    ensure!(hearth.list_notifications(&a.id).await?.len() == 1);
    println!("likes: one notification for @{}, none for the self-like", a.handle);

    // follows
    hearth.toggle_follow(&a.id, &b.id).await?;
    let notifications = hearth.list_notifications(&b.id).await?;
    ensure!(notifications.len() == 1 && notifications[0].kind == NotificationKind::Follow);
    ensure!(notifications[0].actor.id == a.id && !notifications[0].read);
    let ids: Vec<String> = notifications.into_iter().map(|n| n.id).collect();
    hearth.mark_read(&b.id, &ids).await?;
    ensure!(hearth.unread_count(&b.id).await? == 0);
    println!("follows: @{} has nothing unread", b.handle);

    for item in hearth.list_feed().await? {
        println!("@{}: {} ({} likes)", item.author.handle, item.content, item.like_count);
    }

    let mut conn = hearth.connection();
    let keys: Vec<String> = redis::cmd("KEYS").arg(cleanup_pattern(&prefix)).query_async(&mut conn).await?;
    if !keys.is_empty() {
        let _: () = redis::cmd("DEL").arg(&keys).query_async(&mut conn).await?;
    }
    Ok(())
}
