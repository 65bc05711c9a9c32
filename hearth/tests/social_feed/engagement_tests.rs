//! Like toggling and comments, with the notifications they fan out.

use hearth::{ErrorKind, NotificationKind, ToggleState};
use super::support::TestNamespace;

#[tokio::test]
async fn toggle_like_alternates_and_notifies_once_per_like() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let bob = ns.user("bob").await;
    let post = ns.post(&alice, "first light").await;
    let hearth = &ns.hearth;

    assert_eq!(hearth.toggle_like(&bob.id, &post.id).await.unwrap(), ToggleState::On);
    assert!(hearth.is_liked(&bob.id, &post.id).await.unwrap());

    let notifications = hearth.list_notifications(&alice.id).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Like);
    assert_eq!(notifications[0].actor.id, bob.id);
    assert_eq!(notifications[0].post.as_ref().map(|p| p.id.as_str()), Some(post.id.as_str()));
    assert!(!notifications[0].read);

    assert_eq!(hearth.toggle_like(&bob.id, &post.id).await.unwrap(), ToggleState::Off);
    assert!(!hearth.is_liked(&bob.id, &post.id).await.unwrap());
    // unliking keeps the earlier notification and adds none
    assert_eq!(hearth.list_notifications(&alice.id).await.unwrap().len(), 1);

    assert_eq!(hearth.toggle_like(&bob.id, &post.id).await.unwrap(), ToggleState::On);
    assert_eq!(hearth.list_notifications(&alice.id).await.unwrap().len(), 2);

    ns.cleanup().await;
}

#[tokio::test]
async fn liking_own_post_never_notifies() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let post = ns.post(&alice, "talking to myself").await;

    assert_eq!(ns.hearth.toggle_like(&alice.id, &post.id).await.unwrap(), ToggleState::On);
    assert!(ns.hearth.list_notifications(&alice.id).await.unwrap().is_empty());
    assert_eq!(ns.hearth.unread_count(&alice.id).await.unwrap(), 0);

    ns.cleanup().await;
}

#[tokio::test]
async fn liking_missing_post_is_not_found() {
    let ns = TestNamespace::unique().await;
    let bob = ns.user("bob").await;
    let missing = hearth::id::generate_record_id();

    let err = ns.hearth.toggle_like(&bob.id, &missing).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = ns.hearth.toggle_like(&bob.id, "not an id").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    ns.cleanup().await;
}

#[tokio::test]
async fn concurrent_toggles_never_double_like() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let bob = ns.user("bob").await;
    let post = ns.post(&alice, "contended").await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let hearth = ns.hearth.clone();
        let user_id = bob.id.clone();
        let post_id = post.id.clone();
        handles.push(tokio::spawn(async move { hearth.toggle_like(&user_id, &post_id).await }));
    }
    let mut likes = 0;
    let mut unlikes = 0;
    for handle in handles {
        match handle.await.expect("task").expect("toggle") {
            ToggleState::On => likes += 1,
            ToggleState::Off => unlikes += 1,
        }
    }

    let feed = ns.hearth.list_feed().await.unwrap();
    assert_eq!(feed.len(), 1);
    assert!(feed[0].like_count <= 1);
    assert_eq!(feed[0].liked_by_viewer(&bob.id), ns.hearth.is_liked(&bob.id, &post.id).await.unwrap());

    // every On was a committed like and every Off a committed unlike
    assert_eq!(likes - unlikes, feed[0].like_count);
    let like_notifications = ns
        .hearth
        .list_notifications(&alice.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|n| n.kind == NotificationKind::Like)
        .count();
    assert_eq!(like_notifications, likes);

    ns.cleanup().await;
}

#[tokio::test]
async fn comment_is_trimmed_and_notifies_author() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let bob = ns.user("bob").await;
    let post = ns.post(&alice, "thoughts?").await;

    let comment = ns.hearth.create_comment(&bob.id, &post.id, "  nice one  ").await.unwrap();
    assert_eq!(comment.content, "nice one");
    assert_eq!(comment.post_id, post.id);

    let notifications = ns.hearth.list_notifications(&alice.id).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Comment);
    assert_eq!(notifications[0].comment.as_ref().map(|c| c.id.as_str()), Some(comment.id.as_str()));

    ns.cleanup().await;
}

#[tokio::test]
async fn blank_comment_is_rejected_without_writes() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let bob = ns.user("bob").await;
    let post = ns.post(&alice, "quiet").await;
    let before = ns.key_count().await;

    let err = ns.hearth.create_comment(&bob.id, &post.id, "   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(ns.key_count().await, before);
    assert!(ns.hearth.list_notifications(&alice.id).await.unwrap().is_empty());

    ns.cleanup().await;
}

#[tokio::test]
async fn self_comment_does_not_notify() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let post = ns.post(&alice, "adding context").await;

    ns.hearth.create_comment(&alice.id, &post.id, "edit: typo").await.unwrap();
    assert!(ns.hearth.list_notifications(&alice.id).await.unwrap().is_empty());

    ns.cleanup().await;
}
