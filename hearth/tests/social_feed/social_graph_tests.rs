//! Follow toggling, follower lists and suggestions.

use hearth::{DEFAULT_SUGGESTIONS, ErrorKind, NotificationKind, ToggleState};
use super::support::TestNamespace;

#[tokio::test]
async fn self_follow_is_rejected_without_writes() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let before = ns.key_count().await;

    let err = ns.hearth.toggle_follow(&alice.id, &alice.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(ns.key_count().await, before);
    assert!(!ns.hearth.is_following(&alice.id, &alice.id).await.unwrap());

    ns.cleanup().await;
}

#[tokio::test]
async fn follow_toggles_and_notifies_followee() {
    let ns = TestNamespace::unique().await;
    let ada = ns.user("ada").await;
    let grace = ns.user("grace").await;
    let hearth = &ns.hearth;

    assert_eq!(hearth.toggle_follow(&grace.id, &ada.id).await.unwrap(), ToggleState::On);
    assert!(hearth.is_following(&grace.id, &ada.id).await.unwrap());
    assert!(!hearth.is_following(&ada.id, &grace.id).await.unwrap());

    let followers = hearth.followers(&ada.id).await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].handle, "grace");
    assert_eq!(hearth.following(&grace.id).await.unwrap()[0].id, ada.id);

    let notifications = hearth.list_notifications(&ada.id).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Follow);
    assert_eq!(notifications[0].actor.id, grace.id);
    assert!(notifications[0].post.is_none());

    assert_eq!(hearth.toggle_follow(&grace.id, &ada.id).await.unwrap(), ToggleState::Off);
    assert!(hearth.followers(&ada.id).await.unwrap().is_empty());
    assert_eq!(hearth.list_notifications(&ada.id).await.unwrap().len(), 1);

    ns.cleanup().await;
}

#[tokio::test]
async fn following_unknown_user_is_not_found() {
    let ns = TestNamespace::unique().await;
    let ada = ns.user("ada").await;
    let ghost = hearth::id::generate_record_id();

    let err = ns.hearth.toggle_follow(&ada.id, &ghost).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    ns.cleanup().await;
}

#[tokio::test]
async fn suggestions_skip_self_and_followed_and_rank_by_followers() {
    let ns = TestNamespace::unique().await;
    let viewer = ns.user("viewer").await;
    let popular = ns.user("popular").await;
    let quiet = ns.user("quiet").await;
    let followed = ns.user("followed").await;
    let fan = ns.user("fan").await;
    let hearth = &ns.hearth;

    hearth.toggle_follow(&viewer.id, &followed.id).await.unwrap();
    hearth.toggle_follow(&fan.id, &popular.id).await.unwrap();
    hearth.toggle_follow(&quiet.id, &popular.id).await.unwrap();

    let suggestions = hearth.suggest_users(&viewer.id, DEFAULT_SUGGESTIONS).await.unwrap();
    assert_eq!(suggestions.len(), DEFAULT_SUGGESTIONS);
    assert_eq!(suggestions[0].user.id, popular.id);
    assert_eq!(suggestions[0].follower_count, 2);
    assert!(suggestions.iter().all(|s| s.user.id != viewer.id && s.user.id != followed.id));

    assert!(hearth.suggest_users(&viewer.id, 0).await.unwrap().is_empty());

    ns.cleanup().await;
}
