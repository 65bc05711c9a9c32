//! The result-wrapped viewer surface and post-commit invalidation.

use std::sync::Arc;

use hearth::{
    ErrorKind, FeedInvalidator, InvalidationError, NotificationKind, RecordingInvalidator, ToggleState,
};
use serde_json::{Value, json};
use super::support::TestNamespace;

#[tokio::test]
async fn actions_report_success_and_failure_as_values() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let bob = ns.user("bob").await;
    let as_alice = ns.hearth.session(&alice.id);
    let as_bob = ns.hearth.session(&bob.id);

    let created = as_alice.create_post("hello from a session", "").await;
    assert!(created.is_ok());
    let post = created.into_data().expect("post");
    assert!(post.image.is_none());

    let liked = as_bob.toggle_like(&post.id).await;
    assert_eq!(liked.data(), Some(&ToggleState::On));

    let denied = as_bob.delete_post(&post.id).await;
    assert_eq!(denied.error_kind(), Some(ErrorKind::Unauthorized));
    let encoded = serde_json::to_value(&denied).unwrap();
    assert_eq!(encoded["ok"], Value::Bool(false));
    assert_eq!(encoded["error_kind"], json!("UNAUTHORIZED"));
    assert!(encoded["message"].is_string());

    let blank = as_alice.create_post("  ", "").await;
    assert_eq!(blank.error_kind(), Some(ErrorKind::InvalidInput));

    let self_follow = as_alice.toggle_follow(&alice.id).await;
    assert_eq!(self_follow.error_kind(), Some(ErrorKind::InvalidInput));

    let feed = as_bob.list_feed().await;
    let encoded = serde_json::to_value(&feed).unwrap();
    assert_eq!(encoded["ok"], Value::Bool(true));
    assert_eq!(encoded["data"][0]["id"], json!(post.id));

    let profile = as_bob.get_profile_feed("nobody").await;
    assert_eq!(profile.error_kind(), Some(ErrorKind::NotFound));

    let listed = as_alice.list_notifications().await.into_data().expect("notifications");
    let ids: Vec<String> = listed.into_iter().map(|n| n.id).collect();
    assert_eq!(as_alice.mark_read(&ids).await.data(), Some(&1));

    let removed = as_alice.delete_post(&post.id).await;
    assert_eq!(removed.data().map(|r| r.likes), Some(1));

    ns.cleanup().await;
}

#[tokio::test]
async fn committed_mutations_invalidate_rendered_paths() {
    let ns = TestNamespace::unique().await;
    let recorder = Arc::new(RecordingInvalidator::default());
    let hearth = ns.hearth.clone().with_invalidator(recorder.clone());

    let ada = ns.user("ada").await;
    let grace = ns.user("grace").await;
    let post = hearth.create_post(&ada.id, "watch the paths", None).await.unwrap();
    hearth.toggle_like(&grace.id, &post.id).await.unwrap();
    hearth.toggle_follow(&grace.id, &ada.id).await.unwrap();
    hearth.create_comment(&grace.id, &post.id, "seen").await.unwrap();

    let ids: Vec<String> = hearth
        .list_notifications(&ada.id)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    hearth.mark_read(&ada.id, &ids).await.unwrap();
    hearth
        .update_profile(&ada.id, hearth::ProfileUpdate {
            bio: Some("hi".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let paths = recorder.paths();
    assert_eq!(paths.iter().filter(|p| *p == "/").count(), 5);
    assert!(paths.contains(&"/notifications".to_string()));
    assert!(paths.contains(&"/profile/ada".to_string()));

    // a rejected mutation signals nothing
    let before = recorder.paths().len();
    assert!(hearth.toggle_follow(&ada.id, &ada.id).await.is_err());
    assert_eq!(recorder.paths().len(), before);

    ns.cleanup().await;
}

#[tokio::test]
async fn post_changes_invalidate_the_author_profile() {
    let ns = TestNamespace::unique().await;
    let recorder = Arc::new(RecordingInvalidator::default());
    let hearth = ns.hearth.clone().with_invalidator(recorder.clone());
    let ada = ns.user("ada").await;

    let post = hearth.create_post(&ada.id, "on my page", None).await.unwrap();
    assert_eq!(recorder.paths(), vec!["/".to_string(), "/profile/ada".to_string()]);

    hearth.delete_post(&ada.id, &post.id).await.unwrap();
    let paths = recorder.paths();
    assert_eq!(paths[2..], ["/".to_string(), "/profile/ada".to_string()]);

    ns.cleanup().await;
}

/// Rejects every path, standing in for an unreachable page cache.
struct FailingInvalidator;

impl FeedInvalidator for FailingInvalidator {
    fn invalidate(&self, path: &str) -> Result<(), InvalidationError> {
        Err(InvalidationError {
            path: path.to_string(),
            reason: "cache offline".to_string(),
        })
    }
}

#[tokio::test]
async fn failed_invalidation_keeps_the_committed_mutation() {
    let ns = TestNamespace::unique().await;
    let hearth = ns.hearth.clone().with_invalidator(Arc::new(FailingInvalidator));
    let alice = ns.user("alice").await;
    let bob = ns.user("bob").await;

    let post = hearth.create_post(&alice.id, "cache is down", None).await.unwrap();

    assert_eq!(hearth.toggle_like(&bob.id, &post.id).await.unwrap(), ToggleState::On);
    assert!(hearth.is_liked(&bob.id, &post.id).await.unwrap());
    let kinds: Vec<NotificationKind> = hearth
        .list_notifications(&alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.kind)
        .collect();
    assert_eq!(kinds, vec![NotificationKind::Like]);

    let comment = hearth.create_comment(&bob.id, &post.id, "still here").await.unwrap();
    let feed = hearth.list_feed().await.unwrap();
    assert_eq!(feed[0].comments[0].id, comment.id);
    assert_eq!(hearth.list_notifications(&alice.id).await.unwrap().len(), 2);

    let removed = hearth.delete_post(&alice.id, &post.id).await.unwrap();
    assert_eq!(removed.likes, 1);
    assert_eq!(removed.comments, 1);
    assert!(hearth.list_feed().await.unwrap().is_empty());
    assert!(hearth.list_notifications(&alice.id).await.unwrap().is_empty());

    let session = hearth.session(&bob.id);
    assert_eq!(session.toggle_follow(&alice.id).await.data(), Some(&ToggleState::On));

    ns.cleanup().await;
}
