//! Notification listing and read-state.

use hearth::NotificationKind;
use super::support::TestNamespace;

#[tokio::test]
async fn mark_read_with_no_ids_is_a_no_op() {
    let ns = TestNamespace::unique().await;
    let ada = ns.user("ada").await;
    let grace = ns.user("grace").await;
    ns.hearth.toggle_follow(&grace.id, &ada.id).await.unwrap();

    assert_eq!(ns.hearth.mark_read(&ada.id, &[]).await.unwrap(), 0);
    assert_eq!(ns.hearth.unread_count(&ada.id).await.unwrap(), 1);

    ns.cleanup().await;
}

#[tokio::test]
async fn follow_then_mark_read_clears_unread() {
    let ns = TestNamespace::unique().await;
    let ada = ns.user("ada").await;
    let grace = ns.user("grace").await;
    let hearth = &ns.hearth;

    hearth.toggle_follow(&grace.id, &ada.id).await.unwrap();
    let listed = hearth.list_notifications(&ada.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].kind, NotificationKind::Follow);

    let ids: Vec<String> = listed.iter().map(|n| n.id.clone()).collect();
    assert_eq!(hearth.mark_read(&ada.id, &ids).await.unwrap(), 1);
    assert_eq!(hearth.unread_count(&ada.id).await.unwrap(), 0);
    assert!(hearth.list_notifications(&ada.id).await.unwrap()[0].read);

    // already read
    assert_eq!(hearth.mark_read(&ada.id, &ids).await.unwrap(), 0);

    ns.cleanup().await;
}

#[tokio::test]
async fn mark_read_touches_exactly_the_given_ids() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let bob = ns.user("bob").await;
    let post = ns.post(&alice, "popular").await;
    let hearth = &ns.hearth;

    hearth.toggle_like(&bob.id, &post.id).await.unwrap();
    hearth.create_comment(&bob.id, &post.id, "agreed").await.unwrap();
    hearth.toggle_follow(&bob.id, &alice.id).await.unwrap();

    let listed = hearth.list_notifications(&alice.id).await.unwrap();
    let kinds: Vec<NotificationKind> = listed.iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![
        NotificationKind::Follow,
        NotificationKind::Comment,
        NotificationKind::Like
    ]);

    let comment_id = listed[1].id.clone();
    assert_eq!(hearth.mark_read(&alice.id, &[comment_id.clone()]).await.unwrap(), 1);

    let after = hearth.list_notifications(&alice.id).await.unwrap();
    for view in &after {
        assert_eq!(view.read, view.id == comment_id, "{} read state", view.kind.as_str());
    }
    assert_eq!(hearth.unread_count(&alice.id).await.unwrap(), 2);

    ns.cleanup().await;
}

#[tokio::test]
async fn mark_read_ignores_other_recipients_and_bad_ids() {
    let ns = TestNamespace::unique().await;
    let ada = ns.user("ada").await;
    let grace = ns.user("grace").await;
    let hearth = &ns.hearth;

    hearth.toggle_follow(&grace.id, &ada.id).await.unwrap();
    let ids: Vec<String> = hearth
        .list_notifications(&ada.id)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();

    assert_eq!(hearth.mark_read(&grace.id, &ids).await.unwrap(), 0);
    assert_eq!(
        hearth
            .mark_read(&ada.id, &["../*".to_string(), hearth::id::generate_record_id()])
            .await
            .unwrap(),
        0
    );
    assert_eq!(hearth.unread_count(&ada.id).await.unwrap(), 1);

    ns.cleanup().await;
}
