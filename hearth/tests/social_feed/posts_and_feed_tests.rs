//! Post lifecycle, the delete cascade and feed assembly.

use hearth::{ErrorKind, NotificationKind, PostDeletion};
use super::support::TestNamespace;

#[tokio::test]
async fn post_needs_text_or_image() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let hearth = &ns.hearth;

    let err = hearth.create_post(&alice.id, "   ", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    let err = hearth.create_post(&alice.id, "", Some("")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let picture = hearth
        .create_post(&alice.id, "", Some("https://cdn.example.com/cat.png"))
        .await
        .unwrap();
    assert_eq!(picture.image.as_deref(), Some("https://cdn.example.com/cat.png"));

    let text = hearth.create_post(&alice.id, "words", Some("")).await.unwrap();
    assert!(text.image.is_none());
    assert!(text.seq > picture.seq);

    ns.cleanup().await;
}

#[tokio::test]
async fn post_by_unknown_author_is_not_found() {
    let ns = TestNamespace::unique().await;
    let ghost = hearth::id::generate_record_id();

    let err = ns.hearth.create_post(&ghost, "boo", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    ns.cleanup().await;
}

#[tokio::test]
async fn only_the_author_may_delete() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let mallory = ns.user("mallory").await;
    let post = ns.post(&alice, "mine").await;

    let err = ns.hearth.delete_post(&mallory.id, &post.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(ns.hearth.list_feed().await.unwrap().len(), 1);

    let missing = hearth::id::generate_record_id();
    let err = ns.hearth.delete_post(&alice.id, &missing).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    ns.cleanup().await;
}

#[tokio::test]
async fn delete_cascades_to_comments_likes_and_notifications() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let bob = ns.user("bob").await;
    let carol = ns.user("carol").await;
    let doomed = ns.post(&alice, "short-lived").await;
    let keeper = ns.post(&alice, "sticks around").await;
    let hearth = &ns.hearth;

    hearth.toggle_like(&bob.id, &doomed.id).await.unwrap();
    hearth.toggle_like(&carol.id, &doomed.id).await.unwrap();
    hearth.create_comment(&bob.id, &doomed.id, "bye").await.unwrap();
    hearth.toggle_like(&bob.id, &keeper.id).await.unwrap();
    hearth.toggle_follow(&bob.id, &alice.id).await.unwrap();

    let removed = hearth.delete_post(&alice.id, &doomed.id).await.unwrap();
    assert_eq!(
        removed,
        PostDeletion {
            notifications: 3,
            comments: 1,
            likes: 2,
        }
    );

    let feed = hearth.list_feed().await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, keeper.id);
    assert!(!hearth.is_liked(&bob.id, &doomed.id).await.unwrap());

    let liked = hearth.get_liked_feed(&bob.id).await.unwrap();
    assert_eq!(liked.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec![keeper.id.as_str()]);

    let kinds: Vec<NotificationKind> = hearth
        .list_notifications(&alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.kind)
        .collect();
    assert_eq!(kinds, vec![NotificationKind::Follow, NotificationKind::Like]);

    let err = hearth.create_comment(&carol.id, &doomed.id, "too late").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    ns.cleanup().await;
}

#[tokio::test]
async fn feed_orders_posts_newest_and_comments_oldest() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let bob = ns.user("bob").await;
    let first = ns.post(&alice, "one").await;
    let second = ns.post(&bob, "two").await;
    let hearth = &ns.hearth;

    let early = hearth.create_comment(&bob.id, &first.id, "early").await.unwrap();
    let late = hearth.create_comment(&alice.id, &first.id, "late").await.unwrap();
    hearth.toggle_like(&bob.id, &first.id).await.unwrap();

    let feed = hearth.list_feed().await.unwrap();
    assert_eq!(feed.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec![
        second.id.as_str(),
        first.id.as_str()
    ]);

    let item = &feed[1];
    assert_eq!(item.author.handle, "alice");
    assert_eq!(item.comment_count, 2);
    assert_eq!(item.comments[0].id, early.id);
    assert_eq!(item.comments[1].id, late.id);
    assert_eq!(item.comments[0].author.id, bob.id);
    assert_eq!(item.like_count, 1);
    assert!(item.liked_by_viewer(&bob.id));
    assert!(!item.liked_by_viewer(&alice.id));

    ns.cleanup().await;
}

#[tokio::test]
async fn profile_and_liked_feeds() {
    let ns = TestNamespace::unique().await;
    let alice = ns.user("alice").await;
    let bob = ns.user("bob").await;
    let mine = ns.post(&alice, "alice writes").await;
    let theirs = ns.post(&bob, "bob writes").await;
    let hearth = &ns.hearth;

    hearth.toggle_like(&alice.id, &theirs.id).await.unwrap();

    let profile = hearth.profile_feed_by_handle("Alice").await.unwrap();
    assert_eq!(profile.len(), 1);
    assert_eq!(profile[0].id, mine.id);

    let liked = hearth.liked_feed_by_handle("alice").await.unwrap();
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0].id, theirs.id);

    assert!(hearth.get_liked_feed(&bob.id).await.unwrap().is_empty());

    let ghost = hearth::id::generate_record_id();
    assert_eq!(hearth.get_profile_feed(&ghost).await.unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(
        hearth.profile_feed_by_handle("nobody").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );

    ns.cleanup().await;
}
