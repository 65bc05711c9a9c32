//! Identity resolution and profile management.

use hearth::{ErrorKind, IdentityClaims, ProfileUpdate};
use super::support::TestNamespace;

fn claims(external_id: &str, handle: &str) -> IdentityClaims {
    IdentityClaims {
        external_id: external_id.to_string(),
        name: String::new(),
        handle: handle.to_string(),
        email: None,
        avatar: None,
    }
}

#[tokio::test]
async fn resolve_is_idempotent_per_identity() {
    let ns = TestNamespace::unique().await;

    let first = ns.hearth.resolve_user(claims("oauth|1", "ada")).await.unwrap();
    assert!(first.created);
    assert_eq!(first.user.name, "ada");

    let again = ns.hearth.resolve_user(claims("oauth|1", "ada")).await.unwrap();
    assert!(!again.created);
    assert_eq!(again.user.id, first.user.id);

    ns.cleanup().await;
}

#[tokio::test]
async fn handles_are_unique_case_insensitively() {
    let ns = TestNamespace::unique().await;
    ns.hearth.resolve_user(claims("oauth|1", "ada")).await.unwrap();

    let err = ns.hearth.resolve_user(claims("oauth|2", "ADA")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let found = ns.hearth.user_by_handle("Ada").await.unwrap();
    assert_eq!(found.external_id, "oauth|1");

    ns.cleanup().await;
}

#[tokio::test]
async fn malformed_claims_are_rejected() {
    let ns = TestNamespace::unique().await;

    let err = ns.hearth.resolve_user(claims("", "ada")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    let err = ns.hearth.resolve_user(claims("oauth|1", "no spaces")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(ns.key_count().await, 0);

    ns.cleanup().await;
}

#[tokio::test]
async fn profile_counts_and_updates() {
    let ns = TestNamespace::unique().await;
    let ada = ns.user("ada").await;
    let grace = ns.user("grace").await;
    ns.post(&ada, "notes").await;
    ns.hearth.toggle_follow(&grace.id, &ada.id).await.unwrap();

    let profile = ns.hearth.get_profile("ada").await.unwrap();
    assert_eq!(profile.user.id, ada.id);
    assert_eq!(profile.follower_count, 1);
    assert_eq!(profile.following_count, 0);
    assert_eq!(profile.post_count, 1);

    let updated = ns
        .hearth
        .update_profile(&ada.id, ProfileUpdate {
            bio: Some("Analytical engines".into()),
            website: Some("https://example.com/ada".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.bio.as_deref(), Some("Analytical engines"));
    assert_eq!(updated.website.as_deref(), Some("https://example.com/ada"));
    assert_eq!(updated.name, ada.name);

    let cleared = ns
        .hearth
        .update_profile(&ada.id, ProfileUpdate {
            bio: Some(String::new()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(cleared.bio.is_none());

    let err = ns
        .hearth
        .update_profile(&ada.id, ProfileUpdate {
            website: Some("not a url".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    ns.cleanup().await;
}
