//! Shared fixtures: every test gets its own key prefix on the local Redis.

use std::sync::atomic::{AtomicUsize, Ordering};

use hearth::{Hearth, IdentityClaims, Post, User, cleanup_pattern, id::generate_record_id};

static TEST_NAMESPACE_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string())
}

pub struct TestNamespace {
    pub hearth: Hearth,
}

impl TestNamespace {
    pub async fn unique() -> Self {
        let idx = TEST_NAMESPACE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let salt = generate_record_id();
        let prefix = format!("hearth_test_{idx}_{}", &salt[..8]);
        let hearth = Hearth::connect(&redis_url(), prefix).await.expect("connect to redis");
        Self { hearth }
    }

    pub async fn user(&self, handle: &str) -> User {
        self.hearth
            .resolve_user(IdentityClaims {
                external_id: format!("ext|{handle}"),
                name: handle.to_uppercase(),
                handle: handle.to_string(),
                email: Some(format!("{handle}@example.com")),
                avatar: None,
            })
            .await
            .expect("resolve user")
            .user
    }

    pub async fn post(&self, author: &User, content: &str) -> Post {
        self.hearth.create_post(&author.id, content, None).await.expect("create post")
    }

    /// Number of keys under this namespace.
    pub async fn key_count(&self) -> usize {
        let mut conn = self.hearth.connection();
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(cleanup_pattern(self.hearth.prefix()))
            .query_async(&mut conn)
            .await
            .expect("list keys");
        keys.len()
    }

    pub async fn cleanup(self) {
        let mut conn = self.hearth.connection();
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(cleanup_pattern(self.hearth.prefix()))
            .query_async(&mut conn)
            .await
            .expect("list keys");
        if !keys.is_empty() {
            let _: () = redis::cmd("DEL").arg(&keys).query_async(&mut conn).await.expect("delete keys");
        }
    }
}
