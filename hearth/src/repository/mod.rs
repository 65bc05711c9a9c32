//! Typed reads over the keyspace.
//!
//! Writes never go through here: every mutation is a script (see [`crate::runtime`]).

use std::marker::PhantomData;

use redis::{aio::ConnectionManager, cmd};

use crate::{
    errors::FeedError,
    keys::{KeyContext, SERVICE},
    types::Record,
};

pub mod index;

pub(crate) fn decode<T: Record>(raw: &str) -> Result<T, FeedError> {
    serde_json::from_str::<T>(raw).map_err(|err| FeedError::Other {
        message: format!("failed to deserialize {} record: {err}", T::COLLECTION).into(),
    })
}

pub struct Repo<T>
where
    T: Record,
{
    prefix: String,
    _marker: PhantomData<T>,
}

impl<T> Clone for Repo<T>
where
    T: Record,
{
    fn clone(&self) -> Self {
        Self::new(self.prefix.clone())
    }
}

impl<T> Repo<T>
where
    T: Record,
{
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            _marker: PhantomData,
        }
    }

    pub fn key_context(&self) -> KeyContext<'_> {
        KeyContext::new(&self.prefix, SERVICE)
    }

    pub fn entity_key(&self, entity_id: &str) -> String {
        self.key_context().entity(T::COLLECTION, entity_id)
    }

    pub async fn get(&self, conn: &mut ConnectionManager, entity_id: &str) -> Result<Option<T>, FeedError> {
        self.get_by_key(conn, &self.entity_key(entity_id)).await
    }

    /// Reads a record stored under an arbitrary key, e.g. a composite like key.
    pub async fn get_by_key(&self, conn: &mut ConnectionManager, key: &str) -> Result<Option<T>, FeedError> {
        let raw: Option<String> = cmd("GET").arg(key).query_async(conn).await?;
        raw.as_deref().map(decode::<T>).transpose()
    }

    pub async fn get_or_error(&self, conn: &mut ConnectionManager, entity_id: &str) -> Result<T, FeedError> {
        self.get(conn, entity_id)
            .await?
            .ok_or_else(|| FeedError::not_found(singular(T::COLLECTION), entity_id))
    }

    /// Fetches many records in one round trip, preserving input order and skipping missing ids.
    pub async fn get_many(&self, conn: &mut ConnectionManager, entity_ids: &[String]) -> Result<Vec<T>, FeedError> {
        if entity_ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys: Vec<String> = entity_ids.iter().map(|id| self.entity_key(id)).collect();
        let raws: Vec<Option<String>> = cmd("MGET").arg(&keys).query_async(conn).await?;
        raws.iter().flatten().map(|raw| decode::<T>(raw)).collect()
    }

    pub async fn key_exists(&self, conn: &mut ConnectionManager, key: &str) -> Result<bool, FeedError> {
        let exists: i64 = cmd("EXISTS").arg(key).query_async(conn).await?;
        Ok(exists == 1)
    }
}

/// Entity name used in not-found errors.
pub(crate) fn singular(collection: &str) -> &'static str {
    match collection {
        "users" => "user",
        "posts" => "post",
        "comments" => "comment",
        "likes" => "like",
        "follows" => "follow",
        "notifications" => "notification",
        _ => "record",
    }
}
