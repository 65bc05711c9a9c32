//! Reads over the sorted-set and set indexes maintained by the mutation scripts.

use redis::{aio::ConnectionManager, cmd};

use crate::errors::FeedError;

/// Members of a sorted index, highest score (newest) first.
pub async fn newest_first(conn: &mut ConnectionManager, key: &str) -> Result<Vec<String>, FeedError> {
    let ids: Vec<String> = cmd("ZREVRANGE").arg(key).arg(0).arg(-1).query_async(conn).await?;
    Ok(ids)
}

pub async fn members(conn: &mut ConnectionManager, key: &str) -> Result<Vec<String>, FeedError> {
    let ids: Vec<String> = cmd("SMEMBERS").arg(key).query_async(conn).await?;
    Ok(ids)
}

pub async fn is_member(conn: &mut ConnectionManager, key: &str, member: &str) -> Result<bool, FeedError> {
    let found: i64 = cmd("SISMEMBER").arg(key).arg(member).query_async(conn).await?;
    Ok(found == 1)
}

pub async fn set_len(conn: &mut ConnectionManager, key: &str) -> Result<u64, FeedError> {
    let len: u64 = cmd("SCARD").arg(key).query_async(conn).await?;
    Ok(len)
}

pub async fn sorted_len(conn: &mut ConnectionManager, key: &str) -> Result<u64, FeedError> {
    let len: u64 = cmd("ZCARD").arg(key).query_async(conn).await?;
    Ok(len)
}

/// Cardinality of many sets in one round trip, in input order.
pub async fn set_lens(conn: &mut ConnectionManager, keys: &[String]) -> Result<Vec<u64>, FeedError> {
    if keys.is_empty() {
        return Ok(Vec::new());
    }
    let mut pipe = redis::pipe();
    for key in keys {
        pipe.cmd("SCARD").arg(key);
    }
    let lens: Vec<u64> = pipe.query_async(conn).await?;
    Ok(lens)
}
