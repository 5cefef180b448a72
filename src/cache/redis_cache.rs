//! Redis cache backend.
//!
//! Uses a `ConnectionManager` for automatic reconnection. Prefix deletion
//! walks the keyspace with `SCAN MATCH prefix*` and deletes in batches.

use std::fmt;

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tonic::async_trait;
use tracing::debug;
use tracing::info;

use super::CacheResult;
use super::CryptoCache;

const SCAN_BATCH: usize = 100;

#[derive(Clone)]
pub struct RedisCache {
    conn_manager: ConnectionManager,
    redis_url: String,
}

impl fmt::Debug for RedisCache {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("redis_url", &self.redis_url)
            .finish_non_exhaustive()
    }
}

impl RedisCache {
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Initializing Redis connection manager for URL: {}", redis_url);
        let client = redis::Client::open(redis_url)?;
        let conn_manager = ConnectionManager::new(client).await?;
        Ok(Self {
            conn_manager,
            redis_url: redis_url.to_string(),
        })
    }

    /// Escapes glob metacharacters so the prefix matches literally
    fn scan_pattern(prefix: &str) -> String {
        let mut pattern = String::with_capacity(prefix.len() + 1);
        for c in prefix.chars() {
            if matches!(c, '*' | '?' | '[' | ']' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('*');
        pattern
    }
}

#[async_trait]
impl CryptoCache for RedisCache {
    async fn get(
        &self,
        key: &str,
    ) -> CacheResult<Option<String>> {
        let mut conn = self.conn_manager.clone();
        let value: Option<String> = conn.get(key).await?;
        debug!(key, hit = value.is_some(), "redis GET");
        Ok(value)
    }

    async fn set(
        &self,
        key: &str,
        value: String,
    ) -> CacheResult<()> {
        let mut conn = self.conn_manager.clone();
        conn.set::<_, _, ()>(key, value).await?;
        debug!(key, "redis SET");
        Ok(())
    }

    async fn delete(
        &self,
        key: &str,
    ) -> CacheResult<()> {
        let mut conn = self.conn_manager.clone();
        conn.del::<_, i64>(key).await?;
        debug!(key, "redis DEL");
        Ok(())
    }

    async fn delete_by_prefix(
        &self,
        prefix: &str,
    ) -> CacheResult<u64> {
        let mut conn = self.conn_manager.clone();
        let pattern = Self::scan_pattern(prefix);

        let mut cursor: u64 = 0;
        let mut removed: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                removed += conn.del::<_, u64>(&keys).await?;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(prefix, removed, "redis prefix delete");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_pattern_escapes_glob_characters() {
        assert_eq!(RedisCache::scan_pattern("ListAll"), "ListAll*");
        assert_eq!(RedisCache::scan_pattern("a*b?[c]"), "a\\*b\\?\\[c\\]*");
    }
}
