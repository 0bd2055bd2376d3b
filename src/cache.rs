// Cache layer
// Key-value get/set/delete with expiry. Backed by Redis, or by a
// process-local map when Redis is unreachable at startup.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cache faults. Callers treat these as best-effort and never surface them.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(#[from] redis::RedisError),

    #[error("cache call '{operation}' timed out after {millis}ms")]
    Timeout { operation: &'static str, millis: u128 },
}

/// Minimal cache protocol used by the post cache-repository
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a live value, `None` on miss or expiry
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl`
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Evict `key`; evicting an absent key is not an error
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Redis-backed cache with a deadline on every round-trip
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    timeout: Duration,
}

impl RedisCache {
    /// Connect to Redis, giving up after `timeout`
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = bounded(timeout, "CONNECT", ConnectionManager::new(client)).await?;

        tracing::info!("Redis connection established");
        Ok(Self { conn, timeout })
    }
}

async fn bounded<T, F>(limit: Duration, operation: &'static str, call: F) -> Result<T, CacheError>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(CacheError::from),
        Err(_) => Err(CacheError::Timeout {
            operation,
            millis: limit.as_millis(),
        }),
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        bounded(self.timeout, "GET", conn.get::<_, Option<String>>(key)).await
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let mut command = redis::cmd("SET");
        command.arg(key).arg(value).arg("EX").arg(ttl.as_secs().max(1));

        bounded(self.timeout, "SET", command.query_async::<_, ()>(&mut conn)).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        bounded(self.timeout, "DEL", conn.del::<_, ()>(key)).await
    }
}

#[derive(Debug, Clone)]
struct LocalEntry {
    value: String,
    expires_at: Instant,
}

/// In-process TTL cache
///
/// Only coherent within one process; used when Redis is unavailable.
#[derive(Debug, Clone, Default)]
pub struct LocalCache {
    entries: Arc<RwLock<HashMap<String, LocalEntry>>>,
}

impl LocalCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for LocalCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > Instant::now());
        entries.insert(
            key.to_string(),
            LocalEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_cache_round_trip() {
        let cache = LocalCache::new();
        cache
            .set("k", "v".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(cache.get("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn local_cache_entries_expire() {
        let cache = LocalCache::new();
        cache
            .set("k", "v".to_string(), Duration::from_millis(20))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn local_cache_delete_is_idempotent() {
        let cache = LocalCache::new();
        cache
            .set("k", "v".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        cache.delete("k").await.unwrap();
        cache.delete("k").await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let cache = LocalCache::new();
        let clone = cache.clone();
        cache
            .set("k", "v".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(clone.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn unreachable_redis_fails_fast() {
        // Nothing listens on port 1
        let result = RedisCache::connect("redis://127.0.0.1:1", Duration::from_millis(500)).await;
        assert!(result.is_err());
    }
}
