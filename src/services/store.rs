use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Key-value store capability with per-instance TTL
///
/// Entities live under a key prefix and expire after the TTL the backend
/// was built with; a put refreshes the clock. `enumerate` returns the raw
/// values under a prefix with no transactional guarantee against
/// concurrent writes — it is a best-effort snapshot, O(number of keys).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn put(&self, key: &str, value: String) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn enumerate(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store backed by moka with time-to-live eviction
///
/// The default backend: single-process, no external dependencies, used by
/// the test suite and by deployments that accept cache loss on restart.
pub struct MemoryStore {
    cache: moka::future::Cache<String, String>,
}

impl MemoryStore {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.cache.insert(key.to_string(), value).await;
        tracing::trace!("memory store set: {}", key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.cache.get(key).await)
    }

    async fn enumerate(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        // Expired entries are skipped by the iterator
        let values = self
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(_, value)| value)
            .collect();
        Ok(values)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}

/// Redis-backed store shared across instances
///
/// TTL is applied per key via SETEX; enumeration uses KEYS, which is
/// O(keyspace) and acceptable only at the small cohort sizes this engine
/// targets.
pub struct RedisStore {
    // ConnectionManager needs interior mutability for command execution
    conn: Arc<tokio::sync::Mutex<ConnectionManager>>,
    ttl_secs: u64,
}

impl RedisStore {
    pub async fn new(redis_url: &str, ttl: Duration) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self {
            conn: Arc::new(tokio::sync::Mutex::new(conn)),
            ttl_secs: ttl.as_secs(),
        })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;
        redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(value)
            .query_async::<()>(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("redis store set: {}", key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        Ok(value)
    }

    async fn enumerate(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.lock().await;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(format!("{}*", prefix))
            .query_async(&mut *conn)
            .await?;

        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            // A key may expire between KEYS and GET; skip the hole
            let value: Option<String> = redis::cmd("GET")
                .arg(&key)
                .query_async(&mut *conn)
                .await?;
            if let Some(value) = value {
                values.push(value);
            }
        }

        Ok(values)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;
        redis::cmd("DEL")
            .arg(key)
            .query_async::<()>(&mut *conn)
            .await?;
        Ok(())
    }
}

/// Store key builder
pub struct StoreKey;

impl StoreKey {
    pub const PROFILE_PREFIX: &'static str = "profile:";
    pub const MATCH_PREFIX: &'static str = "match:";

    /// Build the store key for a user profile
    pub fn profile(user_id: &str) -> String {
        format!("{}{}", Self::PROFILE_PREFIX, user_id)
    }

    /// Build the store key for a match record
    pub fn match_record(match_id: &str) -> String {
        format!("{}{}", Self::MATCH_PREFIX, match_id)
    }
}
