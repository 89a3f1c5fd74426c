//! Redis-backed dedup cache
//!
//! Values are stored as plain strings with no expiry (`SET key value`).

use crate::cache::DedupCache;
use crate::error::StoreError;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

/// Shared, reconnecting Redis handle. Cloning is cheap.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Open a managed connection and verify it with `PING`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let mut conn = ConnectionManager::new(client).await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!(reply = %pong, "connected to redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl DedupCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }
}
