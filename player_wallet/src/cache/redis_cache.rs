//! Redis-backed wallet snapshot cache.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::future::Future;
use std::time::Duration;

use super::{CacheConfig, WalletCache};
use crate::wallet::{CacheError, Wallet, WalletError, WalletId, WalletResult};

/// `WalletCache` storing JSON snapshots in Redis without expiry
#[derive(Clone)]
pub struct RedisWalletCache {
    conn: ConnectionManager,
    key_prefix: String,
    timeout: Duration,
}

impl RedisWalletCache {
    /// Connect to Redis
    ///
    /// # Errors
    ///
    /// * `WalletError::Cache` - Invalid URL or connection failure
    pub async fn connect(config: &CacheConfig) -> WalletResult<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        let conn = bounded(config.timeout(), client.get_connection_manager()).await?;

        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
            timeout: config.timeout(),
        })
    }

    /// Cache key for a wallet id
    pub fn key(&self, id: WalletId) -> String {
        format!("{}{}", self.key_prefix, id)
    }
}

async fn bounded<F, T>(duration: Duration, future: F) -> Result<T, CacheError>
where
    F: Future<Output = Result<T, redis::RedisError>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result.map_err(CacheError::Redis),
        Err(_) => Err(CacheError::Timeout(duration)),
    }
}

#[async_trait]
impl WalletCache for RedisWalletCache {
    async fn get(&self, id: WalletId) -> WalletResult<Wallet> {
        let mut conn = self.conn.clone();
        let key = self.key(id);
        let value: Option<String> = bounded(self.timeout, conn.get(&key)).await?;

        match value {
            Some(json) => Ok(serde_json::from_str(&json).map_err(CacheError::Serialization)?),
            None => Err(WalletError::CacheMiss(id)),
        }
    }

    async fn set(&self, id: WalletId, wallet: &Wallet) -> WalletResult<()> {
        let mut conn = self.conn.clone();
        let key = self.key(id);
        let payload = serde_json::to_string(wallet).map_err(CacheError::Serialization)?;
        let (): () = bounded(self.timeout, conn.set(&key, payload)).await?;
        Ok(())
    }

    async fn delete(&self, id: WalletId) -> WalletResult<()> {
        let mut conn = self.conn.clone();
        let key = self.key(id);
        let (): () = bounded(self.timeout, conn.del(&key)).await?;
        Ok(())
    }

    async fn health_check(&self) -> WalletResult<()> {
        let mut conn = self.conn.clone();
        let _pong: String = bounded(self.timeout, redis::cmd("PING").query_async(&mut conn)).await?;
        Ok(())
    }
}
