//! Cache configuration.

use std::env;
use std::time::Duration;

use crate::db::config::parse_env_or;

/// Default key prefix for cached wallet snapshots
pub const DEFAULT_KEY_PREFIX: &str = "wallet:";

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis connection URL
    pub redis_url: String,

    /// Prefix prepended to the wallet id to build the cache key
    pub key_prefix: String,

    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
}

impl CacheConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `REDIS_URL`: Redis connection string (default: `redis://127.0.0.1:6379`)
    /// - `REDIS_KEY_PREFIX`: Cache key prefix (default: `wallet:`)
    /// - `CACHE_TIMEOUT_MS`: Per-call timeout in milliseconds (default: 500)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            key_prefix: env::var("REDIS_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            timeout_ms: parse_env_or("CACHE_TIMEOUT_MS", defaults.timeout_ms),
        }
    }

    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            timeout_ms: 500,
        }
    }
}
