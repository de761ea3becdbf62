//! Volatile read-through cache for wallet snapshots.
//!
//! The cache only ever holds a disposable copy of a durable row. Any
//! implementation of `WalletCache` is substitutable: Redis for deployments,
//! a process-local map for development and tests.

use async_trait::async_trait;

use crate::wallet::{Wallet, WalletId, WalletResult};

pub mod config;
pub mod memory;
pub mod redis_cache;

pub use config::CacheConfig;
pub use memory::MemoryWalletCache;
pub use redis_cache::RedisWalletCache;

/// Trait for wallet snapshot caches
#[async_trait]
pub trait WalletCache: Send + Sync {
    /// Fetch a cached snapshot
    ///
    /// # Errors
    ///
    /// * `WalletError::CacheMiss` - No entry for this id
    /// * `WalletError::Cache` - Cache unreachable or snapshot unreadable
    async fn get(&self, id: WalletId) -> WalletResult<Wallet>;

    /// Store a snapshot with no expiry, replacing any previous entry
    async fn set(&self, id: WalletId, wallet: &Wallet) -> WalletResult<()>;

    /// Remove the entry; removing an absent entry succeeds
    async fn delete(&self, id: WalletId) -> WalletResult<()>;

    /// Check that the cache is reachable
    async fn health_check(&self) -> WalletResult<()>;
}

/// Mock implementation for testing
#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::wallet::{CacheError, WalletError};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    /// Cache double that counts calls and can fail on demand
    #[derive(Default)]
    pub struct MockWalletCache {
        entries: Mutex<HashMap<WalletId, Wallet>>,
        pub get_calls: AtomicUsize,
        pub set_calls: AtomicUsize,
        pub delete_calls: AtomicUsize,
        fail_gets: AtomicBool,
        fail_sets: AtomicBool,
        fail_deletes: AtomicBool,
        set_delay: Mutex<Option<Duration>>,
    }

    fn unavailable() -> WalletError {
        CacheError::Timeout(Duration::from_millis(1)).into()
    }

    impl MockWalletCache {
        pub fn new() -> Self {
            Self::default()
        }

        /// Sleep inside every `set` to widen refill windows
        pub fn with_set_delay(self, delay: Duration) -> Self {
            *self.set_delay.lock().unwrap() = Some(delay);
            self
        }

        pub fn fail_gets(&self, fail: bool) {
            self.fail_gets.store(fail, Ordering::SeqCst);
        }

        pub fn fail_sets(&self, fail: bool) {
            self.fail_sets.store(fail, Ordering::SeqCst);
        }

        pub fn fail_deletes(&self, fail: bool) {
            self.fail_deletes.store(fail, Ordering::SeqCst);
        }

        pub fn cached(&self, id: WalletId) -> Option<Wallet> {
            self.entries.lock().unwrap().get(&id).cloned()
        }

        pub fn insert(&self, wallet: Wallet) {
            self.entries.lock().unwrap().insert(wallet.id, wallet);
        }
    }

    #[async_trait]
    impl WalletCache for MockWalletCache {
        async fn get(&self, id: WalletId) -> WalletResult<Wallet> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_gets.load(Ordering::SeqCst) {
                return Err(unavailable());
            }
            self.cached(id).ok_or(WalletError::CacheMiss(id))
        }

        async fn set(&self, id: WalletId, wallet: &Wallet) -> WalletResult<()> {
            self.set_calls.fetch_add(1, Ordering::SeqCst);
            let delay = *self.set_delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_sets.load(Ordering::SeqCst) {
                return Err(unavailable());
            }
            self.entries.lock().unwrap().insert(id, wallet.clone());
            Ok(())
        }

        async fn delete(&self, id: WalletId) -> WalletResult<()> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(unavailable());
            }
            self.entries.lock().unwrap().remove(&id);
            Ok(())
        }

        async fn health_check(&self) -> WalletResult<()> {
            if self.fail_gets.load(Ordering::SeqCst) {
                return Err(unavailable());
            }
            Ok(())
        }
    }
}
