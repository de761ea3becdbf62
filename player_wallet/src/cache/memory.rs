//! In-process wallet snapshot cache.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::WalletCache;
use crate::wallet::{Wallet, WalletError, WalletId, WalletResult};

/// `WalletCache` backed by a process-local map
#[derive(Default)]
pub struct MemoryWalletCache {
    entries: RwLock<HashMap<WalletId, Wallet>>,
}

impl MemoryWalletCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a snapshot is cached for `id`
    pub async fn contains(&self, id: WalletId) -> bool {
        self.entries.read().await.contains_key(&id)
    }
}

#[async_trait]
impl WalletCache for MemoryWalletCache {
    async fn get(&self, id: WalletId) -> WalletResult<Wallet> {
        self.entries
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(WalletError::CacheMiss(id))
    }

    async fn set(&self, id: WalletId, wallet: &Wallet) -> WalletResult<()> {
        self.entries.write().await.insert(id, wallet.clone());
        Ok(())
    }

    async fn delete(&self, id: WalletId) -> WalletResult<()> {
        self.entries.write().await.remove(&id);
        Ok(())
    }

    async fn health_check(&self) -> WalletResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::Amount;
    use chrono::Utc;

    fn wallet(id: WalletId, balance: &str) -> Wallet {
        Wallet {
            id,
            player_id: 1,
            balance: Amount::parse(balance).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_get_absent_is_miss() {
        let cache = MemoryWalletCache::new();
        assert!(matches!(cache.get(6).await, Err(WalletError::CacheMiss(6))));
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = MemoryWalletCache::new();
        cache.set(6, &wallet(6, "1")).await.unwrap();
        cache.set(6, &wallet(6, "2")).await.unwrap();
        assert_eq!(cache.get(6).await.unwrap().balance, Amount::parse("2").unwrap());
    }

    #[tokio::test]
    async fn test_delete_absent_is_ok() {
        let cache = MemoryWalletCache::new();
        assert!(cache.delete(6).await.is_ok());

        cache.set(6, &wallet(6, "1")).await.unwrap();
        cache.delete(6).await.unwrap();
        assert!(!cache.contains(6).await);
    }
}
