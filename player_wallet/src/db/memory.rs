//! In-process wallet store for development runs and tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::repository::WalletRepository;
use crate::wallet::{NewWallet, Wallet, WalletError, WalletId, WalletResult};

/// `WalletRepository` backed by a process-local map.
///
/// Not durable across restarts. Ids are assigned sequentially from 1.
#[derive(Default)]
pub struct MemoryWalletRepository {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    wallets: HashMap<WalletId, Wallet>,
    last_id: WalletId,
}

impl MemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored wallets
    pub async fn len(&self) -> usize {
        self.inner.read().await.wallets.len()
    }

    /// Whether no wallet is stored
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn save_balance(&self, wallet: &Wallet) -> WalletResult<()> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .wallets
            .get_mut(&wallet.id)
            .ok_or(WalletError::NotFound(wallet.id))?;
        stored.balance = wallet.balance;
        stored.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl WalletRepository for MemoryWalletRepository {
    async fn create(&self, wallet: &NewWallet) -> WalletResult<Wallet> {
        if wallet.balance.is_negative() {
            return Err(WalletError::InvalidAmount(wallet.balance.to_string()));
        }

        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let now = Utc::now();
        let created = Wallet {
            id: inner.last_id,
            player_id: wallet.player_id,
            balance: wallet.balance,
            created_at: now,
            updated_at: now,
        };
        inner.wallets.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: WalletId) -> WalletResult<Wallet> {
        self.inner
            .read()
            .await
            .wallets
            .get(&id)
            .cloned()
            .ok_or(WalletError::NotFound(id))
    }

    async fn credit(&self, wallet: &Wallet) -> WalletResult<()> {
        self.save_balance(wallet).await
    }

    async fn debit(&self, wallet: &Wallet) -> WalletResult<()> {
        self.save_balance(wallet).await
    }

    async fn health_check(&self) -> WalletResult<()> {
        Ok(())
    }
}
