//! Wallet manager: cache-aside reads and serialized balance mutation.

use log::{debug, warn};
use std::sync::Arc;

use super::{
    amount::Amount,
    config::WalletConfig,
    errors::{WalletError, WalletResult},
    locks::WalletLocks,
    models::{EntryDirection, NewWallet, PlayerId, Wallet, WalletId},
};
use crate::{cache::WalletCache, db::WalletRepository};

/// Reachability of the wallet's backing services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletHealth {
    pub store: bool,
    pub cache: bool,
}

impl WalletHealth {
    /// The service can answer requests as long as the store is reachable
    pub fn is_healthy(&self) -> bool {
        self.store
    }
}

/// Wallet manager
///
/// The durable store is the system of record. The cache is filled lazily on
/// reads and dropped after every mutation; it is never used as the basis
/// of a mutation.
#[derive(Clone)]
pub struct WalletManager {
    repository: Arc<dyn WalletRepository>,
    cache: Arc<dyn WalletCache>,
    locks: Arc<WalletLocks>,
    config: WalletConfig,
}

impl WalletManager {
    /// Create a new wallet manager with default configuration
    ///
    /// # Arguments
    ///
    /// * `repository` - Durable wallet store
    /// * `cache` - Snapshot cache
    pub fn new(repository: Arc<dyn WalletRepository>, cache: Arc<dyn WalletCache>) -> Self {
        Self::with_config(repository, cache, WalletConfig::default())
    }

    /// Create a new wallet manager
    pub fn with_config(
        repository: Arc<dyn WalletRepository>,
        cache: Arc<dyn WalletCache>,
        config: WalletConfig,
    ) -> Self {
        let locks = Arc::new(WalletLocks::new(config.lock_prune_threshold));
        Self {
            repository,
            cache,
            locks,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Create a wallet
    ///
    /// Delegates to the store; the cache is populated on first read.
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidAmount` - Opening balance is negative
    /// * `WalletError::Store` - Insert failed
    pub async fn create(&self, wallet: NewWallet) -> WalletResult<Wallet> {
        if wallet.balance.is_negative() {
            return Err(WalletError::InvalidAmount(wallet.balance.to_string()));
        }

        let created = self.repository.create(&wallet).await?;
        debug!(
            "Created wallet {} for player {} with balance {}",
            created.id, created.player_id, created.balance
        );
        Ok(created)
    }

    /// Create a wallet for a player with the configured opening balance
    pub async fn create_for_player(&self, player_id: PlayerId) -> WalletResult<Wallet> {
        self.create(NewWallet {
            player_id,
            balance: self.config.initial_balance,
        })
        .await
    }

    /// Get a wallet, serving from cache when possible
    ///
    /// Cache hits take no lock. A miss reads the store and refills the cache
    /// inside the wallet's exclusive section.
    ///
    /// # Arguments
    ///
    /// * `id` - Wallet ID
    ///
    /// # Returns
    ///
    /// * `WalletResult<Wallet>` - Cached snapshot, or the durable row
    ///
    /// # Errors
    ///
    /// * `WalletError::NotFound` - No durable row
    /// * `WalletError::Store` - Store failure
    pub async fn get(&self, id: WalletId) -> WalletResult<Wallet> {
        match self.cache.get(id).await {
            Ok(wallet) => {
                debug!("Cache hit for wallet {id}");
                return Ok(wallet);
            }
            Err(WalletError::CacheMiss(_)) => debug!("Cache miss for wallet {id}"),
            // The store is authoritative; an unavailable cache only costs a read
            Err(e) => warn!("Cache read failed for wallet {id}, reading store: {e}"),
        }

        // Refill under the wallet's lock so a concurrent mutation cannot
        // land between the store read and the cache write
        let _guard = self.locks.acquire(id).await;
        let wallet = self.repository.get(id).await?;

        if let Err(e) = self.cache.set(id, &wallet).await {
            warn!("Failed to cache wallet {id}: {e}");
        }

        Ok(wallet)
    }

    /// Credit a wallet
    ///
    /// # Arguments
    ///
    /// * `id` - Wallet ID
    /// * `amount` - Decimal amount to add
    ///
    /// # Errors
    ///
    /// * `WalletError::NotFound` - No durable row
    /// * `WalletError::InvalidAmount` - Malformed or negative amount
    /// * `WalletError::Store` - Store failure
    pub async fn credit(&self, id: WalletId, amount: &str) -> WalletResult<()> {
        self.mutate(id, amount, EntryDirection::Credit).await
    }

    /// Debit a wallet
    ///
    /// # Arguments
    ///
    /// * `id` - Wallet ID
    /// * `amount` - Decimal amount to subtract
    ///
    /// # Errors
    ///
    /// * `WalletError::NotFound` - No durable row
    /// * `WalletError::InvalidAmount` - Malformed or negative amount
    /// * `WalletError::InsufficientFunds` - Balance would go below zero
    /// * `WalletError::Store` - Store failure
    pub async fn debit(&self, id: WalletId, amount: &str) -> WalletResult<()> {
        self.mutate(id, amount, EntryDirection::Debit).await
    }

    /// Report store and cache reachability
    pub async fn health(&self) -> WalletHealth {
        WalletHealth {
            store: self.repository.health_check().await.is_ok(),
            cache: self.cache.health_check().await.is_ok(),
        }
    }

    /// Read-compute-write under the wallet's exclusive section.
    ///
    /// Business-rule failures return before any write. Once the write has been
    /// attempted the cached snapshot is dropped whatever the outcome: a failed
    /// or timed-out write may still have committed.
    async fn mutate(
        &self,
        id: WalletId,
        amount: &str,
        direction: EntryDirection,
    ) -> WalletResult<()> {
        let _guard = self.locks.acquire(id).await;

        let mut wallet = self.repository.get(id).await?;
        let amount = Amount::parse(amount)?;

        let new_balance = match direction {
            EntryDirection::Credit => wallet.balance.checked_add(amount),
            EntryDirection::Debit => wallet.balance.checked_sub(amount),
        }
        .ok_or(WalletError::BalanceOverflow)?;

        if new_balance.is_negative() {
            return Err(WalletError::InsufficientFunds {
                available: wallet.balance,
                required: amount,
            });
        }

        wallet.balance = new_balance;

        let persisted = match direction {
            EntryDirection::Credit => self.repository.credit(&wallet).await,
            EntryDirection::Debit => self.repository.debit(&wallet).await,
        };

        if let Err(e) = self.cache.delete(id).await {
            warn!("Failed to invalidate cached wallet {id} after {direction}: {e}");
        }

        persisted?;
        debug!("Wallet {id} {direction} of {amount}, balance now {new_balance}");
        Ok(())
    }
}
