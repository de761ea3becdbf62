//! Wallet ledger configuration.

use std::env;

use super::{
    amount::Amount,
    errors::{WalletError, WalletResult},
    locks::DEFAULT_PRUNE_THRESHOLD,
};

/// Ledger configuration
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Opening balance for wallets created through `create_for_player`
    pub initial_balance: Amount,

    /// Lock registry size before idle per-wallet locks are dropped
    pub lock_prune_threshold: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            initial_balance: Amount::ZERO,
            lock_prune_threshold: DEFAULT_PRUNE_THRESHOLD,
        }
    }
}

impl WalletConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DEFAULT_WALLET_BALANCE`: Opening balance (default: 0)
    /// - `WALLET_LOCK_PRUNE_THRESHOLD`: Lock registry size (default: 1024)
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidAmount` - `DEFAULT_WALLET_BALANCE` is not a non-negative decimal
    pub fn from_env() -> WalletResult<Self> {
        let initial_balance = match env::var("DEFAULT_WALLET_BALANCE") {
            Ok(value) => Amount::parse(&value)?,
            Err(_) => Amount::ZERO,
        };

        let lock_prune_threshold = env::var("WALLET_LOCK_PRUNE_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PRUNE_THRESHOLD);

        Ok(Self {
            initial_balance,
            lock_prune_threshold,
        })
    }

    /// Set the opening balance
    pub fn with_initial_balance(mut self, balance: &str) -> Result<Self, WalletError> {
        self.initial_balance = Amount::parse(balance)?;
        Ok(self)
    }
}
