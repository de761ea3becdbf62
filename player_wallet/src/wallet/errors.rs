//! Wallet error types.

use std::time::Duration;
use thiserror::Error;

use super::{amount::Amount, models::WalletId};

/// Wallet errors
#[derive(Debug, Error)]
pub enum WalletError {
    /// No durable row for this wallet id
    #[error("Wallet not found: {0}")]
    NotFound(WalletId),

    /// Debit would drive the balance below zero
    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: Amount, required: Amount },

    /// Amount is not a well-formed, non-negative decimal
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Wallet id is not a positive integer
    #[error("Invalid wallet id: {0:?}")]
    InvalidWalletId(String),

    /// No cached snapshot; callers fall through to the durable store
    #[error("Cache miss for wallet {0}")]
    CacheMiss(WalletId),

    /// Balance arithmetic exceeded decimal range
    #[error("Balance overflow")]
    BalanceOverflow,

    /// Durable store failure
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),

    /// Cache failure
    #[error("Cache failure: {0}")]
    Cache(#[from] CacheError),
}

/// Durable store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Query did not finish in time
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Cache failures
#[derive(Debug, Error)]
pub enum CacheError {
    /// Redis error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Snapshot could not be encoded or decoded
    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cache call did not finish in time
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<sqlx::Error> for WalletError {
    fn from(err: sqlx::Error) -> Self {
        WalletError::Store(StoreError::Database(err))
    }
}

impl From<redis::RedisError> for WalletError {
    fn from(err: redis::RedisError) -> Self {
        WalletError::Cache(CacheError::Redis(err))
    }
}

impl WalletError {
    /// Whether the error is a business-rule rejection the caller can act on.
    ///
    /// Infrastructure failures and the internal cache-miss signal return `false`.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WalletError::NotFound(_)
                | WalletError::InsufficientFunds { .. }
                | WalletError::InvalidAmount(_)
                | WalletError::InvalidWalletId(_)
                | WalletError::BalanceOverflow
        )
    }

    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Store and cache errors are sanitized to prevent information disclosure
    /// about the internal system structure, and wallet ids are redacted.
    pub fn client_message(&self) -> String {
        match self {
            WalletError::NotFound(_) => "Wallet not found".to_string(),
            WalletError::InsufficientFunds { .. } => "Insufficient funds".to_string(),
            WalletError::InvalidAmount(_) => "Invalid amount".to_string(),
            WalletError::InvalidWalletId(_) => "Invalid wallet id".to_string(),
            WalletError::BalanceOverflow => "Amount too large".to_string(),
            WalletError::CacheMiss(_) | WalletError::Store(_) | WalletError::Cache(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;
