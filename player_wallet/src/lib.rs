//! # Player Wallet
//!
//! Player-account wallets with a durable system of record and a volatile
//! read-through cache.
//!
//! ## Consistency model
//!
//! - Reads are cache-aside: a hit is served from the cache, a miss is read
//!   from the store and written back best-effort.
//! - Credits and debits are serialized per wallet id, read the store (never the
//!   cache), persist the new balance, then drop the cached snapshot.
//! - Balances never go below zero.
//!
//! ## Core Modules
//!
//! - [`wallet`]: Amounts, models, errors and the `WalletManager`
//! - [`db`]: Durable store (PostgreSQL or in-process)
//! - [`cache`]: Snapshot cache (Redis or in-process)

/// Snapshot cache adapters.
pub mod cache;

/// Durable store adapters and connection pool.
pub mod db;

/// Wallet ledger.
pub mod wallet;
pub use wallet::{
    Amount, NewWallet, Wallet, WalletConfig, WalletError, WalletId, WalletManager, WalletResult,
};
