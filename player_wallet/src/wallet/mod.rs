//! Wallet ledger: exact amounts, wallet rows, and the manager that keeps the
//! durable store and the snapshot cache consistent.
//!
//! This module implements:
//! - Non-negative fixed-point `Amount` parsing
//! - Cache-aside balance reads
//! - Credit and debit serialized per wallet id
//! - Post-write cache invalidation
//!
//! ## Example
//!
//! ```no_run
//! use player_wallet::cache::MemoryWalletCache;
//! use player_wallet::db::MemoryWalletRepository;
//! use player_wallet::wallet::{NewWallet, WalletManager};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wallets = WalletManager::new(
//!         Arc::new(MemoryWalletRepository::new()),
//!         Arc::new(MemoryWalletCache::new()),
//!     );
//!
//!     let wallet = wallets.create(NewWallet::for_player(1)).await?;
//!     wallets.credit(wallet.id, "900.00").await?;
//!     wallets.debit(wallet.id, "100").await?;
//!
//!     println!("Balance: {}", wallets.get(wallet.id).await?.balance);
//!     Ok(())
//! }
//! ```

pub mod amount;
pub mod config;
pub mod errors;
pub mod locks;
pub mod manager;
pub mod models;

pub use amount::Amount;
pub use config::WalletConfig;
pub use errors::{CacheError, StoreError, WalletError, WalletResult};
pub use locks::{WalletLockGuard, WalletLocks};
pub use manager::{WalletHealth, WalletManager};
pub use models::{EntryDirection, NewWallet, PlayerId, Wallet, WalletId, parse_wallet_id};
