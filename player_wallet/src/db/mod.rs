//! Durable store for wallet rows.
//!
//! The PostgreSQL `wallets` table is the only authority for a wallet's
//! balance. `Database` owns the sqlx pool and hands out repositories that
//! bound each query by the configured timeout.

use log::info;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::wallet::WalletResult;

pub mod config;
pub mod memory;
pub mod repository;
pub mod timeouts;

pub use config::DatabaseConfig;
pub use memory::MemoryWalletRepository;
pub use repository::{PgWalletRepository, WalletRepository};

/// Pooled PostgreSQL connection backing the wallet ledger
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    query_timeout: Duration,
}

impl Database {
    /// Open the pool sized and timed by `config`
    ///
    /// # Errors
    ///
    /// Returns the sqlx error when no connection can be established within
    /// `connection_timeout_secs`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use player_wallet::db::{Database, DatabaseConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let db = Database::new(&DatabaseConfig::from_env()?).await?;
    ///     let wallets = db.wallets();
    ///     wallets.ensure_schema().await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.database_url)
            .await?;

        info!(
            "Wallet store pool ready ({}..{} connections, {:?} query timeout)",
            config.min_connections,
            config.max_connections,
            config.query_timeout()
        );

        Ok(Self {
            pool,
            query_timeout: config.query_timeout(),
        })
    }

    /// Raw pool, for callers that build their own repository
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wallet repository sharing this pool and its query timeout
    pub fn wallets(&self) -> PgWalletRepository {
        PgWalletRepository::new(self.pool.clone()).with_query_timeout(self.query_timeout)
    }

    /// Round-trip a trivial query, bounded by the query timeout
    pub async fn health_check(&self) -> WalletResult<()> {
        self.wallets().health_check().await
    }
}
