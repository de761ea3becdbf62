//! Wallet repository trait and its PostgreSQL implementation.
//!
//! The trait keeps the ledger independent of the backing store, enabling
//! in-process implementations for development and counting mocks for tests.
#![allow(clippy::needless_raw_string_hashes)]

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::time::Duration;

use super::timeouts::{DEFAULT_QUERY_TIMEOUT, with_timeout};
use crate::wallet::{Amount, NewWallet, Wallet, WalletError, WalletId, WalletResult};

/// Trait for durable wallet storage
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Insert a new wallet row; the store assigns id and timestamps
    async fn create(&self, wallet: &NewWallet) -> WalletResult<Wallet>;

    /// Fetch a wallet by id
    ///
    /// # Errors
    ///
    /// * `WalletError::NotFound` - No row for this id
    async fn get(&self, id: WalletId) -> WalletResult<Wallet>;

    /// Persist the wallet's in-memory balance after a credit
    async fn credit(&self, wallet: &Wallet) -> WalletResult<()>;

    /// Persist the wallet's in-memory balance after a debit
    async fn debit(&self, wallet: &Wallet) -> WalletResult<()>;

    /// Check that the store is reachable
    async fn health_check(&self) -> WalletResult<()>;
}

/// PostgreSQL implementation of `WalletRepository`
#[derive(Clone)]
pub struct PgWalletRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgWalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Bound every query by `query_timeout`
    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    /// Create the `wallets` table and its index if they don't exist
    pub async fn ensure_schema(&self) -> WalletResult<()> {
        with_timeout(
            self.query_timeout,
            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS wallets (
                    id BIGSERIAL PRIMARY KEY,
                    player_id BIGINT NOT NULL,
                    balance NUMERIC NOT NULL DEFAULT 0 CHECK (balance >= 0),
                    created_at TIMESTAMP NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMP NOT NULL DEFAULT NOW()
                )
                "#,
            )
            .execute(&self.pool),
        )
        .await?;

        with_timeout(
            self.query_timeout,
            sqlx::query("CREATE INDEX IF NOT EXISTS idx_wallets_player_id ON wallets (player_id)")
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    /// Overwrite the durable balance with the wallet's current value
    async fn save_balance(&self, wallet: &Wallet) -> WalletResult<()> {
        let result = with_timeout(
            self.query_timeout,
            sqlx::query("UPDATE wallets SET balance = $1, updated_at = NOW() WHERE id = $2")
                .bind(wallet.balance.inner())
                .bind(wallet.id)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(WalletError::NotFound(wallet.id));
        }

        Ok(())
    }
}

fn wallet_from_row(row: &PgRow) -> Result<Wallet, sqlx::Error> {
    Ok(Wallet {
        id: row.try_get("id")?,
        player_id: row.try_get("player_id")?,
        balance: Amount::from_decimal(row.try_get::<Decimal, _>("balance")?),
        created_at: row.try_get::<NaiveDateTime, _>("created_at")?.and_utc(),
        updated_at: row.try_get::<NaiveDateTime, _>("updated_at")?.and_utc(),
    })
}

#[async_trait]
impl WalletRepository for PgWalletRepository {
    async fn create(&self, wallet: &NewWallet) -> WalletResult<Wallet> {
        let row = with_timeout(
            self.query_timeout,
            sqlx::query(
                r#"
                INSERT INTO wallets (player_id, balance)
                VALUES ($1, $2)
                RETURNING id, player_id, balance, created_at, updated_at
                "#,
            )
            .bind(wallet.player_id)
            .bind(wallet.balance.inner())
            .fetch_one(&self.pool),
        )
        .await?;

        Ok(wallet_from_row(&row)?)
    }

    async fn get(&self, id: WalletId) -> WalletResult<Wallet> {
        let row = with_timeout(
            self.query_timeout,
            sqlx::query(
                r#"
                SELECT id, player_id, balance, created_at, updated_at
                FROM wallets
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(WalletError::NotFound(id))?;

        Ok(wallet_from_row(&row)?)
    }

    async fn credit(&self, wallet: &Wallet) -> WalletResult<()> {
        self.save_balance(wallet).await
    }

    async fn debit(&self, wallet: &Wallet) -> WalletResult<()> {
        self.save_balance(wallet).await
    }

    async fn health_check(&self) -> WalletResult<()> {
        with_timeout(
            self.query_timeout,
            sqlx::query("SELECT 1").execute(&self.pool),
        )
        .await?;
        Ok(())
    }
}
