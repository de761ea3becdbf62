//! Walk through the wallet lifecycle on the in-process backends.
//!
//! Run with: `cargo run --example wallet_walkthrough`

use player_wallet::{
    cache::MemoryWalletCache,
    db::MemoryWalletRepository,
    wallet::{NewWallet, WalletError, WalletManager},
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), WalletError> {
    let wallets = WalletManager::new(
        Arc::new(MemoryWalletRepository::new()),
        Arc::new(MemoryWalletCache::new()),
    );

    let wallet = wallets.create(NewWallet::for_player(1)).await?;
    println!("Created wallet {} for player {}", wallet.id, wallet.player_id);

    wallets.credit(wallet.id, "900.00").await?;
    wallets.credit(wallet.id, "5000").await?;
    println!("Balance after credits: {}", wallets.get(wallet.id).await?.balance);

    match wallets.debit(wallet.id, "10000").await {
        Err(e @ WalletError::InsufficientFunds { .. }) => println!("Debit rejected: {e}"),
        other => println!("Unexpected debit result: {other:?}"),
    }

    match wallets.credit(wallet.id, "-5000").await {
        Err(e) => println!("Credit rejected: {e}"),
        Ok(()) => println!("Negative credit accepted?"),
    }

    wallets.debit(wallet.id, "5900").await?;
    println!("Final balance: {}", wallets.get(wallet.id).await?.balance);

    Ok(())
}
