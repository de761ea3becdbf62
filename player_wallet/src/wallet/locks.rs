//! Per-wallet mutual exclusion for balance mutations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::models::WalletId;

/// Default registry size before idle entries are pruned
pub const DEFAULT_PRUNE_THRESHOLD: usize = 1024;

/// Registry of one async mutex per wallet id.
///
/// Two mutations of the same wallet never overlap; mutations of different
/// wallets never wait on each other. Guards are owned, so the section ends
/// when the guard is dropped, including when the holding future is cancelled.
pub struct WalletLocks {
    locks: Mutex<HashMap<WalletId, Arc<AsyncMutex<()>>>>,
    prune_threshold: usize,
}

/// Held exclusive section for one wallet id
pub struct WalletLockGuard {
    wallet_id: WalletId,
    _guard: OwnedMutexGuard<()>,
}

impl WalletLockGuard {
    /// Wallet this guard serializes
    pub fn wallet_id(&self) -> WalletId {
        self.wallet_id
    }
}

impl Default for WalletLocks {
    fn default() -> Self {
        Self::new(DEFAULT_PRUNE_THRESHOLD)
    }
}

impl WalletLocks {
    /// Create a registry that prunes idle entries above `prune_threshold`
    pub fn new(prune_threshold: usize) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            prune_threshold: prune_threshold.max(1),
        }
    }

    /// Wait for the exclusive section of `wallet_id`
    pub async fn acquire(&self, wallet_id: WalletId) -> WalletLockGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());

            if locks.len() >= self.prune_threshold {
                // Only the registry holds a reference: nobody owns or waits on it
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }

            locks
                .entry(wallet_id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        WalletLockGuard {
            wallet_id,
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of wallet ids currently tracked
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no wallet id is tracked
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_wallet_is_exclusive() {
        let locks = Arc::new(WalletLocks::default());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let inside = inside.clone();
            let max_inside = max_inside.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(6).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_inside.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_wallets_do_not_block() {
        let locks = WalletLocks::default();
        let first = locks.acquire(1).await;

        let second = tokio::time::timeout(Duration::from_millis(100), locks.acquire(2)).await;
        assert!(second.is_ok(), "wallet 2 must not wait on wallet 1");
        assert_eq!(first.wallet_id(), 1);
    }

    #[tokio::test]
    async fn test_guard_released_on_drop() {
        let locks = WalletLocks::default();
        {
            let _guard = locks.acquire(6).await;
        }

        let again = tokio::time::timeout(Duration::from_millis(100), locks.acquire(6)).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_waiter_does_not_hold_lock() {
        let locks = Arc::new(WalletLocks::default());
        let held = locks.acquire(6).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(6).await;
                tokio::time::sleep(Duration::from_secs(60)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        waiter.abort();
        let _ = waiter.await;
        drop(held);

        let again = tokio::time::timeout(Duration::from_millis(100), locks.acquire(6)).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_idle_entries_pruned() {
        let locks = WalletLocks::new(4);
        for id in 1..=4 {
            let _guard = locks.acquire(id).await;
        }
        assert_eq!(locks.len(), 4);

        let _held = locks.acquire(5).await;
        assert_eq!(locks.len(), 1);
    }
}
