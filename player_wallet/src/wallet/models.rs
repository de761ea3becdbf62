//! Wallet data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    amount::Amount,
    errors::{WalletError, WalletResult},
};

/// Wallet ID type
pub type WalletId = i64;

/// Player ID type
pub type PlayerId = i64;

/// Wallet model
///
/// Also the shape of the cached snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    #[serde(rename = "playerId")]
    pub player_id: PlayerId,
    pub balance: Amount,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wallet creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWallet {
    pub player_id: PlayerId,
    pub balance: Amount,
}

impl NewWallet {
    /// Empty wallet for a player
    pub fn for_player(player_id: PlayerId) -> Self {
        Self {
            player_id,
            balance: Amount::ZERO,
        }
    }
}

/// Direction of a balance mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    Debit,
    Credit,
}

impl std::fmt::Display for EntryDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryDirection::Debit => write!(f, "debit"),
            EntryDirection::Credit => write!(f, "credit"),
        }
    }
}

/// Parse a caller-supplied wallet id.
///
/// Only base-10 integers greater than zero are accepted.
///
/// # Errors
///
/// * `WalletError::InvalidWalletId` - Not a positive integer
pub fn parse_wallet_id(input: &str) -> WalletResult<WalletId> {
    match input.parse::<WalletId>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(WalletError::InvalidWalletId(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wallet_id() {
        assert_eq!(parse_wallet_id("6").unwrap(), 6);
        assert_eq!(parse_wallet_id("9223372036854775807").unwrap(), i64::MAX);

        for bad in ["0", "-1", "abc", "", "6.0", "99999999999999999999"] {
            assert!(
                matches!(parse_wallet_id(bad), Err(WalletError::InvalidWalletId(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_wallet_snapshot_json_shape() {
        let wallet = Wallet {
            id: 6,
            player_id: 1,
            balance: Amount::parse("900.00").unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&wallet).unwrap();
        assert_eq!(value["id"], 6);
        assert_eq!(value["playerId"], 1);
        assert_eq!(value["balance"], "900.00");

        let back: Wallet = serde_json::from_value(value).unwrap();
        assert_eq!(back, wallet);
    }

    #[test]
    fn test_entry_direction_display() {
        assert_eq!(EntryDirection::Credit.to_string(), "credit");
        assert_eq!(EntryDirection::Debit.to_string(), "debit");
    }
}
