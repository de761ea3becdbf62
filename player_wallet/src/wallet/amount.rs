//! Exact-decimal monetary amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::{WalletError, WalletResult};

/// Exact decimal amount used for balances and credit/debit values.
///
/// Equality, ordering and hashing compare numeric value, so `0` and `0.00`
/// are the same amount. Arithmetic never goes through binary floating point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero amount
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Parse a caller-supplied amount.
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidAmount` - Empty, malformed or negative input
    ///
    /// # Example
    ///
    /// ```
    /// use player_wallet::wallet::Amount;
    ///
    /// let a = Amount::parse("0.10").unwrap();
    /// let b = Amount::parse("0.20").unwrap();
    /// assert_eq!(a.checked_add(b).unwrap().to_string(), "0.30");
    /// assert!(Amount::parse("-5000").is_err());
    /// ```
    pub fn parse(input: &str) -> WalletResult<Self> {
        let invalid = || WalletError::InvalidAmount(input.to_string());

        if !is_plain_decimal(input) {
            return Err(invalid());
        }

        let mut value = Decimal::from_str(input).map_err(|_| invalid())?;

        if value.is_zero() {
            // "-0" is zero, not a negative amount
            value.set_sign_positive(true);
        } else if value.is_sign_negative() {
            return Err(invalid());
        }

        Ok(Self(value))
    }

    /// Wrap a decimal value without validation
    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    /// Underlying decimal value
    pub fn inner(self) -> Decimal {
        self.0
    }

    /// Add two amounts, `None` on decimal overflow
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Subtract two amounts, `None` on decimal overflow. The result may be negative.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Whether the amount is strictly below zero
    pub fn is_negative(self) -> bool {
        !self.0.is_zero() && self.0.is_sign_negative()
    }
}

/// `[+-]?digits[.digits]`, nothing else: no separators, exponents or blanks
fn is_plain_decimal(input: &str) -> bool {
    let unsigned = input.strip_prefix(['+', '-']).unwrap_or(input);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    digits(whole) && fraction.is_none_or(digits)
}

impl FromStr for Amount {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Strings keep the scale and avoid float round-trips in JSON
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl serde::de::Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal amount as string or integer")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::parse(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Amount, E> {
        if v < 0 {
            return Err(E::custom(format!("negative amount {v}")));
        }
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }
}
