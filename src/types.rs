//! Shared primitive types used across the ledgers.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Type alias for monetary amounts. All stakes, balances and payouts are
/// integers in the smallest currency unit; there is no floating point
/// anywhere in the accounting paths.
pub type Amount = u64;

/// Type alias for randomness request / game ids. Ids are allocated
/// monotonically by the coordinator and never reused.
pub type RequestId = u64;

/// A card is an index into a standard 52-card deck (0..52).
/// Suit is `card / 13`, value is `card % 13`.
pub type Card = u8;

/// Number of cards dealt per game: two hole cards for the player and the
/// house each, plus five community cards.
pub const CARDS_PER_GAME: usize = 9;

/// An account identifier. Wraps an opaque address string; the empty string
/// plays the role of the null address and is rejected wherever an address
/// is required to be live.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the null address.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}
