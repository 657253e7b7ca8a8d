//! Referral program ledger.
//!
//! Players can be referred by exactly one referrer, set once. Each settled
//! wager carries a referral share of the payment; the referrer is credited a
//! percentage of that share, where the percentage steps up with the
//! referrer's own cumulative winnings through a configurable milestone
//! table. Bonuses accumulate in the ledger and are withdrawn pull-style
//! from the liquidity pool.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{ReferralError, ReferralResult};
pub use manager::ReferralLedger;
pub use models::{MilestoneTable, ReferralStats};
