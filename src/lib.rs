//! A poker wagering and pool settlement engine.
//!
//! Players wager against a shared liquidity pool: each payment splits into a
//! poker stake and a color side bet, a flat oracle fee and a per-mille
//! jackpot contribution are earmarked, and the game resolves once an
//! operator delivers the dealt cards through the randomness coordinator.
//! Winnings are pull-payments to the wagering player, claimed exactly
//! once. A referral ledger credits referrers a milestone-scaled share of
//! every settled wager their referees play.
//!
//! All accounting is integer arithmetic in the smallest currency unit.
//!
//! # Example
//!
//! ```
//! use xpoker::config::EngineConfig;
//! use xpoker::game::{ColorChoice, HighCardEvaluator, SettlementEngine, SuitParityColorEvaluator};
//! use xpoker::types::AccountId;
//!
//! let owner = AccountId::new("owner");
//! let mut engine = SettlementEngine::new(
//!     owner.clone(),
//!     AccountId::new("engine"),
//!     EngineConfig::default(),
//!     Box::new(HighCardEvaluator),
//!     Box::new(SuitParityColorEvaluator),
//! )
//! .unwrap();
//!
//! let lp = AccountId::new("lp");
//! engine.add_to_whitelist(&owner, lp.clone()).unwrap();
//! engine.deposit(&lp, 1_000_000_000).unwrap();
//! let id = engine
//!     .place_wager(&AccountId::new("alice"), 100_000_000, 40_000_000, ColorChoice::Even)
//!     .unwrap();
//! assert!(engine.get_game(id).is_some());
//! ```

pub mod config;
pub mod game;
pub mod oracle;
pub mod pool;
pub mod referral;
pub mod types;

pub use config::EngineConfig;
pub use game::{EngineError, EngineResult, SettlementEngine};
pub use oracle::{OracleError, RandomnessCoordinator};
pub use pool::{LiquidityPool, PoolError};
pub use referral::{ReferralError, ReferralLedger};
pub use types::{AccountId, Amount, Card, RequestId};
