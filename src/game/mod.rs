//! Bet settlement engine.
//!
//! The engine orchestrates the full life of a wager: it takes the payment,
//! earmarks the jackpot contribution and oracle fee into the pool, opens a
//! randomness request, and once the cards are dealt and the result is set,
//! holds the win amounts until the player pulls them with a claim. Each
//! game moves strictly Pending -> Resolved -> Claimed and pays out exactly
//! once.

pub mod engine;
pub mod errors;
pub mod evaluators;
pub mod models;

pub use engine::SettlementEngine;
pub use errors::{EngineError, EngineResult};
pub use evaluators::{ColorEvaluator, HandEvaluator, HighCardEvaluator, SuitParityColorEvaluator};
pub use models::{ColorChoice, GameRequest, GameStatus, PokerOutcome};
