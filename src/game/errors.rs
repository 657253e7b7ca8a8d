//! Settlement engine error types.

use crate::oracle::OracleError;
use crate::pool::PoolError;
use crate::referral::ReferralError;
use crate::types::{Amount, RequestId};
use thiserror::Error;

/// Settlement engine errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// No game exists under this request id
    #[error("Game {0} not found")]
    GameNotFound(RequestId),

    /// Result was already set for this game
    #[error("Game {0} is already resolved")]
    AlreadyResolved(RequestId),

    /// Game has no result yet
    #[error("Game {0} is not resolved yet")]
    NotResolved(RequestId),

    /// Winnings were already claimed
    #[error("Game {0} was already claimed")]
    AlreadyClaimed(RequestId),

    /// Claim on a game with nothing to pay
    #[error("Nothing to claim for game {0}")]
    NothingToClaim(RequestId),

    /// Wager payment must be positive and cover the oracle fee
    #[error("Payment {payment} does not cover the oracle fee {oracle_fee}")]
    PaymentTooSmall { payment: Amount, oracle_fee: Amount },

    /// Poker stake cannot exceed the payment
    #[error("Poker stake {stake} exceeds payment {payment}")]
    StakeExceedsPayment { stake: Amount, payment: Amount },

    /// Payment exceeds the configured maximum bet
    #[error("Payment {payment} exceeds the maximum bet {max_bet}")]
    BetTooLarge { payment: Amount, max_bet: Amount },

    /// A full deal is required
    #[error("Expected {expected} cards, got {got}")]
    WrongCardCount { expected: usize, got: usize },

    /// Caller is not the engine owner
    #[error("Caller is not the engine owner")]
    NotOwner,

    /// A configured rate is out of range
    #[error("Rate {0} is out of range")]
    InvalidRate(u64),

    /// Win amount arithmetic overflowed
    #[error("Win amount overflow")]
    WinOverflow,

    /// Liquidity pool rejected the operation
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Randomness coordinator rejected the operation
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Referral ledger rejected the operation
    #[error(transparent)]
    Referral(#[from] ReferralError),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
