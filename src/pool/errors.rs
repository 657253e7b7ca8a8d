//! Liquidity pool error types.

use crate::types::Amount;
use thiserror::Error;

/// Liquidity pool errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// Caller is not the pool owner
    #[error("Caller is not the pool owner")]
    NotOwner,

    /// Caller is not the fee operator
    #[error("Caller is not the fee operator")]
    NotOperator,

    /// Caller is not the bound game
    #[error("Caller is not the bound game")]
    NotGame,

    /// Depositor is not on the whitelist
    #[error("Address {0} is not whitelisted")]
    NotWhitelisted(String),

    /// Address is already on the whitelist
    #[error("Address {0} is already whitelisted")]
    AlreadyWhitelisted(String),

    /// Provider tried to burn more shares than they hold
    #[error("Insufficient share balance: available {available}, required {required}")]
    InsufficientBalance { available: Amount, required: Amount },

    /// Payout exceeds the pool balance
    #[error("Not enough funds in pool: available {available}, required {required}")]
    NotEnoughFundsInPool { available: Amount, required: Amount },

    /// Amount is zero or inconsistent with the pool's ledgers
    #[error("Amount must be positive")]
    InvalidAmount,

    /// A ledger balance would overflow
    #[error("Balance overflow")]
    BalanceOverflow,

    /// Address is the null address
    #[error("Invalid address")]
    InvalidAddress,
}

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
