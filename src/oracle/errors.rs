//! Randomness coordinator error types.

use crate::types::RequestId;
use thiserror::Error;

/// Randomness coordinator errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    /// Caller is not the coordinator owner
    #[error("Caller is not the oracle owner")]
    NotOwner,

    /// Caller is not the configured operator
    #[error("Caller is not the oracle operator")]
    NotOperator,

    /// Caller is not the bound consumer
    #[error("Caller is not the bound consumer")]
    NotConsumer,

    /// Fulfillment named a consumer other than the bound one
    #[error("Consumer mismatch: {0} is not the bound consumer")]
    ConsumerMismatch(String),

    /// Request id is not in the pending set
    #[error("Request {0} is not pending")]
    RequestNotPending(RequestId),

    /// Operator address is the null address
    #[error("Invalid operator address")]
    InvalidOperator,

    /// No consumer has been bound yet
    #[error("No consumer bound")]
    NoConsumer,
}

/// Result type for coordinator operations
pub type OracleResult<T> = Result<T, OracleError>;
