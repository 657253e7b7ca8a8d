//! Referral ledger error types.

use thiserror::Error;

/// Referral ledger errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferralError {
    /// Caller is not the ledger owner
    #[error("Caller is not the referral ledger owner")]
    NotOwner,

    /// Player already has a referrer bound
    #[error("Player {0} already has a referrer")]
    AlreadyReferred(String),

    /// A player cannot refer themselves
    #[error("Self-referral is not allowed")]
    SelfReferral,

    /// Referrer address is the null address
    #[error("Invalid referrer address")]
    InvalidReferrer,

    /// Milestone thresholds and percents differ in length
    #[error("Milestone table length mismatch: {thresholds} thresholds, {percents} percents")]
    MilestoneLengthMismatch { thresholds: usize, percents: usize },

    /// Milestone table is empty
    #[error("Milestone table must not be empty")]
    EmptyMilestones,

    /// Milestone thresholds are not strictly increasing from zero
    #[error("Milestone thresholds must start at zero and strictly increase")]
    UnsortedMilestones,

    /// A bonus percent is out of range or breaks monotonicity
    #[error("Bonus percent {0} is invalid")]
    InvalidPercent(u64),
}

/// Result type for referral operations
pub type ReferralResult<T> = Result<T, ReferralError>;
