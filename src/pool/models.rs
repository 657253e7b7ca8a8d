//! Liquidity pool data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Amount;

/// A liquidity provider's share account. Shares are pegged 1:1 to the
/// deposited currency, so the share balance is also the redeemable amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareAccount {
    /// Outstanding shares held by the provider.
    pub shares: Amount,
    /// When the account was first funded.
    pub created_at: DateTime<Utc>,
    /// Last deposit or withdrawal.
    pub updated_at: DateTime<Utc>,
}

impl ShareAccount {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            shares: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for ShareAccount {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the pool's aggregate ledgers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    /// Identifier of the pool share token.
    pub share_token_id: String,
    /// Currency backing payouts and withdrawals. Excludes collected fees.
    pub pool_balance: Amount,
    /// Slice of the pool balance earmarked for the progressive jackpot.
    pub jackpot_balance: Amount,
    /// Policy cap on a single jackpot payout.
    pub jackpot_limit: Amount,
    /// Flat fee earmarked out of every settled payment.
    pub oracle_gas_fee: Amount,
    /// Fees accumulated for the operator, held outside the pool balance.
    pub collected_fees: Amount,
    /// Total shares outstanding across all providers.
    pub total_shares: Amount,
}
