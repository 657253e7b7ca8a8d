//! Referral ledger data models.

use serde::{Deserialize, Serialize};

use crate::config::BONUS_PERCENT_DENOMINATOR;
use crate::referral::errors::{ReferralError, ReferralResult};
use crate::types::{AccountId, Amount};

/// Step function mapping cumulative winnings to a bonus percent.
///
/// Thresholds start at zero and strictly increase; percents are parallel,
/// non-decreasing and at most 100. A referrer earns the percent of the
/// highest threshold strictly below their cumulative winnings, and zero
/// percent before anything has accrued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneTable {
    thresholds: Vec<Amount>,
    percents: Vec<u64>,
}

impl MilestoneTable {
    /// Build a validated table.
    pub fn new(thresholds: Vec<Amount>, percents: Vec<u64>) -> ReferralResult<Self> {
        if thresholds.len() != percents.len() {
            return Err(ReferralError::MilestoneLengthMismatch {
                thresholds: thresholds.len(),
                percents: percents.len(),
            });
        }
        if thresholds.is_empty() {
            return Err(ReferralError::EmptyMilestones);
        }
        if thresholds[0] != 0 || thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ReferralError::UnsortedMilestones);
        }
        for window in percents.windows(2) {
            if window[0] > window[1] {
                return Err(ReferralError::InvalidPercent(window[1]));
            }
        }
        if let Some(&last) = percents.last()
            && last > BONUS_PERCENT_DENOMINATOR
        {
            return Err(ReferralError::InvalidPercent(last));
        }
        Ok(Self {
            thresholds,
            percents,
        })
    }

    /// Bonus percent earned at the given cumulative winnings. Zero while
    /// no threshold has been crossed.
    pub fn tier_percent(&self, cumulative_winnings: Amount) -> u64 {
        let tier = self
            .thresholds
            .partition_point(|&t| t < cumulative_winnings);
        if tier == 0 { 0 } else { self.percents[tier - 1] }
    }

    pub fn thresholds(&self) -> &[Amount] {
        &self.thresholds
    }

    pub fn percents(&self) -> &[u64] {
        &self.percents
    }
}

/// Per-player referral bookkeeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferralAccount {
    /// The referrer bound to this player, if any. Set once.
    pub referrer: Option<AccountId>,
    /// Total winnings of this account's referees across settled games.
    /// Drives the milestone tier.
    pub cumulative_winnings: Amount,
    /// Referral bonus accumulated by this account as a referrer.
    pub bonus_balance: Amount,
    /// Number of players this account has referred.
    pub referrals: u64,
}

/// Read-only snapshot of a player's referral state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralStats {
    pub referrer: Option<AccountId>,
    pub cumulative_winnings: Amount,
    pub bonus_balance: Amount,
    pub referrals: u64,
    /// Bonus percent this account currently earns as a referrer.
    pub bonus_percent: u64,
}
