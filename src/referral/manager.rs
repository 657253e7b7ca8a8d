//! Referral ledger operations.

use std::collections::HashMap;

use log::{debug, info};

use crate::config::BONUS_PERCENT_DENOMINATOR;
use crate::pool::{LiquidityPool, PoolError};
use crate::referral::errors::{ReferralError, ReferralResult};
use crate::referral::models::{MilestoneTable, ReferralAccount, ReferralStats};
use crate::types::{AccountId, Amount};

/// Tracks referrer bindings, cumulative winnings and accrued bonuses.
///
/// The ledger never holds currency itself; bonus balances are claims
/// against the liquidity pool, settled on withdrawal.
#[derive(Debug)]
pub struct ReferralLedger {
    owner: AccountId,
    milestones: MilestoneTable,
    accounts: HashMap<AccountId, ReferralAccount>,
}

impl ReferralLedger {
    pub fn new(owner: AccountId, milestones: MilestoneTable) -> Self {
        Self {
            owner,
            milestones,
            accounts: HashMap::new(),
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn milestones(&self) -> &MilestoneTable {
        &self.milestones
    }

    /// Bind `referrer` to `player`. A player can be referred once, never by
    /// themselves, and never by the null address.
    pub fn add_ref(&mut self, player: &AccountId, referrer: AccountId) -> ReferralResult<()> {
        if referrer.is_zero() {
            return Err(ReferralError::InvalidReferrer);
        }
        if &referrer == player {
            return Err(ReferralError::SelfReferral);
        }
        let account = self.accounts.entry(player.clone()).or_default();
        if account.referrer.is_some() {
            return Err(ReferralError::AlreadyReferred(player.to_string()));
        }
        account.referrer = Some(referrer.clone());

        let referrer_account = self.accounts.entry(referrer.clone()).or_default();
        referrer_account.referrals += 1;

        info!("Player {player} referred by {referrer}");
        Ok(())
    }

    /// Record a settled game for `player`. The win amount feeds the
    /// referrer's cumulative winnings, and the referrer is then credited
    /// their milestone percent of the referral share, at the tier the
    /// accrual lands them on. A no-op for unreferred players. Returns the
    /// bonus credited.
    pub fn on_settlement(
        &mut self,
        player: &AccountId,
        win_amount: Amount,
        referral_amount: Amount,
    ) -> Amount {
        let Some(referrer) = self
            .accounts
            .get(player)
            .and_then(|a| a.referrer.clone())
        else {
            return 0;
        };
        let referrer_account = self.accounts.entry(referrer.clone()).or_default();
        referrer_account.cumulative_winnings = referrer_account
            .cumulative_winnings
            .saturating_add(win_amount);
        let percent = self
            .milestones
            .tier_percent(referrer_account.cumulative_winnings);
        let bonus = (referral_amount as u128 * percent as u128
            / BONUS_PERCENT_DENOMINATOR as u128) as Amount;
        referrer_account.bonus_balance = referrer_account.bonus_balance.saturating_add(bonus);

        debug!("Referral bonus of {bonus} ({percent}%) credited to {referrer} for {player}");
        bonus
    }

    /// Pay out the caller's accrued bonus from the pool, pull-style. The
    /// bonus is zeroed only after the pool debit succeeds; `game` is the
    /// whitelisted address the debit is performed under. Returns the amount
    /// paid, zero when nothing has accrued.
    pub fn withdraw_bonus(
        &mut self,
        caller: &AccountId,
        pool: &mut LiquidityPool,
        game: &AccountId,
    ) -> Result<Amount, PoolError> {
        let bonus = self
            .accounts
            .get(caller)
            .map(|a| a.bonus_balance)
            .unwrap_or(0);
        if bonus == 0 {
            return Ok(0);
        }
        pool.debit_for_payout(game, bonus)?;
        if let Some(account) = self.accounts.get_mut(caller) {
            account.bonus_balance = 0;
        }
        info!("Referral bonus of {bonus} withdrawn by {caller}");
        Ok(bonus)
    }

    /// Replace the milestone table. Owner only; the table is validated
    /// before it takes effect.
    pub fn set_milestones(
        &mut self,
        caller: &AccountId,
        thresholds: Vec<Amount>,
        percents: Vec<u64>,
    ) -> ReferralResult<()> {
        if caller != &self.owner {
            return Err(ReferralError::NotOwner);
        }
        self.milestones = MilestoneTable::new(thresholds, percents)?;
        info!("Referral milestone table replaced");
        Ok(())
    }

    /// Snapshot of a player's referral state.
    pub fn get_referral_stats(&self, player: &AccountId) -> ReferralStats {
        let account = self.accounts.get(player).cloned().unwrap_or_default();
        let bonus_percent = self.milestones.tier_percent(account.cumulative_winnings);
        ReferralStats {
            referrer: account.referrer,
            cumulative_winnings: account.cumulative_winnings,
            bonus_balance: account.bonus_balance,
            referrals: account.referrals,
            bonus_percent,
        }
    }
}
