//! Liquidity pool ledger operations.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use log::{debug, info};

use crate::pool::errors::{PoolError, PoolResult};
use crate::pool::models::{PoolInfo, ShareAccount};
use crate::types::{AccountId, Amount};

/// The shared liquidity pool.
///
/// `pool_balance` is the currency backing payouts and withdrawals;
/// `jackpot_balance` is an earmarked slice of it. The oracle fee taken
/// from every settled payment accumulates in `collected_fees`, outside
/// the pool balance, until the operator drains it.
///
/// Deposits are restricted to whitelisted providers. Settlement credits
/// and payout debits are restricted to the single bound game address,
/// fee collection to the operator, administration to the owner. Every
/// operation validates fully before touching any ledger, so a failed
/// call leaves the pool unchanged.
#[derive(Debug)]
pub struct LiquidityPool {
    owner: AccountId,
    operator: AccountId,
    game: Option<AccountId>,
    share_token_id: String,
    whitelist: HashSet<AccountId>,
    accounts: HashMap<AccountId, ShareAccount>,
    pool_balance: Amount,
    jackpot_balance: Amount,
    jackpot_limit: Amount,
    oracle_gas_fee: Amount,
    collected_fees: Amount,
    total_shares: Amount,
}

impl LiquidityPool {
    /// Create an empty pool. The deployer becomes owner and initial fee
    /// operator, and is whitelisted as a provider.
    pub fn new(
        owner: AccountId,
        share_token_id: String,
        oracle_gas_fee: Amount,
        jackpot_limit: Amount,
    ) -> Self {
        let mut whitelist = HashSet::new();
        whitelist.insert(owner.clone());
        Self {
            operator: owner.clone(),
            owner,
            game: None,
            share_token_id,
            whitelist,
            accounts: HashMap::new(),
            pool_balance: 0,
            jackpot_balance: 0,
            jackpot_limit,
            oracle_gas_fee,
            collected_fees: 0,
            total_shares: 0,
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn operator(&self) -> &AccountId {
        &self.operator
    }

    pub fn game(&self) -> Option<&AccountId> {
        self.game.as_ref()
    }

    /// Currency backing payouts and withdrawals. Excludes collected fees.
    pub fn pool_balance(&self) -> Amount {
        self.pool_balance
    }

    /// Currency earmarked for the progressive jackpot.
    pub fn jackpot_balance(&self) -> Amount {
        self.jackpot_balance
    }

    /// Jackpot earmark actually backed by the pool balance.
    pub fn available_jackpot(&self) -> Amount {
        self.jackpot_balance.min(self.pool_balance)
    }

    pub fn jackpot_limit(&self) -> Amount {
        self.jackpot_limit
    }

    pub fn oracle_gas_fee(&self) -> Amount {
        self.oracle_gas_fee
    }

    /// Accumulated oracle fees awaiting collection.
    pub fn collected_fees(&self) -> Amount {
        self.collected_fees
    }

    /// Total shares outstanding.
    pub fn total_shares(&self) -> Amount {
        self.total_shares
    }

    /// Share balance of a provider; zero for unknown accounts.
    pub fn shares_of(&self, provider: &AccountId) -> Amount {
        self.accounts.get(provider).map(|a| a.shares).unwrap_or(0)
    }

    pub fn is_whitelisted(&self, address: &AccountId) -> bool {
        self.whitelist.contains(address)
    }

    /// Aggregate snapshot of the pool ledgers.
    pub fn get_pool_info(&self) -> PoolInfo {
        PoolInfo {
            share_token_id: self.share_token_id.clone(),
            pool_balance: self.pool_balance,
            jackpot_balance: self.jackpot_balance,
            jackpot_limit: self.jackpot_limit,
            oracle_gas_fee: self.oracle_gas_fee,
            collected_fees: self.collected_fees,
            total_shares: self.total_shares,
        }
    }

    fn require_owner(&self, caller: &AccountId) -> PoolResult<()> {
        if caller != &self.owner {
            return Err(PoolError::NotOwner);
        }
        Ok(())
    }

    fn require_game(&self, caller: &AccountId) -> PoolResult<()> {
        match &self.game {
            Some(game) if caller == game => Ok(()),
            _ => Err(PoolError::NotGame),
        }
    }

    // ---- administration --------------------------------------------------

    /// Replace the fee operator. Owner only; the null address is rejected.
    pub fn set_operator(&mut self, caller: &AccountId, operator: AccountId) -> PoolResult<()> {
        self.require_owner(caller)?;
        if operator.is_zero() {
            return Err(PoolError::InvalidAddress);
        }
        info!("Pool operator changed to {operator}");
        self.operator = operator;
        Ok(())
    }

    /// Bind the game address allowed to move settlement money. Owner only.
    pub fn set_game(&mut self, caller: &AccountId, game: AccountId) -> PoolResult<()> {
        self.require_owner(caller)?;
        if game.is_zero() {
            return Err(PoolError::InvalidAddress);
        }
        info!("Pool game bound to {game}");
        self.game = Some(game);
        Ok(())
    }

    /// Whitelist a provider. Owner only; re-adding an address fails.
    pub fn add_to_whitelist(&mut self, caller: &AccountId, address: AccountId) -> PoolResult<()> {
        self.require_owner(caller)?;
        if address.is_zero() {
            return Err(PoolError::InvalidAddress);
        }
        if !self.whitelist.insert(address.clone()) {
            return Err(PoolError::AlreadyWhitelisted(address.to_string()));
        }
        info!("Provider {address} whitelisted");
        Ok(())
    }

    /// Drop a provider from the whitelist. Owner only. Removing an address
    /// that was never whitelisted is a no-op.
    pub fn remove_from_whitelist(
        &mut self,
        caller: &AccountId,
        address: &AccountId,
    ) -> PoolResult<()> {
        self.require_owner(caller)?;
        if self.whitelist.remove(address) {
            info!("Provider {address} removed from whitelist");
        }
        Ok(())
    }

    /// Directly set the jackpot earmark. Owner only; the earmark cannot
    /// exceed the pool balance.
    pub fn set_jackpot(&mut self, caller: &AccountId, amount: Amount) -> PoolResult<()> {
        self.require_owner(caller)?;
        if amount > self.pool_balance {
            return Err(PoolError::InvalidAmount);
        }
        info!("Jackpot earmark set to {amount}");
        self.jackpot_balance = amount;
        Ok(())
    }

    pub fn set_jackpot_limit(&mut self, caller: &AccountId, limit: Amount) -> PoolResult<()> {
        self.require_owner(caller)?;
        if limit == 0 {
            return Err(PoolError::InvalidAmount);
        }
        info!("Jackpot limit set to {limit}");
        self.jackpot_limit = limit;
        Ok(())
    }

    pub fn set_oracle_gas_fee(&mut self, caller: &AccountId, fee: Amount) -> PoolResult<()> {
        self.require_owner(caller)?;
        info!("Oracle gas fee set to {fee}");
        self.oracle_gas_fee = fee;
        Ok(())
    }

    // ---- provider ledger -------------------------------------------------

    /// Deposit currency and mint shares 1:1. Whitelisted providers only.
    /// Returns the provider's new share balance.
    pub fn deposit(&mut self, provider: &AccountId, amount: Amount) -> PoolResult<Amount> {
        if amount == 0 {
            return Err(PoolError::InvalidAmount);
        }
        if !self.whitelist.contains(provider) {
            return Err(PoolError::NotWhitelisted(provider.to_string()));
        }
        let pool_balance = self
            .pool_balance
            .checked_add(amount)
            .ok_or(PoolError::BalanceOverflow)?;
        let total_shares = self
            .total_shares
            .checked_add(amount)
            .ok_or(PoolError::BalanceOverflow)?;

        let account = self.accounts.entry(provider.clone()).or_default();
        account.shares = account
            .shares
            .checked_add(amount)
            .ok_or(PoolError::BalanceOverflow)?;
        account.updated_at = Utc::now();
        self.pool_balance = pool_balance;
        self.total_shares = total_shares;

        debug!("Deposit of {amount} by {provider}, pool balance {pool_balance}");
        Ok(self.shares_of(provider))
    }

    /// Burn shares and release the matching currency back to the provider.
    /// Returns the amount released.
    pub fn withdraw(&mut self, provider: &AccountId, amount: Amount) -> PoolResult<Amount> {
        if amount == 0 {
            return Err(PoolError::InvalidAmount);
        }
        let shares = self.shares_of(provider);
        if shares < amount {
            return Err(PoolError::InsufficientBalance {
                available: shares,
                required: amount,
            });
        }
        if self.pool_balance < amount {
            return Err(PoolError::NotEnoughFundsInPool {
                available: self.pool_balance,
                required: amount,
            });
        }

        if let Some(account) = self.accounts.get_mut(provider) {
            account.shares -= amount;
            account.updated_at = Utc::now();
        }
        self.total_shares -= amount;
        self.pool_balance -= amount;

        debug!(
            "Withdrawal of {amount} by {provider}, pool balance {}",
            self.pool_balance
        );
        Ok(amount)
    }

    // ---- settlement ledger -----------------------------------------------

    /// Absorb a settled wager payment. The oracle fee is earmarked out of
    /// the payment into the fee accumulator and the jackpot contribution
    /// into the jackpot slice; the rest of the payment joins the pool
    /// balance. Bound game only.
    pub fn credit_from_settlement(
        &mut self,
        caller: &AccountId,
        payment: Amount,
        jackpot_contribution: Amount,
    ) -> PoolResult<()> {
        self.require_game(caller)?;
        let fee = self.oracle_gas_fee;
        let earmarks = jackpot_contribution
            .checked_add(fee)
            .ok_or(PoolError::BalanceOverflow)?;
        if payment < earmarks {
            return Err(PoolError::InvalidAmount);
        }
        let pool_balance = self
            .pool_balance
            .checked_add(payment - fee)
            .ok_or(PoolError::BalanceOverflow)?;
        let jackpot_balance = self
            .jackpot_balance
            .checked_add(jackpot_contribution)
            .ok_or(PoolError::BalanceOverflow)?;
        let collected_fees = self
            .collected_fees
            .checked_add(fee)
            .ok_or(PoolError::BalanceOverflow)?;

        self.pool_balance = pool_balance;
        self.jackpot_balance = jackpot_balance;
        self.collected_fees = collected_fees;

        debug!(
            "Settlement credit: payment {payment}, jackpot +{jackpot_contribution}, fee +{fee}"
        );
        Ok(())
    }

    /// Pay a regular win out of the pool. Bound game only; the pool must
    /// hold the full amount.
    pub fn debit_for_payout(&mut self, caller: &AccountId, amount: Amount) -> PoolResult<()> {
        self.require_game(caller)?;
        if amount > self.pool_balance {
            return Err(PoolError::NotEnoughFundsInPool {
                available: self.pool_balance,
                required: amount,
            });
        }
        self.pool_balance -= amount;
        debug!("Payout of {amount}, pool balance {}", self.pool_balance);
        Ok(())
    }

    /// Pay a jackpot win, clamped to the configured limit. A win the pool
    /// balance cannot cover is rejected before clamping; a win above the
    /// limit is clamped and succeeds. A successful payout releases the
    /// whole jackpot earmark. Bound game only. Returns the amount paid.
    pub fn payout_jackpot(&mut self, caller: &AccountId, amount: Amount) -> PoolResult<Amount> {
        self.require_game(caller)?;
        if amount > self.pool_balance {
            return Err(PoolError::NotEnoughFundsInPool {
                available: self.pool_balance,
                required: amount,
            });
        }
        let win = amount.min(self.jackpot_limit);
        self.pool_balance -= win;
        self.jackpot_balance = 0;
        info!("Jackpot payout of {win}");
        Ok(win)
    }

    /// Drain the accumulated oracle fees to the operator. Operator only.
    /// Returns the amount drained; zero when nothing has accumulated.
    pub fn take_oracle_fee(&mut self, caller: &AccountId) -> PoolResult<Amount> {
        if caller != &self.operator {
            return Err(PoolError::NotOperator);
        }
        let fees = self.collected_fees;
        self.collected_fees = 0;
        if fees > 0 {
            info!("Oracle fees of {fees} collected");
        }
        Ok(fees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEE: Amount = 3_000_000;
    const LIMIT: Amount = 500_000_000_000;

    fn pool() -> (LiquidityPool, AccountId, AccountId) {
        let owner = AccountId::new("owner");
        let game = AccountId::new("game");
        let mut pool = LiquidityPool::new(owner.clone(), "XPKR".to_string(), FEE, LIMIT);
        pool.set_game(&owner, game.clone()).unwrap();
        (pool, owner, game)
    }

    fn whitelisted(pool: &mut LiquidityPool, owner: &AccountId, name: &str) -> AccountId {
        let address = AccountId::new(name);
        pool.add_to_whitelist(owner, address.clone()).unwrap();
        address
    }

    #[test]
    fn deposit_requires_whitelisting_and_mints_one_to_one() {
        let (mut pool, owner, _) = pool();
        let outsider = AccountId::new("outsider");
        assert_eq!(
            pool.deposit(&outsider, 1_000),
            Err(PoolError::NotWhitelisted("outsider".to_string()))
        );

        let alice = whitelisted(&mut pool, &owner, "alice");
        assert_eq!(pool.deposit(&alice, 1_000_000_000).unwrap(), 1_000_000_000);
        assert_eq!(pool.deposit(&alice, 500).unwrap(), 1_000_000_500);
        assert_eq!(pool.pool_balance(), 1_000_000_500);
        assert_eq!(pool.total_shares(), 1_000_000_500);
    }

    #[test]
    fn zero_deposit_is_rejected() {
        let (mut pool, owner, _) = pool();
        let alice = whitelisted(&mut pool, &owner, "alice");
        assert_eq!(pool.deposit(&alice, 0), Err(PoolError::InvalidAmount));
    }

    #[test]
    fn withdraw_burns_shares_and_releases_currency() {
        let (mut pool, owner, _) = pool();
        let alice = whitelisted(&mut pool, &owner, "alice");
        pool.deposit(&alice, 1_000).unwrap();

        assert_eq!(pool.withdraw(&alice, 400).unwrap(), 400);
        assert_eq!(pool.shares_of(&alice), 600);
        assert_eq!(pool.pool_balance(), 600);
        assert_eq!(pool.total_shares(), 600);

        assert_eq!(
            pool.withdraw(&alice, 601),
            Err(PoolError::InsufficientBalance {
                available: 600,
                required: 601,
            })
        );
    }

    #[test]
    fn whitelist_add_is_strict_remove_is_not() {
        let (mut pool, owner, _) = pool();
        let alice = whitelisted(&mut pool, &owner, "alice");
        assert_eq!(
            pool.add_to_whitelist(&owner, alice.clone()),
            Err(PoolError::AlreadyWhitelisted("alice".to_string()))
        );

        pool.remove_from_whitelist(&owner, &alice).unwrap();
        assert!(!pool.is_whitelisted(&alice));
        // Removing again is fine.
        pool.remove_from_whitelist(&owner, &alice).unwrap();
    }

    #[test]
    fn owner_is_whitelisted_at_construction() {
        let (pool, owner, _) = pool();
        assert!(pool.is_whitelisted(&owner));
    }

    #[test]
    fn settlement_credit_earmarks_fee_and_jackpot() {
        let (mut pool, _, game) = pool();

        pool.credit_from_settlement(&game, 10_000_000_000, 80_000)
            .unwrap();
        assert_eq!(pool.pool_balance(), 9_997_000_000);
        assert_eq!(pool.jackpot_balance(), 80_000);
        assert_eq!(pool.collected_fees(), FEE);

        let stranger = AccountId::new("stranger");
        assert_eq!(
            pool.credit_from_settlement(&stranger, 100_000_000, 0),
            Err(PoolError::NotGame)
        );
    }

    #[test]
    fn settlement_credit_must_cover_the_earmarks() {
        let (mut pool, _, game) = pool();
        assert_eq!(
            pool.credit_from_settlement(&game, FEE - 1, 0),
            Err(PoolError::InvalidAmount)
        );
    }

    #[test]
    fn payout_respects_pool_balance() {
        let (mut pool, owner, game) = pool();
        let alice = whitelisted(&mut pool, &owner, "alice");
        pool.deposit(&alice, 1_000).unwrap();

        pool.debit_for_payout(&game, 400).unwrap();
        assert_eq!(pool.pool_balance(), 600);
        assert_eq!(
            pool.debit_for_payout(&game, 601),
            Err(PoolError::NotEnoughFundsInPool {
                available: 600,
                required: 601,
            })
        );
    }

    #[test]
    fn jackpot_payout_is_clamped_and_zeroes_the_earmark() {
        let (mut pool, owner, game) = pool();
        pool.set_jackpot_limit(&owner, 3_000).unwrap();
        let alice = whitelisted(&mut pool, &owner, "alice");
        pool.deposit(&alice, 10_000).unwrap();
        pool.credit_from_settlement(&game, 5_000 + FEE, 5_000).unwrap();

        let paid = pool.payout_jackpot(&game, 5_000).unwrap();
        assert_eq!(paid, 3_000);
        assert_eq!(pool.jackpot_balance(), 0);
        assert_eq!(pool.pool_balance(), 12_000);
    }

    #[test]
    fn jackpot_payout_fails_when_pool_cannot_cover_it() {
        let (mut pool, _, game) = pool();
        pool.credit_from_settlement(&game, 500 + FEE, 500).unwrap();
        pool.debit_for_payout(&game, 300).unwrap();

        assert_eq!(
            pool.payout_jackpot(&game, 500),
            Err(PoolError::NotEnoughFundsInPool {
                available: 200,
                required: 500,
            })
        );
        // Failed payout leaves the earmark untouched.
        assert_eq!(pool.jackpot_balance(), 500);
    }

    #[test]
    fn jackpot_coverage_is_checked_before_the_clamp() {
        let (mut pool, owner, game) = pool();
        pool.set_jackpot_limit(&owner, 100).unwrap();
        pool.credit_from_settlement(&game, 200 + FEE, 0).unwrap();

        // The clamped payout of 100 would fit, but the win itself does not.
        assert_eq!(
            pool.payout_jackpot(&game, 500),
            Err(PoolError::NotEnoughFundsInPool {
                available: 200,
                required: 500,
            })
        );
    }

    #[test]
    fn fee_collection_is_operator_only_and_leaves_the_pool_alone() {
        let (mut pool, owner, game) = pool();
        let operator = AccountId::new("operator");
        pool.set_operator(&owner, operator.clone()).unwrap();
        pool.credit_from_settlement(&game, 10_000_000, 0).unwrap();

        let pool_before = pool.pool_balance();
        assert_eq!(pool.take_oracle_fee(&game), Err(PoolError::NotOperator));
        assert_eq!(pool.take_oracle_fee(&operator).unwrap(), FEE);
        assert_eq!(pool.collected_fees(), 0);
        assert_eq!(pool.pool_balance(), pool_before);
        // Nothing left to drain.
        assert_eq!(pool.take_oracle_fee(&operator).unwrap(), 0);
    }

    #[test]
    fn owner_can_seed_the_jackpot_within_the_pool_balance() {
        let (mut pool, owner, _) = pool();
        let alice = whitelisted(&mut pool, &owner, "alice");
        pool.deposit(&alice, 10_000).unwrap();

        assert_eq!(pool.set_jackpot(&owner, 10_001), Err(PoolError::InvalidAmount));
        pool.set_jackpot(&owner, 4_000).unwrap();
        assert_eq!(pool.jackpot_balance(), 4_000);
        assert_eq!(pool.available_jackpot(), 4_000);
    }
}
