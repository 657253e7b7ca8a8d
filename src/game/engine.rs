//! Settlement engine orchestration.

use std::collections::HashMap;

use chrono::Utc;
use log::{debug, info};

use crate::config::{EngineConfig, PERMILLE};
use crate::game::errors::{EngineError, EngineResult};
use crate::game::evaluators::{ColorEvaluator, HandEvaluator};
use crate::game::models::{ColorChoice, GameRequest, GameStatus, PokerOutcome};
use crate::oracle::{RandomnessCoordinator, pack_cards};
use crate::pool::{LiquidityPool, PoolError, PoolInfo};
use crate::referral::{MilestoneTable, ReferralLedger, ReferralStats};
use crate::types::{AccountId, Amount, CARDS_PER_GAME, Card, RequestId};

fn permille_of(amount: Amount, rate: u64) -> Amount {
    (amount as u128 * rate as u128 / PERMILLE as u128) as Amount
}

/// Orchestrates wagers against the liquidity pool, the randomness
/// coordinator and the referral ledger.
///
/// The engine acts under its own account: it is bound as the pool's game
/// and as the coordinator's consumer at construction, and every pool
/// credit or debit it performs is made under that address. All money
/// paths are pull-style: winnings sit in the pool until the player
/// claims them, and each game pays out at most once.
pub struct SettlementEngine {
    owner: AccountId,
    address: AccountId,
    config: EngineConfig,
    pool: LiquidityPool,
    oracle: RandomnessCoordinator,
    referrals: ReferralLedger,
    hand_evaluator: Box<dyn HandEvaluator>,
    color_evaluator: Box<dyn ColorEvaluator>,
    games: HashMap<RequestId, GameRequest>,
    last_request_id: Option<RequestId>,
}

impl SettlementEngine {
    /// Wire up a fresh engine and its three ledgers. `address` is the
    /// engine's own account, distinct from the owner's.
    pub fn new(
        owner: AccountId,
        address: AccountId,
        config: EngineConfig,
        hand_evaluator: Box<dyn HandEvaluator>,
        color_evaluator: Box<dyn ColorEvaluator>,
    ) -> EngineResult<Self> {
        let milestones = MilestoneTable::new(
            config.winnings_milestones.clone(),
            config.bonus_percent_milestones.clone(),
        )?;
        let mut pool = LiquidityPool::new(
            owner.clone(),
            config.share_token_id.clone(),
            config.oracle_gas_fee,
            config.jackpot_limit,
        );
        let mut oracle = RandomnessCoordinator::new(owner.clone());
        pool.set_game(&owner, address.clone())?;
        oracle.set_consumer(&owner, address.clone())?;
        let referrals = ReferralLedger::new(owner.clone(), milestones);

        info!("Settlement engine deployed at {address}, owned by {owner}");
        Ok(Self {
            owner,
            address,
            config,
            pool,
            oracle,
            referrals,
            hand_evaluator,
            color_evaluator,
            games: HashMap::new(),
            last_request_id: None,
        })
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn address(&self) -> &AccountId {
        &self.address
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pool(&self) -> &LiquidityPool {
        &self.pool
    }

    pub fn oracle(&self) -> &RandomnessCoordinator {
        &self.oracle
    }

    pub fn referrals(&self) -> &ReferralLedger {
        &self.referrals
    }

    pub fn get_game(&self, request_id: RequestId) -> Option<&GameRequest> {
        self.games.get(&request_id)
    }

    /// Id of the most recently placed wager.
    pub fn get_last_request_id(&self) -> Option<RequestId> {
        self.last_request_id
    }

    fn require_owner(&self, caller: &AccountId) -> EngineResult<()> {
        if caller != &self.owner {
            return Err(EngineError::NotOwner);
        }
        Ok(())
    }

    /// Referral share of a payment, independent of the game's outcome.
    fn referral_share(&self, payment: Amount) -> Amount {
        permille_of(payment, self.config.house_edge)
    }

    /// Fixed winnings for an outcome, excluding any jackpot component.
    fn fixed_win(
        &self,
        game: &GameRequest,
        outcome: PokerOutcome,
        color_won: bool,
    ) -> EngineResult<Amount> {
        let payout_rate = self.config.payout_multiplier * PERMILLE;
        let poker = match outcome {
            PokerOutcome::Win => permille_of(
                game.poker_stake,
                payout_rate - self.config.house_edge - self.config.jackpot_fee_multiplier,
            ),
            PokerOutcome::Draw => game.poker_stake,
            PokerOutcome::Lose | PokerOutcome::JackpotWin => 0,
        };
        let color = if color_won {
            permille_of(game.color_stake, payout_rate - self.config.house_edge)
        } else {
            0
        };
        poker.checked_add(color).ok_or(EngineError::WinOverflow)
    }

    // ---- wager lifecycle -------------------------------------------------

    /// Take a wager. The payment is credited to the pool with the oracle
    /// fee and the jackpot contribution earmarked out of it, a randomness
    /// request is opened, and the returned id identifies the game from
    /// here on. `poker_stake` rides on the poker hand; the remainder of
    /// the payment rides on the color side bet.
    pub fn place_wager(
        &mut self,
        player: &AccountId,
        payment: Amount,
        poker_stake: Amount,
        color_choice: ColorChoice,
    ) -> EngineResult<RequestId> {
        if player.is_zero() {
            return Err(EngineError::Pool(PoolError::InvalidAddress));
        }
        let oracle_fee = self.pool.oracle_gas_fee();
        if payment <= oracle_fee {
            return Err(EngineError::PaymentTooSmall {
                payment,
                oracle_fee,
            });
        }
        if payment > self.config.max_bet {
            return Err(EngineError::BetTooLarge {
                payment,
                max_bet: self.config.max_bet,
            });
        }
        if poker_stake > payment {
            return Err(EngineError::StakeExceedsPayment {
                stake: poker_stake,
                payment,
            });
        }

        let jackpot_contribution = permille_of(poker_stake, self.config.jackpot_fee_multiplier);
        self.pool
            .credit_from_settlement(&self.address, payment, jackpot_contribution)?;
        let consumer = self.address.clone();
        let request_id = self.oracle.request_randomness(&consumer)?;

        let game = GameRequest::new(player.clone(), payment, poker_stake, color_choice);
        self.games.insert(request_id, game);
        self.last_request_id = Some(request_id);

        info!(
            "Wager {request_id} by {player}: payment {payment}, poker stake {poker_stake}, \
             jackpot contribution {jackpot_contribution}"
        );
        Ok(request_id)
    }

    /// Winnings a given pair of outcomes would pay for a game, at the
    /// current jackpot state. Pure and re-callable; a jackpot win reads
    /// the available jackpot clamped to the limit.
    pub fn calculate_win_amount(
        &self,
        request_id: RequestId,
        outcome: PokerOutcome,
        color_won: bool,
    ) -> EngineResult<Amount> {
        let game = self
            .games
            .get(&request_id)
            .ok_or(EngineError::GameNotFound(request_id))?;
        let jackpot = if outcome == PokerOutcome::JackpotWin {
            self.pool
                .available_jackpot()
                .min(self.pool.jackpot_limit())
        } else {
            0
        };
        self.fixed_win(game, outcome, color_won)?
            .checked_add(jackpot)
            .ok_or(EngineError::WinOverflow)
    }

    /// Deliver the dealt cards for a pending game and resolve it. Operator
    /// only; the randomness request is retired, so a second delivery for
    /// the same id fails. The deal is evaluated through the injected
    /// evaluators, the winnings are fixed, and the referral ledger is
    /// notified. Pending -> Resolved.
    pub fn fulfill_randomness(
        &mut self,
        caller: &AccountId,
        request_id: RequestId,
        cards: &[Card],
    ) -> EngineResult<()> {
        if cards.len() != CARDS_PER_GAME {
            return Err(EngineError::WrongCardCount {
                expected: CARDS_PER_GAME,
                got: cards.len(),
            });
        }
        match self.games.get(&request_id) {
            None => return Err(EngineError::GameNotFound(request_id)),
            Some(game) if game.status != GameStatus::Pending => {
                return Err(EngineError::AlreadyResolved(request_id));
            }
            Some(_) => {}
        }
        let consumer = self.address.clone();
        self.oracle.fulfill(caller, &consumer, request_id)?;

        let outcome = self.hand_evaluator.evaluate(cards);
        let (color_choice, payment) = {
            let game = &self.games[&request_id];
            (game.color_choice, game.payment)
        };
        let color_won = self.color_evaluator.evaluate(cards, color_choice);
        let total_win = self.fixed_win(&self.games[&request_id], outcome, color_won)?;
        let referral_amount = self.referral_share(payment);

        let player = if let Some(game) = self.games.get_mut(&request_id) {
            game.packed_cards = Some(pack_cards(cards));
            game.poker_outcome = Some(outcome);
            game.color_won = Some(color_won);
            game.is_jackpot = outcome == PokerOutcome::JackpotWin;
            game.total_win = Some(total_win);
            game.referral_amount = Some(referral_amount);
            game.status = GameStatus::Resolved;
            game.resolved_at = Some(Utc::now());
            game.player.clone()
        } else {
            return Err(EngineError::GameNotFound(request_id));
        };
        self.referrals
            .on_settlement(&player, total_win, referral_amount);

        debug!("Game {request_id} resolved from deal: {outcome:?}, win {total_win}");
        Ok(())
    }

    /// Resolve a pending game with operator-supplied amounts, bypassing
    /// the in-engine evaluators. The randomness request is retired here,
    /// so the operator answers each game through exactly one of this and
    /// [`fulfill_randomness`](Self::fulfill_randomness). `total_win` is
    /// the full amount the claim will pay; `is_jackpot` routes the claim
    /// through the jackpot payout, where it is clamped to the jackpot
    /// limit. Pending -> Resolved.
    pub fn set_game_result(
        &mut self,
        caller: &AccountId,
        request_id: RequestId,
        total_win: Amount,
        referral_amount: Amount,
        is_jackpot: bool,
        packed_cards: u64,
    ) -> EngineResult<()> {
        match self.games.get(&request_id) {
            None => return Err(EngineError::GameNotFound(request_id)),
            Some(game) if game.status == GameStatus::Claimed => {
                return Err(EngineError::AlreadyClaimed(request_id));
            }
            Some(game) if game.status == GameStatus::Resolved => {
                return Err(EngineError::AlreadyResolved(request_id));
            }
            Some(_) => {}
        }
        let consumer = self.address.clone();
        self.oracle.fulfill(caller, &consumer, request_id)?;

        let player = if let Some(game) = self.games.get_mut(&request_id) {
            game.packed_cards = Some(packed_cards);
            game.is_jackpot = is_jackpot;
            game.total_win = Some(total_win);
            game.referral_amount = Some(referral_amount);
            if is_jackpot {
                game.poker_outcome = Some(PokerOutcome::JackpotWin);
            }
            game.status = GameStatus::Resolved;
            game.resolved_at = Some(Utc::now());
            game.player.clone()
        } else {
            return Err(EngineError::GameNotFound(request_id));
        };
        self.referrals
            .on_settlement(&player, total_win, referral_amount);

        info!(
            "Game {request_id} resolved by operator: win {total_win}, \
             referral {referral_amount}, jackpot {is_jackpot}"
        );
        Ok(())
    }

    /// Pay out a resolved game to its player; anyone may trigger the
    /// claim, and each game pays exactly once. The stored win amount is
    /// paid as is; on jackpot games it is clamped to the jackpot limit
    /// and the whole jackpot earmark is released. A claim with nothing to
    /// pay is rejected, as is a win the pool balance cannot cover before
    /// clamping; a failed claim leaves the game claimable. Returns the
    /// amount paid.
    pub fn claim_win_amount(&mut self, request_id: RequestId) -> EngineResult<Amount> {
        let game = self
            .games
            .get(&request_id)
            .ok_or(EngineError::GameNotFound(request_id))?;
        match game.status {
            GameStatus::Pending => return Err(EngineError::NotResolved(request_id)),
            GameStatus::Claimed => return Err(EngineError::AlreadyClaimed(request_id)),
            GameStatus::Resolved => {}
        }
        let win = game.total_win.ok_or(EngineError::NotResolved(request_id))?;
        let is_jackpot = game.is_jackpot;
        let player = game.player.clone();

        if win == 0 {
            return Err(EngineError::NothingToClaim(request_id));
        }
        // Validate the full win before any ledger moves, so a shortfall
        // leaves the game claimable and the pool untouched.
        if win > self.pool.pool_balance() {
            return Err(EngineError::Pool(PoolError::NotEnoughFundsInPool {
                available: self.pool.pool_balance(),
                required: win,
            }));
        }

        // All checks passed: close the game, then move the money.
        if let Some(game) = self.games.get_mut(&request_id) {
            game.status = GameStatus::Claimed;
        }
        let engine = self.address.clone();
        let paid = if is_jackpot {
            self.pool.payout_jackpot(&engine, win)?
        } else {
            self.pool.debit_for_payout(&engine, win)?;
            win
        };

        info!("Game {request_id} claimed for {player}: paid {paid}");
        Ok(paid)
    }

    // ---- pool and referral facade ----------------------------------------

    /// Provide liquidity to the pool. Whitelisted providers only. Returns
    /// the provider's new share balance.
    pub fn deposit(&mut self, provider: &AccountId, amount: Amount) -> EngineResult<Amount> {
        Ok(self.pool.deposit(provider, amount)?)
    }

    /// Redeem pool shares for currency.
    pub fn withdraw(&mut self, provider: &AccountId, amount: Amount) -> EngineResult<Amount> {
        Ok(self.pool.withdraw(provider, amount)?)
    }

    /// Whitelist a liquidity provider. Owner only.
    pub fn add_to_whitelist(&mut self, caller: &AccountId, address: AccountId) -> EngineResult<()> {
        self.pool.add_to_whitelist(caller, address)?;
        Ok(())
    }

    /// Remove a liquidity provider from the whitelist. Owner only.
    pub fn remove_from_whitelist(
        &mut self,
        caller: &AccountId,
        address: &AccountId,
    ) -> EngineResult<()> {
        self.pool.remove_from_whitelist(caller, address)?;
        Ok(())
    }

    /// Bind a referrer to a player.
    pub fn add_ref(&mut self, player: &AccountId, referrer: AccountId) -> EngineResult<()> {
        self.referrals.add_ref(player, referrer)?;
        Ok(())
    }

    /// Pay out the caller's accrued referral bonus from the pool.
    pub fn withdraw_bonus(&mut self, caller: &AccountId) -> EngineResult<Amount> {
        let engine = self.address.clone();
        Ok(self
            .referrals
            .withdraw_bonus(caller, &mut self.pool, &engine)?)
    }

    /// Drain the accumulated oracle fees. Operator only.
    pub fn take_oracle_fee(&mut self, caller: &AccountId) -> EngineResult<Amount> {
        Ok(self.pool.take_oracle_fee(caller)?)
    }

    pub fn get_pool_info(&self) -> PoolInfo {
        self.pool.get_pool_info()
    }

    pub fn get_referral_stats(&self, player: &AccountId) -> ReferralStats {
        self.referrals.get_referral_stats(player)
    }

    // ---- administration --------------------------------------------------

    /// Replace the operator on both the coordinator and the pool.
    pub fn set_operator(&mut self, caller: &AccountId, operator: AccountId) -> EngineResult<()> {
        self.oracle.set_operator(caller, operator.clone())?;
        self.pool.set_operator(caller, operator)?;
        Ok(())
    }

    pub fn set_max_bet(&mut self, caller: &AccountId, max_bet: Amount) -> EngineResult<()> {
        self.require_owner(caller)?;
        if max_bet <= self.pool.oracle_gas_fee() {
            return Err(EngineError::InvalidRate(max_bet));
        }
        info!("Maximum bet set to {max_bet}");
        self.config.max_bet = max_bet;
        Ok(())
    }

    /// Set the house edge in per-mille. Together with the jackpot feed it
    /// must stay below the payout multiplier, or winning payouts would
    /// underflow.
    pub fn set_house_edge(&mut self, caller: &AccountId, house_edge: u64) -> EngineResult<()> {
        self.require_owner(caller)?;
        let payout_rate = self.config.payout_multiplier * PERMILLE;
        if house_edge + self.config.jackpot_fee_multiplier >= payout_rate {
            return Err(EngineError::InvalidRate(house_edge));
        }
        info!("House edge set to {house_edge} per mille");
        self.config.house_edge = house_edge;
        Ok(())
    }

    /// Set the per-mille of the poker stake earmarked to the jackpot.
    pub fn set_jackpot_fee_multiplier(
        &mut self,
        caller: &AccountId,
        multiplier: u64,
    ) -> EngineResult<()> {
        self.require_owner(caller)?;
        let payout_rate = self.config.payout_multiplier * PERMILLE;
        if self.config.house_edge + multiplier >= payout_rate {
            return Err(EngineError::InvalidRate(multiplier));
        }
        info!("Jackpot fee multiplier set to {multiplier} per mille");
        self.config.jackpot_fee_multiplier = multiplier;
        Ok(())
    }

    /// Set the flat per-wager oracle fee on the pool. Owner only.
    pub fn set_oracle_gas_fee(&mut self, caller: &AccountId, fee: Amount) -> EngineResult<()> {
        if fee >= self.config.max_bet {
            return Err(EngineError::InvalidRate(fee));
        }
        self.pool.set_oracle_gas_fee(caller, fee)?;
        Ok(())
    }

    /// Set the jackpot payout cap on the pool. Owner only.
    pub fn set_jackpot_limit(&mut self, caller: &AccountId, limit: Amount) -> EngineResult<()> {
        self.pool.set_jackpot_limit(caller, limit)?;
        Ok(())
    }

    /// Directly seed the jackpot earmark. Owner only.
    pub fn set_jackpot(&mut self, caller: &AccountId, amount: Amount) -> EngineResult<()> {
        self.pool.set_jackpot(caller, amount)?;
        Ok(())
    }

    /// Replace the referral milestone table. Owner only.
    pub fn set_milestones(
        &mut self,
        caller: &AccountId,
        thresholds: Vec<Amount>,
        percents: Vec<u64>,
    ) -> EngineResult<()> {
        self.referrals.set_milestones(caller, thresholds, percents)?;
        Ok(())
    }

    /// Swap the poker hand evaluator. Owner only.
    pub fn set_hand_evaluator(
        &mut self,
        caller: &AccountId,
        evaluator: Box<dyn HandEvaluator>,
    ) -> EngineResult<()> {
        self.require_owner(caller)?;
        self.hand_evaluator = evaluator;
        Ok(())
    }

    /// Swap the color evaluator. Owner only.
    pub fn set_color_evaluator(
        &mut self,
        caller: &AccountId,
        evaluator: Box<dyn ColorEvaluator>,
    ) -> EngineResult<()> {
        self.require_owner(caller)?;
        self.color_evaluator = evaluator;
        Ok(())
    }
}
