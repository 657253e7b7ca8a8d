//! Settlement engine data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Amount};

/// Lifecycle of a wager. Transitions are strictly forward and each game
/// pays out at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Wager taken, randomness requested, no result yet.
    Pending,
    /// Result set, winnings fixed, waiting for the player to claim.
    Resolved,
    /// Winnings paid out. Terminal.
    Claimed,
}

/// Outcome of the poker hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PokerOutcome {
    Lose,
    Draw,
    Win,
    /// The hand hit the jackpot; the awarded win is clamped to the
    /// configured limit at claim time.
    JackpotWin,
}

/// The player's side bet on the suit parity of the dealt cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorChoice {
    Even,
    Odd,
}

/// A single wager and everything settled against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRequest {
    /// The wagering player, and the account every claim pays to.
    pub player: AccountId,
    /// Full payment taken for the wager.
    pub payment: Amount,
    /// Portion of the payment staked on the poker hand.
    pub poker_stake: Amount,
    /// Remainder of the payment, staked on the color side bet.
    pub color_stake: Amount,
    /// The player's color call.
    pub color_choice: ColorChoice,
    pub status: GameStatus,
    /// Dealt cards as a 52-bit mask, present once randomness is fulfilled.
    pub packed_cards: Option<u64>,
    /// Poker outcome, recorded when the deal is evaluated in-engine.
    pub poker_outcome: Option<PokerOutcome>,
    /// Whether the color side bet won, recorded alongside the outcome.
    pub color_won: Option<bool>,
    /// Whether this game pays through the jackpot payout at claim time.
    pub is_jackpot: bool,
    /// Winnings set at resolution; the amount the claim pays, clamped to
    /// the jackpot limit on jackpot games.
    pub total_win: Option<Amount>,
    /// Referral share of the payment, recorded at resolution.
    pub referral_amount: Option<Amount>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl GameRequest {
    pub fn new(
        player: AccountId,
        payment: Amount,
        poker_stake: Amount,
        color_choice: ColorChoice,
    ) -> Self {
        Self {
            player,
            payment,
            poker_stake,
            color_stake: payment - poker_stake,
            color_choice,
            status: GameStatus::Pending,
            packed_cards: None,
            poker_outcome: None,
            color_won: None,
            is_jackpot: false,
            total_win: None,
            referral_amount: None,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }
}
