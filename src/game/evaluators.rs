//! Pluggable card evaluation strategies.

use crate::game::models::{ColorChoice, PokerOutcome};
use crate::types::Card;

/// Decides the poker outcome of a full nine-card deal.
///
/// Layout: cards `[0..2]` are the player's hole cards, `[2..4]` the
/// house's, `[4..9]` the community cards. Implementations must be pure
/// functions of the deal; a `JackpotWin` result never comes from here,
/// it is flagged separately when the result is set.
pub trait HandEvaluator: Send {
    fn evaluate(&self, cards: &[Card]) -> PokerOutcome;
}

/// Decides whether the color side bet won for a given deal and call.
pub trait ColorEvaluator: Send {
    fn evaluate(&self, cards: &[Card], choice: ColorChoice) -> bool;
}

/// Color rule: take the first three cards of the deal and look at the
/// parity of each card's suit index (`card / 13`). The majority parity
/// wins, and the side bet pays when it matches the player's call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuitParityColorEvaluator;

impl ColorEvaluator for SuitParityColorEvaluator {
    fn evaluate(&self, cards: &[Card], choice: ColorChoice) -> bool {
        let odd_suits = cards
            .iter()
            .take(3)
            .filter(|&&card| (card / 13) % 2 == 1)
            .count();
        let majority_odd = odd_suits >= 2;
        match choice {
            ColorChoice::Odd => majority_odd,
            ColorChoice::Even => !majority_odd,
        }
    }
}

/// Baseline poker rule comparing the highest hole-card value
/// (`card % 13`, ace low) of the player against the house. Equal high
/// cards are a draw.
#[derive(Debug, Default, Clone, Copy)]
pub struct HighCardEvaluator;

impl HandEvaluator for HighCardEvaluator {
    fn evaluate(&self, cards: &[Card]) -> PokerOutcome {
        let high = |pair: &[Card]| pair.iter().map(|&c| c % 13).max().unwrap_or(0);
        let player = high(&cards[0..2]);
        let house = high(&cards[2..4]);
        match player.cmp(&house) {
            std::cmp::Ordering::Greater => PokerOutcome::Win,
            std::cmp::Ordering::Equal => PokerOutcome::Draw,
            std::cmp::Ordering::Less => PokerOutcome::Lose,
        }
    }
}
