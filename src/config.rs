//! Engine configuration and accounting constants.

use crate::types::Amount;

/// Denominator for per-mille rates (house edge, jackpot feed).
pub const PERMILLE: u64 = 1000;

/// Denominator for referral bonus tier percents.
pub const BONUS_PERCENT_DENOMINATOR: u64 = 100;

/// Configuration for the settlement engine and its ledgers.
///
/// All values are plain integers in the smallest currency unit or per-mille
/// rates. Defaults mirror the production deployment and can be overridden
/// through environment variables via [`EngineConfig::from_env`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Largest accepted payment for a single wager.
    pub max_bet: Amount,

    /// House edge in per-mille, shaved off every winning payout. The same
    /// rate determines the referral share of each wager.
    pub house_edge: u64,

    /// Per-mille of the poker stake earmarked to the jackpot sub-ledger on
    /// every wager.
    pub jackpot_fee_multiplier: u64,

    /// Even-money payout multiplier for both the poker and color games.
    pub payout_multiplier: u64,

    /// Flat fee per wager, accumulated for the randomness operator. Seeds
    /// the pool; the live value is owner-adjustable there.
    pub oracle_gas_fee: Amount,

    /// Policy cap on any single jackpot payout. Seeds the pool; the live
    /// value is owner-adjustable there.
    pub jackpot_limit: Amount,

    /// Identifier of the pool share token.
    pub share_token_id: String,

    /// Cumulative-winnings thresholds for the referral bonus tiers.
    pub winnings_milestones: Vec<Amount>,

    /// Bonus percent per tier, parallel to `winnings_milestones`.
    pub bonus_percent_milestones: Vec<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_bet: 10_000_000_000_000,
            house_edge: 15,
            jackpot_fee_multiplier: 2,
            payout_multiplier: 2,
            oracle_gas_fee: 3_000_000,
            jackpot_limit: 500_000_000_000,
            share_token_id: "XPKR".to_string(),
            winnings_milestones: vec![
                0,
                20_000_000_000,
                60_000_000_000,
                100_000_000_000,
                140_000_000_000,
                180_000_000_000,
                220_000_000_000,
            ],
            bonus_percent_milestones: vec![1, 2, 4, 6, 8, 10, 12],
        }
    }
}

impl EngineConfig {
    /// Build a configuration from the environment, falling back to defaults
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_bet: std::env::var("XPOKER_MAX_BET")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_bet),
            house_edge: std::env::var("XPOKER_HOUSE_EDGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.house_edge),
            jackpot_fee_multiplier: std::env::var("XPOKER_JACKPOT_FEE_MULTIPLIER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.jackpot_fee_multiplier),
            payout_multiplier: std::env::var("XPOKER_PAYOUT_MULTIPLIER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.payout_multiplier),
            oracle_gas_fee: std::env::var("XPOKER_ORACLE_GAS_FEE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.oracle_gas_fee),
            jackpot_limit: std::env::var("XPOKER_JACKPOT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.jackpot_limit),
            share_token_id: std::env::var("XPOKER_SHARE_TOKEN_ID")
                .unwrap_or(defaults.share_token_id),
            winnings_milestones: defaults.winnings_milestones,
            bonus_percent_milestones: defaults.bonus_percent_milestones,
        }
    }
}
