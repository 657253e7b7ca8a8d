//! Integration tests for the full wager lifecycle: liquidity in, wager,
//! randomness, result, claim, liquidity out. Hand outcomes are scripted
//! through the evaluator seam so each scenario is deterministic.

use xpoker::config::EngineConfig;
use xpoker::game::{
    ColorChoice, ColorEvaluator, EngineError, GameStatus, HandEvaluator, PokerOutcome,
    SettlementEngine,
};
use xpoker::pool::PoolError;
use xpoker::types::{AccountId, Card};

const DEAL: [Card; 9] = [1, 6, 13, 14, 24, 27, 44, 45, 50];

struct FixedHand(PokerOutcome);

impl HandEvaluator for FixedHand {
    fn evaluate(&self, _cards: &[Card]) -> PokerOutcome {
        self.0
    }
}

struct FixedColor(bool);

impl ColorEvaluator for FixedColor {
    fn evaluate(&self, _cards: &[Card], _choice: ColorChoice) -> bool {
        self.0
    }
}

fn setup(outcome: PokerOutcome, color_win: bool) -> (SettlementEngine, AccountId, AccountId) {
    let owner = AccountId::new("owner");
    let operator = AccountId::new("operator");
    let mut engine = SettlementEngine::new(
        owner.clone(),
        AccountId::new("engine"),
        EngineConfig::default(),
        Box::new(FixedHand(outcome)),
        Box::new(FixedColor(color_win)),
    )
    .expect("engine should wire up with the default config");
    engine
        .set_operator(&owner, operator.clone())
        .expect("owner should be able to set the operator");
    engine
        .add_to_whitelist(&owner, AccountId::new("lp"))
        .expect("owner should be able to whitelist a provider");
    (engine, owner, operator)
}

#[test]
fn full_workflow_from_deposit_to_claim_and_withdrawal() {
    let (mut engine, _, operator) = setup(PokerOutcome::Win, false);
    let lp = AccountId::new("lp");
    let alice = AccountId::new("alice");

    engine.deposit(&lp, 1_000_000_000_000).unwrap();

    let id = engine
        .place_wager(&alice, 100_000_000, 100_000_000, ColorChoice::Even)
        .unwrap();
    engine.fulfill_randomness(&operator, id, &DEAL).unwrap();

    let paid = engine.claim_win_amount(id).unwrap();
    assert_eq!(paid, 198_300_000, "winning poker stake pays 1.983x");

    // Pool took the payment net of the oracle fee and paid the win out of
    // the providers' liquidity.
    let info = engine.get_pool_info();
    assert_eq!(
        info.pool_balance,
        1_000_000_000_000 + 97_000_000 - 198_300_000
    );
    assert_eq!(
        engine.withdraw(&lp, 999_000_000_000).unwrap(),
        999_000_000_000
    );
}

#[test]
fn wager_intake_credits_the_pool_net_of_the_oracle_fee() {
    let (mut engine, _, _) = setup(PokerOutcome::Lose, false);
    let alice = AccountId::new("alice");

    engine
        .place_wager(&alice, 10_000_000_000, 0, ColorChoice::Even)
        .unwrap();

    let info = engine.get_pool_info();
    assert_eq!(info.pool_balance, 9_997_000_000);
    assert_eq!(info.collected_fees, 3_000_000);
}

#[test]
fn pool_absorbs_losses_in_favor_of_providers() {
    let (mut engine, _, operator) = setup(PokerOutcome::Lose, false);
    let lp = AccountId::new("lp");
    let alice = AccountId::new("alice");

    engine.deposit(&lp, 1_000_000_000).unwrap();

    let id = engine
        .place_wager(&alice, 100_000_000, 40_000_000, ColorChoice::Even)
        .unwrap();
    engine.fulfill_randomness(&operator, id, &DEAL).unwrap();
    assert_eq!(
        engine.claim_win_amount(id),
        Err(EngineError::NothingToClaim(id))
    );

    let info = engine.get_pool_info();
    assert_eq!(
        info.pool_balance,
        1_097_000_000,
        "a lost wager stays in the pool"
    );
    assert_eq!(info.jackpot_balance, 80_000);
    assert_eq!(info.collected_fees, 3_000_000);
}

#[test]
fn jackpot_claim_pays_the_stored_win_clamped_to_the_limit() {
    let (mut engine, _, operator) = setup(PokerOutcome::Lose, false);
    let alice = AccountId::new("alice");

    // The wager intake alone funds the pool well past the limit.
    let id = engine
        .place_wager(&alice, 10_000_000_000_000, 0, ColorChoice::Even)
        .unwrap();
    engine
        .set_game_result(&operator, id, 600_000_000_000, 100_000, true, 0)
        .unwrap();

    let paid = engine.claim_win_amount(id).unwrap();
    assert_eq!(
        paid, 500_000_000_000,
        "a jackpot win above the limit pays the limit"
    );
    assert_eq!(
        engine.pool().jackpot_balance(),
        0,
        "the whole earmark is released even when clamped"
    );
    assert_eq!(
        engine.claim_win_amount(id),
        Err(EngineError::AlreadyClaimed(id))
    );
}

#[test]
fn jackpot_claim_fails_without_funds_and_stays_claimable() {
    let (mut engine, _, operator) = setup(PokerOutcome::Lose, false);
    let lp = AccountId::new("lp");
    let alice = AccountId::new("alice");

    // No provider liquidity: the pool holds exactly the net payment.
    let id = engine
        .place_wager(&alice, 10_000_000_000, 0, ColorChoice::Even)
        .unwrap();
    assert_eq!(engine.pool().pool_balance(), 9_997_000_000);

    // The awarded win is one unit more than the pool can cover.
    engine
        .set_game_result(&operator, id, 9_997_000_001, 100_000, true, 0)
        .unwrap();
    assert_eq!(
        engine.claim_win_amount(id),
        Err(EngineError::Pool(PoolError::NotEnoughFundsInPool {
            available: 9_997_000_000,
            required: 9_997_000_001,
        }))
    );
    assert_eq!(
        engine.get_game(id).unwrap().status,
        GameStatus::Resolved,
        "a failed claim must leave the game claimable"
    );

    // Fresh liquidity lets the claim go through in full.
    engine.deposit(&lp, 1_000_000_000).unwrap();
    assert_eq!(engine.claim_win_amount(id).unwrap(), 9_997_000_001);
}

#[test]
fn jackpot_claim_with_no_win_amount_is_rejected() {
    let (mut engine, _, operator) = setup(PokerOutcome::Lose, false);
    let alice = AccountId::new("alice");

    let id = engine
        .place_wager(&alice, 10_000_000_000, 0, ColorChoice::Even)
        .unwrap();
    engine.set_game_result(&operator, id, 0, 0, true, 0).unwrap();
    assert_eq!(
        engine.claim_win_amount(id),
        Err(EngineError::NothingToClaim(id))
    );
}

#[test]
fn win_exceeding_the_pool_cannot_be_claimed() {
    let (mut engine, _, operator) = setup(PokerOutcome::Win, false);
    let alice = AccountId::new("alice");
    engine.deposit(&AccountId::new("lp"), 1_000_000_000).unwrap();

    let id = engine
        .place_wager(&alice, 10_000_000_000, 10_000_000_000, ColorChoice::Even)
        .unwrap();
    engine.fulfill_randomness(&operator, id, &DEAL).unwrap();

    // The win (19.83e9) exceeds everything the pool holds (~11e9).
    assert!(matches!(
        engine.claim_win_amount(id),
        Err(EngineError::Pool(PoolError::NotEnoughFundsInPool { .. }))
    ));
    assert_eq!(engine.get_game(id).unwrap().status, GameStatus::Resolved);
}

#[test]
fn operator_collects_the_accumulated_oracle_fees() {
    let (mut engine, _, operator) = setup(PokerOutcome::Lose, false);
    let alice = AccountId::new("alice");
    engine
        .deposit(&AccountId::new("lp"), 100_000_000_000)
        .unwrap();

    for _ in 0..10 {
        let id = engine
            .place_wager(&alice, 100_000_000, 40_000_000, ColorChoice::Even)
            .unwrap();
        engine.fulfill_randomness(&operator, id, &DEAL).unwrap();
    }

    assert_eq!(engine.get_pool_info().collected_fees, 30_000_000);
    let pool_before = engine.get_pool_info().pool_balance;
    assert_eq!(engine.take_oracle_fee(&operator).unwrap(), 30_000_000);
    assert_eq!(engine.get_pool_info().collected_fees, 0);
    assert_eq!(
        engine.get_pool_info().pool_balance,
        pool_before,
        "fee collection must not touch the pool balance"
    );
}

#[test]
fn games_resolve_independently() {
    let (mut engine, _, operator) = setup(PokerOutcome::Win, false);
    let alice = AccountId::new("alice");
    let bob = AccountId::new("bob");
    engine
        .deposit(&AccountId::new("lp"), 1_000_000_000_000)
        .unwrap();

    let a = engine
        .place_wager(&alice, 100_000_000, 100_000_000, ColorChoice::Even)
        .unwrap();
    let b = engine
        .place_wager(&bob, 200_000_000, 200_000_000, ColorChoice::Odd)
        .unwrap();
    assert_ne!(a, b);
    assert_eq!(engine.get_last_request_id(), Some(b));

    // Resolve in reverse order of placement.
    engine.fulfill_randomness(&operator, b, &DEAL).unwrap();
    assert_eq!(engine.claim_win_amount(b).unwrap(), 396_600_000);

    assert_eq!(engine.claim_win_amount(a), Err(EngineError::NotResolved(a)));
    engine.fulfill_randomness(&operator, a, &DEAL).unwrap();
    assert_eq!(engine.claim_win_amount(a).unwrap(), 198_300_000);
}
