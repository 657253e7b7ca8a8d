//! Shared liquidity pool.
//!
//! Whitelisted liquidity providers deposit currency and receive pool shares
//! pegged 1:1; withdrawing burns shares and returns the same amount of
//! currency. The pool carries a jackpot earmark inside its balance and an
//! oracle-fee accumulator outside it. Game proceeds flow in through the
//! single bound game address and payouts flow out the same way.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{PoolError, PoolResult};
pub use manager::LiquidityPool;
pub use models::PoolInfo;
