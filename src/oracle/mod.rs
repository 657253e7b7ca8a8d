//! Randomness request/fulfillment protocol.
//!
//! The coordinator is bound to exactly one consumer (the settlement engine)
//! and a single operator. The consumer opens numbered requests; the operator
//! answers them at most once each. There is no cancellation or timeout path:
//! an unanswered request stays pending indefinitely.

pub mod coordinator;
pub mod errors;

pub use coordinator::{RandomnessCoordinator, pack_cards, unpack_cards};
pub use errors::{OracleError, OracleResult};
