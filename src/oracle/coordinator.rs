//! Randomness coordinator: request bookkeeping and card packing.

use std::collections::BTreeSet;

use log::{debug, info};

use crate::oracle::errors::{OracleError, OracleResult};
use crate::types::{AccountId, Card, RequestId};

/// Pack a set of dealt cards into a single `u64` bitmask, one bit per card
/// index. Duplicate cards collapse onto the same bit.
pub fn pack_cards(cards: &[Card]) -> u64 {
    cards.iter().fold(0u64, |mask, &card| mask | (1u64 << card))
}

/// Unpack a card bitmask back into ascending card indices.
pub fn unpack_cards(mask: u64) -> Vec<Card> {
    (0u8..52).filter(|&card| mask & (1u64 << card) != 0).collect()
}

/// Coordinates randomness requests between a single bound consumer and a
/// single operator.
///
/// The consumer opens requests and receives monotonically increasing ids.
/// The operator fulfills each pending request at most once, delivering the
/// packed card mask back to the caller. Fulfilling an id that was never
/// opened, or was already answered, is rejected.
#[derive(Debug)]
pub struct RandomnessCoordinator {
    owner: AccountId,
    operator: AccountId,
    consumer: Option<AccountId>,
    next_request_id: RequestId,
    pending: BTreeSet<RequestId>,
}

impl RandomnessCoordinator {
    /// Create a coordinator. The deployer becomes both owner and initial
    /// operator; no consumer is bound yet.
    pub fn new(owner: AccountId) -> Self {
        Self {
            operator: owner.clone(),
            owner,
            consumer: None,
            next_request_id: 0,
            pending: BTreeSet::new(),
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn operator(&self) -> &AccountId {
        &self.operator
    }

    pub fn consumer(&self) -> Option<&AccountId> {
        self.consumer.as_ref()
    }

    /// Whether a request id is awaiting fulfillment.
    pub fn is_pending(&self, request_id: RequestId) -> bool {
        self.pending.contains(&request_id)
    }

    /// Number of requests awaiting fulfillment.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Replace the operator. Owner only; the null address is rejected.
    pub fn set_operator(&mut self, caller: &AccountId, operator: AccountId) -> OracleResult<()> {
        if caller != &self.owner {
            return Err(OracleError::NotOwner);
        }
        if operator.is_zero() {
            return Err(OracleError::InvalidOperator);
        }
        info!("Oracle operator changed to {operator}");
        self.operator = operator;
        Ok(())
    }

    /// Bind the consumer. Owner only. Rebinding replaces the previous
    /// consumer; requests already pending stay answerable.
    pub fn set_consumer(&mut self, caller: &AccountId, consumer: AccountId) -> OracleResult<()> {
        if caller != &self.owner {
            return Err(OracleError::NotOwner);
        }
        info!("Oracle consumer bound to {consumer}");
        self.consumer = Some(consumer);
        Ok(())
    }

    /// Open a new randomness request. Only the bound consumer may call.
    /// Returns the allocated request id.
    pub fn request_randomness(&mut self, caller: &AccountId) -> OracleResult<RequestId> {
        match &self.consumer {
            None => return Err(OracleError::NoConsumer),
            Some(consumer) if caller != consumer => return Err(OracleError::NotConsumer),
            Some(_) => {}
        }
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending.insert(request_id);
        debug!("Randomness requested, id {request_id}");
        Ok(request_id)
    }

    /// Validate and retire a fulfillment for `request_id` aimed at
    /// `consumer`. Operator only; the request must be pending and the
    /// target must be the bound consumer. On success the request leaves
    /// the pending set, so a second fulfillment for the same id fails.
    pub fn fulfill(
        &mut self,
        caller: &AccountId,
        consumer: &AccountId,
        request_id: RequestId,
    ) -> OracleResult<()> {
        if caller != &self.operator {
            return Err(OracleError::NotOperator);
        }
        match &self.consumer {
            None => return Err(OracleError::NoConsumer),
            Some(bound) if consumer != bound => {
                return Err(OracleError::ConsumerMismatch(consumer.to_string()));
            }
            Some(_) => {}
        }
        if !self.pending.remove(&request_id) {
            return Err(OracleError::RequestNotPending(request_id));
        }
        debug!("Randomness request {request_id} fulfilled");
        Ok(())
    }
}
