//! # Collaborator Seams
//!
//! The authority talks to two outside parties:
//!
//! - the **requester** of each dispute, through [`Arbitrable`], which
//!   receives the final ruling;
//! - whatever moves money, through [`FeeSink`], which receives the escrowed
//!   fee at finality.
//!
//! A ruling callback cannot fail. A payout can, and the authority treats
//! that failure as observable but non-fatal.

use std::collections::{BTreeMap, BTreeSet};

use arbiter_core::{AccountId, Amount};
use parking_lot::Mutex;
use thiserror::Error;

use crate::dispute::{DisputeId, Ruling};

/// A party that can be notified of a final ruling.
pub trait Arbitrable: Send + Sync {
    /// The identity of this party.
    fn account(&self) -> &AccountId;

    /// Receive the final ruling for one of this party's disputes.
    fn rule(&self, dispute_id: DisputeId, ruling: Ruling);
}

/// Errors from fee delivery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayoutError {
    /// The payee refused the transfer.
    #[error("payee {0} rejected the transfer")]
    Rejected(AccountId),

    /// Crediting the payee would overflow its balance.
    #[error("balance overflow crediting {0}")]
    Overflow(AccountId),
}

/// Destination of escrowed fees.
pub trait FeeSink: Send + Sync {
    /// Transfer `amount` to `payee`.
    fn pay(&self, payee: &AccountId, amount: Amount) -> Result<(), PayoutError>;
}

/// Balance book kept in memory.
///
/// Payees marked with [`reject`](Self::reject) refuse every transfer,
/// which is how an uncooperative payee is modelled.
#[derive(Debug, Default)]
pub struct InMemoryFeeSink {
    balances: Mutex<BTreeMap<AccountId, Amount>>,
    rejecting: Mutex<BTreeSet<AccountId>>,
}

impl InMemoryFeeSink {
    /// An empty balance book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `payee` refuse all further transfers.
    pub fn reject(&self, payee: AccountId) {
        self.rejecting.lock().insert(payee);
    }

    /// Total credited to `payee` so far.
    pub fn balance(&self, payee: &AccountId) -> Amount {
        self.balances
            .lock()
            .get(payee)
            .copied()
            .unwrap_or(Amount::ZERO)
    }
}

impl FeeSink for InMemoryFeeSink {
    fn pay(&self, payee: &AccountId, amount: Amount) -> Result<(), PayoutError> {
        if self.rejecting.lock().contains(payee) {
            return Err(PayoutError::Rejected(payee.clone()));
        }
        let mut balances = self.balances.lock();
        let entry = balances.entry(payee.clone()).or_insert(Amount::ZERO);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| PayoutError::Overflow(payee.clone()))?;
        Ok(())
    }
}

/// An [`Arbitrable`] that remembers every ruling it was given.
#[derive(Debug)]
pub struct RecordingArbitrable {
    account: AccountId,
    received: Mutex<Vec<(DisputeId, Ruling)>>,
}

impl RecordingArbitrable {
    /// Create a recorder for `account`.
    pub fn new(account: AccountId) -> Self {
        Self {
            account,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Every `(dispute, ruling)` received, in order.
    pub fn received(&self) -> Vec<(DisputeId, Ruling)> {
        self.received.lock().clone()
    }
}

impl Arbitrable for RecordingArbitrable {
    fn account(&self) -> &AccountId {
        &self.account
    }

    fn rule(&self, dispute_id: DisputeId, ruling: Ruling) {
        self.received.lock().push((dispute_id, ruling));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    #[test]
    fn sink_accumulates() {
        let sink = InMemoryFeeSink::new();
        sink.pay(&account("arb"), Amount::new(10)).unwrap();
        sink.pay(&account("arb"), Amount::new(5)).unwrap();
        assert_eq!(sink.balance(&account("arb")), Amount::new(15));
        assert_eq!(sink.balance(&account("other")), Amount::ZERO);
    }

    #[test]
    fn rejecting_payee_gets_nothing() {
        let sink = InMemoryFeeSink::new();
        sink.reject(account("arb"));
        assert_eq!(
            sink.pay(&account("arb"), Amount::new(10)).unwrap_err(),
            PayoutError::Rejected(account("arb"))
        );
        assert_eq!(sink.balance(&account("arb")), Amount::ZERO);
    }

    #[test]
    fn overflow_is_reported() {
        let sink = InMemoryFeeSink::new();
        sink.pay(&account("arb"), Amount::new(u128::MAX)).unwrap();
        assert!(matches!(
            sink.pay(&account("arb"), Amount::new(1)),
            Err(PayoutError::Overflow(_))
        ));
        assert_eq!(sink.balance(&account("arb")), Amount::new(u128::MAX));
    }

    #[test]
    fn recorder_keeps_order() {
        let rec = RecordingArbitrable::new(account("escrow"));
        rec.rule(DisputeId::new(1), Ruling::new(2));
        rec.rule(DisputeId::new(0), Ruling::NO_DECISION);
        assert_eq!(
            rec.received(),
            vec![
                (DisputeId::new(1), Ruling::new(2)),
                (DisputeId::new(0), Ruling::NO_DECISION)
            ]
        );
        assert_eq!(rec.account().as_str(), "escrow");
    }
}
