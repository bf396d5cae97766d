//! # Fee Ledger
//!
//! A single owner-settable arbitration price. Appeal cost is a fixed
//! multiple of it. No price history is kept: a change applies to every
//! later creation or appeal and never to fees already escrowed.

use arbiter_core::{AccountId, Amount};
use serde::{Deserialize, Serialize};

use crate::error::ArbitrationError;

/// Appeal cost as a multiple of the arbitration price.
pub const APPEAL_COST_MULTIPLIER: u128 = 2;

/// The current arbitration price and the identity allowed to change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLedger {
    owner: AccountId,
    price: Amount,
}

impl FeeLedger {
    /// Create a ledger with an initial price.
    pub fn new(owner: AccountId, price: Amount) -> Self {
        Self { owner, price }
    }

    /// The identity allowed to change the price.
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// The current price.
    pub fn price(&self) -> Amount {
        self.price
    }

    /// Cost of creating a dispute.
    ///
    /// `_extra_data` is accepted for interface compatibility; this authority
    /// charges a flat price.
    pub fn arbitration_cost(&self, _extra_data: &[u8]) -> Amount {
        self.price
    }

    /// Cost of appealing a ruling: [`APPEAL_COST_MULTIPLIER`] × arbitration cost.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::AmountOverflow`] if the multiple does not fit.
    pub fn appeal_cost(&self, extra_data: &[u8]) -> Result<Amount, ArbitrationError> {
        self.arbitration_cost(extra_data)
            .checked_mul(APPEAL_COST_MULTIPLIER)
            .ok_or(ArbitrationError::AmountOverflow("appeal cost"))
    }

    /// Replace the price, returning the previous one.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::Unauthorized`] unless `actor` is the owner.
    pub fn set_price(
        &mut self,
        actor: &AccountId,
        price: Amount,
    ) -> Result<Amount, ArbitrationError> {
        if actor != &self.owner {
            return Err(ArbitrationError::Unauthorized {
                actor: actor.clone(),
                operation: "set the arbitration price",
            });
        }
        Ok(std::mem::replace(&mut self.price, price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> AccountId {
        AccountId::new("owner").unwrap()
    }

    #[test]
    fn cost_ignores_extra_data() {
        let ledger = FeeLedger::new(owner(), Amount::new(100));
        assert_eq!(ledger.arbitration_cost(b""), Amount::new(100));
        assert_eq!(ledger.arbitration_cost(b"court=7"), Amount::new(100));
    }

    #[test]
    fn appeal_cost_is_double() {
        let ledger = FeeLedger::new(owner(), Amount::new(100));
        assert_eq!(ledger.appeal_cost(b"").unwrap(), Amount::new(200));
    }

    #[test]
    fn appeal_cost_overflow() {
        let ledger = FeeLedger::new(owner(), Amount::new(u128::MAX));
        assert_eq!(
            ledger.appeal_cost(b"").unwrap_err(),
            ArbitrationError::AmountOverflow("appeal cost")
        );
    }

    #[test]
    fn owner_sets_price() {
        let mut ledger = FeeLedger::new(owner(), Amount::new(100));
        let old = ledger.set_price(&owner(), Amount::new(150)).unwrap();
        assert_eq!(old, Amount::new(100));
        assert_eq!(ledger.price(), Amount::new(150));
    }

    #[test]
    fn stranger_cannot_set_price() {
        let mut ledger = FeeLedger::new(owner(), Amount::new(100));
        let stranger = AccountId::new("stranger").unwrap();
        let err = ledger.set_price(&stranger, Amount::new(1)).unwrap_err();
        assert!(matches!(err, ArbitrationError::Unauthorized { .. }));
        assert_eq!(ledger.price(), Amount::new(100));
    }
}
