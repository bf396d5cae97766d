//! # Fee Amounts
//!
//! Amounts are unsigned integers in the smallest unit of the host
//! environment's currency. Floating point never appears; fee multiples use
//! checked arithmetic so an absurd price surfaces as an error instead of a
//! silently wrapped cost.

use serde::{Deserialize, Serialize};

/// A non-negative amount in smallest currency units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from a raw unit count.
    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    /// The raw unit count.
    pub const fn units(&self) -> u128 {
        self.0
    }

    /// Multiply by a scalar, returning `None` on overflow.
    pub fn checked_mul(self, factor: u128) -> Option<Amount> {
        self.0.checked_mul(factor).map(Amount)
    }

    /// Add two amounts, returning `None` on overflow.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }
}

impl From<u128> for Amount {
    fn from(units: u128) -> Self {
        Self(units)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
