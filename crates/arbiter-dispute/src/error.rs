//! # Arbitration Error Types
//!
//! Structured error hierarchy for the arbitration authority. Every variant
//! carries diagnostic context: the dispute, the amounts or states involved,
//! and the actor that was refused.
//!
//! All of these are synchronous, caller-visible failures. An operation that
//! returns one of them has left the authority's state untouched. The one
//! failure the authority swallows, fee payout at finality, never appears
//! here; it is reported as an
//! [`ArbitrationEvent::FeePayoutFailed`](crate::ArbitrationEvent::FeePayoutFailed).

use arbiter_core::{AccountId, Amount, Timestamp, ValidationError};
use thiserror::Error;

use crate::dispute::{DisputeId, Ruling};

/// Errors arising from arbitration operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArbitrationError {
    /// Payment does not cover the arbitration or appeal cost.
    #[error("insufficient fee: required {required}, paid {paid}")]
    InsufficientFee {
        /// The cost that had to be covered.
        required: Amount,
        /// The payment actually supplied.
        paid: Amount,
    },

    /// The acting identity is not allowed to perform the operation.
    #[error("{actor} is not authorized to {operation}")]
    Unauthorized {
        /// The identity that attempted the operation.
        actor: AccountId,
        /// The refused operation.
        operation: &'static str,
    },

    /// The dispute is already final.
    #[error("{dispute_id} is already solved")]
    AlreadySolved {
        /// The dispute identifier.
        dispute_id: DisputeId,
    },

    /// The appeal window is still open, so the ruling cannot be finalized yet.
    #[error("appeal period for {dispute_id} is active until {ends_at}")]
    AppealPeriodActive {
        /// The dispute identifier.
        dispute_id: DisputeId,
        /// When the window closes.
        ends_at: Timestamp,
    },

    /// Ruling value outside `[0, choice_count]`.
    #[error("ruling {ruling} is out of range for {dispute_id} (choices: {choices})")]
    InvalidRuling {
        /// The dispute identifier.
        dispute_id: DisputeId,
        /// The rejected ruling value.
        ruling: Ruling,
        /// The dispute's choice count.
        choices: u64,
    },

    /// The dispute has no open appeal window for the requested operation.
    #[error("{dispute_id} is not appealable: {reason}")]
    NotAppealable {
        /// The dispute identifier.
        dispute_id: DisputeId,
        /// Why no appeal is possible.
        reason: &'static str,
    },

    /// No dispute with this identifier exists.
    #[error("{0} not found")]
    NotFound(DisputeId),

    /// A fee multiple does not fit in an [`Amount`].
    #[error("amount overflow computing {0}")]
    AmountOverflow(&'static str),

    /// The appeal window end is not representable.
    #[error("appeal window for {0} overflows the timestamp range")]
    WindowOverflow(DisputeId),

    /// Configuration rejected at construction.
    #[error("configuration error: {0}")]
    Validation(#[from] ValidationError),
}
