//! # Authority Events
//!
//! Append-only record of everything observable the authority did. Each
//! event is also emitted through `tracing` at the point it is recorded.

use arbiter_core::{AccountId, Amount, Timestamp};
use serde::Serialize;

use crate::dispute::{DisputeId, Ruling};

/// An observable authority event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ArbitrationEvent {
    /// A dispute was created.
    DisputeCreation {
        /// The new dispute.
        dispute_id: DisputeId,
        /// Its requester.
        requester: AccountId,
        /// Fee escrowed with it.
        fee_paid: Amount,
    },
    /// A provisional ruling was recorded and the appeal window opened.
    AppealPossible {
        /// The ruled dispute.
        dispute_id: DisputeId,
        /// Its requester.
        requester: AccountId,
        /// When the window opened.
        at: Timestamp,
    },
    /// An appeal spawned a child dispute.
    AppealDecision {
        /// The appealed dispute.
        dispute_id: DisputeId,
        /// The dispute created to re-adjudicate it.
        child_dispute_id: DisputeId,
        /// Who appealed.
        appellant: AccountId,
    },
    /// A dispute became final.
    Ruling {
        /// The solved dispute.
        dispute_id: DisputeId,
        /// The final ruling.
        ruling: Ruling,
    },
    /// The escrowed fee could not be delivered at finality.
    FeePayoutFailed {
        /// The solved dispute.
        dispute_id: DisputeId,
        /// The intended payee.
        payee: AccountId,
        /// The undelivered amount.
        amount: Amount,
        /// Why delivery failed.
        reason: String,
    },
    /// The arbitration price changed.
    PriceChanged {
        /// Price before the change.
        old_price: Amount,
        /// Price after the change.
        new_price: Amount,
    },
}

impl ArbitrationEvent {
    /// The dispute this event concerns, if any.
    pub fn dispute_id(&self) -> Option<DisputeId> {
        match self {
            Self::DisputeCreation { dispute_id, .. }
            | Self::AppealPossible { dispute_id, .. }
            | Self::AppealDecision { dispute_id, .. }
            | Self::Ruling { dispute_id, .. }
            | Self::FeePayoutFailed { dispute_id, .. } => Some(*dispute_id),
            Self::PriceChanged { .. } => None,
        }
    }
}
