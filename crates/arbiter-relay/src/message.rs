//! # Cross-Domain Arbitration Messages
//!
//! The payloads exchanged between a requesting domain and the domain that
//! hosts the [`ArbitrationAuthority`](arbiter_dispute::ArbitrationAuthority).
//! The relay itself treats payloads as opaque bytes; this codec is what the
//! two ends agree on. Encoding is JSON.

use arbiter_core::Amount;
use arbiter_dispute::{DisputeId, Ruling};
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// A message understood by arbitration endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArbitrationMessage {
    /// Ask the authority to open a dispute on the sender's behalf.
    RequestArbitration {
        /// Number of possible rulings.
        choices: u64,
        /// Opaque data passed to the cost function.
        extra_data: Vec<u8>,
        /// Payment offered for the dispute.
        payment: Amount,
    },
    /// A final ruling, sent back to the requesting domain.
    RulingRelayed {
        /// The solved dispute.
        dispute_id: DisputeId,
        /// Its final ruling.
        ruling: Ruling,
    },
    /// The sender appeals a provisional ruling.
    AppealNotification {
        /// The dispute being appealed.
        dispute_id: DisputeId,
        /// Opaque data passed to the cost function.
        extra_data: Vec<u8>,
        /// Payment offered for the appeal.
        payment: Amount,
    },
}

impl ArbitrationMessage {
    /// Short name of the message kind, for logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RequestArbitration { .. } => "request_arbitration",
            Self::RulingRelayed { .. } => "ruling_relayed",
            Self::AppealNotification { .. } => "appeal_notification",
        }
    }

    /// Encode as a relay payload.
    pub fn encode(&self) -> Result<Vec<u8>, RelayError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a relay payload.
    ///
    /// # Errors
    ///
    /// [`RelayError::Codec`] for anything that is not a well-formed message.
    pub fn decode(payload: &[u8]) -> Result<Self, RelayError> {
        Ok(serde_json::from_slice(payload)?)
    }
}
