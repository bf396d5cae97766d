//! # Relay Error Types

use arbiter_core::ValidationError;
use arbiter_dispute::ArbitrationError;
use thiserror::Error;

/// Errors reported by a [`BridgeGateway`](crate::BridgeGateway).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The gateway is not accepting messages.
    #[error("bridge for domain {domain_id} is unavailable")]
    Unavailable {
        /// The domain whose gateway refused.
        domain_id: String,
    },

    /// The gateway refused this particular message.
    #[error("bridge rejected message: {0}")]
    Rejected(String),
}

/// Errors from [`MessageRelay`](crate::MessageRelay) operations.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The payload cost exceeds the transport budget. Nothing was sent.
    #[error("payload too large: cost {size} exceeds max gas per tx {max}")]
    PayloadTooLarge {
        /// Cost of the rejected payload.
        size: u64,
        /// The gateway's per-transaction budget.
        max: u64,
    },

    /// `message_sender` was called outside inbound message processing.
    #[error("no inbound message is being processed")]
    NoActiveMessage,

    /// The gateway failed to accept the message.
    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// An arbitration message could not be encoded or decoded.
    #[error("message codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// An endpoint received a message kind it does not handle.
    #[error("unexpected {kind} message")]
    UnexpectedMessage {
        /// The message kind.
        kind: &'static str,
    },

    /// The authority refused an inbound request.
    #[error("arbitration refused: {0}")]
    Arbitration(#[from] ArbitrationError),

    /// Relay configuration is out of range.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_too_large_display() {
        let err = RelayError::PayloadTooLarge { size: 300, max: 256 };
        let msg = format!("{err}");
        assert!(msg.contains("300"));
        assert!(msg.contains("256"));
    }

    #[test]
    fn bridge_error_converts() {
        let err: RelayError = BridgeError::Unavailable {
            domain_id: "home".to_string(),
        }
        .into();
        assert!(matches!(err, RelayError::Bridge(_)));
        assert!(format!("{err}").contains("home"));
    }

    #[test]
    fn no_active_message_display() {
        assert_eq!(
            RelayError::NoActiveMessage.to_string(),
            "no inbound message is being processed"
        );
    }
}
