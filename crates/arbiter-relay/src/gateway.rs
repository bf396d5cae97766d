//! # Bridge Gateway
//!
//! The transport that carries a message from one execution domain to the
//! other. [`MessageRelay`] is the only caller; it never assumes anything
//! about delivery or ordering beyond what the gateway documents.
//!
//! ## Architecture
//!
//! [`BridgeGateway`] is the seam for real transports. [`InMemoryBridge`]
//! queues outbound messages in process and hands them to a counterpart
//! relay on request, which is how two domains are wired together in tests
//! and in the CLI simulation.
//!
//! Message ids are deterministic: the SHA-256 of the source domain, the
//! gateway nonce, both endpoints and the payload.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use arbiter_core::{AccountId, ValidationError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::RelayConfig;
use crate::error::BridgeError;
use crate::relay::{payload_cost, MessageRelay};

/// Hex-encoded SHA-256 identifier of a bridged message.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Derive the id of `message` sent from `domain_id` with `nonce`.
    pub fn compute(domain_id: &str, nonce: u64, message: &RelayMessage) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(nonce.to_be_bytes());
        hasher.update(message.sender.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(message.target.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(&message.payload);
        let digest = hasher.finalize();
        Self(digest.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// The hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg:{}", self.0)
    }
}

/// A transient `(sender, target, payload)` triple handed to a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayMessage {
    /// Who sent the message on the source domain.
    pub sender: AccountId,
    /// Who it is addressed to on the destination domain.
    pub target: AccountId,
    /// Opaque bytes.
    pub payload: Vec<u8>,
}

/// A message as the gateway carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Deterministic message id.
    pub id: MessageId,
    /// Domain the message left from.
    pub source_domain: String,
    /// Gateway sequence number.
    pub nonce: u64,
    /// The message itself.
    pub message: RelayMessage,
}

/// Transport between two execution domains.
///
/// ## Contract
///
/// `require_to_pass_message` returns `Ok` only once the gateway has taken
/// responsibility for the message. Delivery and ordering guarantees after
/// that point are the implementation's to document.
pub trait BridgeGateway: Send + Sync {
    /// Accept `message` for delivery to the counterpart domain.
    fn require_to_pass_message(&self, message: RelayMessage) -> Result<MessageId, BridgeError>;

    /// The per-transaction payload budget.
    fn max_gas_per_tx(&self) -> u64;

    /// The local domain this gateway sends from.
    fn domain_id(&self) -> &str;
}

/// In-process gateway with a FIFO outbox.
///
/// Delivers in send order, once, and only when
/// [`deliver_next`](Self::deliver_next) is called.
#[derive(Debug)]
pub struct InMemoryBridge {
    domain_id: String,
    max_gas_per_tx: u64,
    next_nonce: AtomicU64,
    available: AtomicBool,
    outbox: Mutex<VecDeque<Envelope>>,
}

impl InMemoryBridge {
    /// Create a gateway from validated configuration.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidConfig`] if `config` is out of range.
    pub fn new(config: &RelayConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            domain_id: config.domain_id.clone(),
            max_gas_per_tx: config.max_gas_per_tx,
            next_nonce: AtomicU64::new(0),
            available: AtomicBool::new(true),
            outbox: Mutex::new(VecDeque::new()),
        })
    }

    /// Stop or resume accepting messages.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of messages waiting for delivery.
    pub fn pending(&self) -> usize {
        self.outbox.lock().len()
    }

    /// A copy of the outbox, oldest first.
    pub fn outbox(&self) -> Vec<Envelope> {
        self.outbox.lock().iter().cloned().collect()
    }

    /// Hand the oldest queued message to `destination`.
    ///
    /// `handler` runs inside [`MessageRelay::receive`], so
    /// `destination.message_sender()` reports the original sender for its
    /// duration. Returns `None` when the outbox is empty.
    pub fn deliver_next<R>(
        &self,
        destination: &MessageRelay,
        handler: impl FnOnce(&MessageRelay, &Envelope) -> R,
    ) -> Option<R> {
        let envelope = self.outbox.lock().pop_front()?;
        tracing::debug!(
            message_id = %envelope.id,
            from = %envelope.source_domain,
            to = %destination.domain_id(),
            "delivering bridged message"
        );
        Some(destination.receive(&envelope.message, |relay| handler(relay, &envelope)))
    }
}

impl BridgeGateway for InMemoryBridge {
    fn require_to_pass_message(&self, message: RelayMessage) -> Result<MessageId, BridgeError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(BridgeError::Unavailable {
                domain_id: self.domain_id.clone(),
            });
        }
        let cost = payload_cost(&message.payload);
        if cost > self.max_gas_per_tx {
            return Err(BridgeError::Rejected(format!(
                "payload cost {cost} over budget {}",
                self.max_gas_per_tx
            )));
        }
        let nonce = self.next_nonce.fetch_add(1, Ordering::SeqCst);
        let id = MessageId::compute(&self.domain_id, nonce, &message);
        self.outbox.lock().push_back(Envelope {
            id: id.clone(),
            source_domain: self.domain_id.clone(),
            nonce,
            message,
        });
        Ok(id)
    }

    fn max_gas_per_tx(&self) -> u64 {
        self.max_gas_per_tx
    }

    fn domain_id(&self) -> &str {
        &self.domain_id
    }
}
