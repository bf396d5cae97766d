//! # Message Relay
//!
//! A thin forwarding contract over a [`BridgeGateway`]. Outbound, it checks
//! the payload against the gateway budget and hands it over. Inbound, it
//! makes the remote sender visible through [`MessageRelay::message_sender`]
//! for exactly as long as the message is being processed.
//!
//! The relay keeps no delivery receipts and no ordering state. The only
//! thing it tracks is the stack of senders for inbound messages currently
//! being processed, so that a handler which itself receives a nested message
//! sees the inner sender and, afterwards, the outer one again.

use std::sync::Arc;

use arbiter_core::AccountId;
use parking_lot::Mutex;

use crate::error::RelayError;
use crate::gateway::{BridgeGateway, MessageId, RelayMessage};

/// Transport cost of a payload: one unit per byte.
pub fn payload_cost(payload: &[u8]) -> u64 {
    payload.len() as u64
}

/// One domain's endpoint for cross-domain messages.
pub struct MessageRelay {
    gateway: Arc<dyn BridgeGateway>,
    inbound: Mutex<Vec<AccountId>>,
}

impl std::fmt::Debug for MessageRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRelay")
            .field("domain_id", &self.gateway.domain_id())
            .field("max_gas_per_tx", &self.gateway.max_gas_per_tx())
            .field("inbound_depth", &self.inbound.lock().len())
            .finish()
    }
}

/// Pops the inbound sender when message processing ends, unwinding included.
struct InboundScope<'a> {
    senders: &'a Mutex<Vec<AccountId>>,
}

impl Drop for InboundScope<'_> {
    fn drop(&mut self) {
        self.senders.lock().pop();
    }
}

impl MessageRelay {
    /// A relay sending through `gateway`.
    pub fn new(gateway: Arc<dyn BridgeGateway>) -> Self {
        Self {
            gateway,
            inbound: Mutex::new(Vec::new()),
        }
    }

    /// The local domain.
    pub fn domain_id(&self) -> &str {
        self.gateway.domain_id()
    }

    /// The gateway's per-transaction payload budget.
    pub fn max_gas_per_tx(&self) -> u64 {
        self.gateway.max_gas_per_tx()
    }

    /// Forward `payload` from `actor` to `target` on the counterpart domain.
    ///
    /// No chunking: a payload whose [`payload_cost`] exceeds
    /// [`max_gas_per_tx`](Self::max_gas_per_tx) is refused and never reaches
    /// the gateway.
    ///
    /// # Errors
    ///
    /// [`RelayError::PayloadTooLarge`] over budget, [`RelayError::Bridge`] if
    /// the gateway refuses.
    pub fn send_message(
        &self,
        actor: &AccountId,
        target: &AccountId,
        payload: Vec<u8>,
    ) -> Result<MessageId, RelayError> {
        let size = payload_cost(&payload);
        let max = self.max_gas_per_tx();
        if size > max {
            tracing::debug!(sender = %actor, target = %target, size, max, "payload over budget");
            return Err(RelayError::PayloadTooLarge { size, max });
        }
        let id = self.gateway.require_to_pass_message(RelayMessage {
            sender: actor.clone(),
            target: target.clone(),
            payload,
        })?;
        tracing::info!(
            message_id = %id,
            domain = %self.domain_id(),
            sender = %actor,
            target = %target,
            size,
            "message handed to bridge"
        );
        Ok(id)
    }

    /// The originator of the inbound message currently being processed.
    ///
    /// # Errors
    ///
    /// [`RelayError::NoActiveMessage`] outside [`receive`](Self::receive).
    pub fn message_sender(&self) -> Result<AccountId, RelayError> {
        self.inbound
            .lock()
            .last()
            .cloned()
            .ok_or(RelayError::NoActiveMessage)
    }

    /// Process an inbound `message` with `handler`.
    ///
    /// While `handler` runs, [`message_sender`](Self::message_sender) returns
    /// `message.sender`. The previous value is restored when it returns.
    pub fn receive<R>(&self, message: &RelayMessage, handler: impl FnOnce(&Self) -> R) -> R {
        self.inbound.lock().push(message.sender.clone());
        let _scope = InboundScope {
            senders: &self.inbound,
        };
        tracing::debug!(
            domain = %self.domain_id(),
            sender = %message.sender,
            target = %message.target,
            "processing inbound message"
        );
        handler(self)
    }
}
