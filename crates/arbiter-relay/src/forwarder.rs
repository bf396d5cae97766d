//! # Cross-Domain Arbitration Endpoints
//!
//! Glue between a [`MessageRelay`] and an [`ArbitrationAuthority`] living
//! on different domains.
//!
//! - [`RulingForwarder`] stands in for a remote requester. The authority
//!   sees an ordinary [`Arbitrable`]; every ruling it receives is sent back
//!   over the relay as [`ArbitrationMessage::RulingRelayed`].
//!
//! - [`ArbitrationEndpoint`] runs on the authority's domain and turns inbound
//!   requests and appeals into authority calls, attributing them to the
//!   relay's [`message_sender`](MessageRelay::message_sender).

use std::sync::Arc;

use arbiter_core::AccountId;
use arbiter_dispute::{Arbitrable, ArbitrationAuthority, DisputeId, Ruling};
use parking_lot::Mutex;

use crate::error::RelayError;
use crate::gateway::MessageId;
use crate::message::ArbitrationMessage;
use crate::relay::MessageRelay;

/// An [`Arbitrable`] that forwards rulings to a party on the other domain.
///
/// The ruling callback cannot fail, so a relay failure is logged and
/// recorded in [`failures`](Self::failures) rather than propagated.
pub struct RulingForwarder {
    local: AccountId,
    remote: AccountId,
    relay: Arc<MessageRelay>,
    forwarded: Mutex<Vec<MessageId>>,
    failures: Mutex<Vec<(DisputeId, String)>>,
}

impl std::fmt::Debug for RulingForwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RulingForwarder")
            .field("local", &self.local)
            .field("remote", &self.remote)
            .finish_non_exhaustive()
    }
}

impl RulingForwarder {
    /// Forward rulings for `remote`, sending as `local` through `relay`.
    pub fn new(local: AccountId, remote: AccountId, relay: Arc<MessageRelay>) -> Self {
        Self {
            local,
            remote,
            relay,
            forwarded: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Ids of every ruling message handed to the bridge.
    pub fn forwarded(&self) -> Vec<MessageId> {
        self.forwarded.lock().clone()
    }

    /// Rulings that could not be forwarded, with the reason.
    pub fn failures(&self) -> Vec<(DisputeId, String)> {
        self.failures.lock().clone()
    }

    fn forward(&self, dispute_id: DisputeId, ruling: Ruling) -> Result<MessageId, RelayError> {
        let payload = ArbitrationMessage::RulingRelayed { dispute_id, ruling }.encode()?;
        self.relay.send_message(&self.local, &self.remote, payload)
    }
}

impl Arbitrable for RulingForwarder {
    fn account(&self) -> &AccountId {
        &self.remote
    }

    fn rule(&self, dispute_id: DisputeId, ruling: Ruling) {
        match self.forward(dispute_id, ruling) {
            Ok(id) => {
                tracing::info!(dispute_id = %dispute_id, message_id = %id, remote = %self.remote, "ruling forwarded");
                self.forwarded.lock().push(id);
            }
            Err(e) => {
                tracing::warn!(
                    dispute_id = %dispute_id,
                    remote = %self.remote,
                    error = %e,
                    "ruling could not be forwarded"
                );
                self.failures.lock().push((dispute_id, e.to_string()));
            }
        }
    }
}

/// Serves inbound arbitration requests on the authority's domain.
#[derive(Debug, Clone)]
pub struct ArbitrationEndpoint {
    account: AccountId,
    outbound: Arc<MessageRelay>,
}

impl ArbitrationEndpoint {
    /// An endpoint that answers as `account` through `outbound`.
    pub fn new(account: AccountId, outbound: Arc<MessageRelay>) -> Self {
        Self { account, outbound }
    }

    /// The identity rulings are sent from.
    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// Apply one inbound payload to `authority`.
    ///
    /// Must be called from inside [`MessageRelay::receive`] on `inbound`; the
    /// requester or appellant is the relay's current message sender, and its
    /// final ruling is forwarded back to it. Returns the created dispute.
    ///
    /// # Errors
    ///
    /// [`RelayError::NoActiveMessage`] outside message processing,
    /// [`RelayError::Codec`] for a malformed payload,
    /// [`RelayError::UnexpectedMessage`] for a ruling message, and
    /// [`RelayError::Arbitration`] when the authority refuses.
    pub fn handle(
        &self,
        inbound: &MessageRelay,
        authority: &mut ArbitrationAuthority,
        payload: &[u8],
    ) -> Result<DisputeId, RelayError> {
        let sender = inbound.message_sender()?;
        let message = ArbitrationMessage::decode(payload)?;
        let kind = message.kind();
        let party = Arc::new(RulingForwarder::new(
            self.account.clone(),
            sender.clone(),
            self.outbound.clone(),
        ));
        let id = match message {
            ArbitrationMessage::RequestArbitration {
                choices,
                extra_data,
                payment,
            } => authority.create_dispute(party, choices, &extra_data, payment)?,
            ArbitrationMessage::AppealNotification {
                dispute_id,
                extra_data,
                payment,
            } => authority.appeal(party, dispute_id, &extra_data, payment)?,
            ArbitrationMessage::RulingRelayed { .. } => {
                tracing::debug!(sender = %sender, kind, "ruling message sent to authority endpoint");
                return Err(RelayError::UnexpectedMessage { kind });
            }
        };
        tracing::info!(sender = %sender, kind, dispute_id = %id, "remote request accepted");
        Ok(id)
    }
}
