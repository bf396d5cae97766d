#![deny(missing_docs)]

//! # arbiter-relay — Cross-Domain Message Relay
//!
//! Carries arbitration traffic between two independent execution domains:
//!
//! - **Gateway** ([`gateway`]): the [`BridgeGateway`] transport seam and the
//!   in-process [`InMemoryBridge`].
//!
//! - **Relay** ([`relay`]): [`MessageRelay`], which enforces the payload
//!   budget outbound and scopes the remote sender identity inbound.
//!
//! - **Message** ([`message`]): the JSON codec both domains speak.
//!
//! - **Forwarder** ([`forwarder`]): adapters that let a remote party act as
//!   a dispute requester or appellant.
//!
//! Delivery and ordering guarantees belong to the gateway. The relay keeps
//! no receipts.

pub mod config;
pub mod error;
pub mod forwarder;
pub mod gateway;
pub mod message;
pub mod relay;

pub use config::RelayConfig;
pub use error::{BridgeError, RelayError};
pub use forwarder::{ArbitrationEndpoint, RulingForwarder};
pub use gateway::{BridgeGateway, Envelope, InMemoryBridge, MessageId, RelayMessage};
pub use message::ArbitrationMessage;
pub use relay::{payload_cost, MessageRelay};
