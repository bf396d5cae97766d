#![deny(missing_docs)]

//! # arbiter-core — Foundational Types for the Arbiter Stack
//!
//! This crate defines the types that every other crate in the workspace
//! depends on. It has no internal crate dependencies, only `serde`,
//! `thiserror`, `chrono`, and `parking_lot` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** An [`AccountId`] is not a
//!    `String` and an [`Amount`] is not a `u128`. Identities are validated
//!    at construction and on deserialization.
//!
//! 2. **Time flows through [`Clock`].** Nothing in the stack calls
//!    `Utc::now()` directly outside [`SystemClock`]. Deadlines are decided
//!    against whatever clock the caller injects, which is how the timeout
//!    gates are exercised in tests with [`ManualClock`].
//!
//! 3. **Checked arithmetic on amounts.** Fee multiples are computed with
//!    [`Amount::checked_mul`]; overflow is an error, never a wrap.

pub mod amount;
pub mod error;
pub mod identity;
pub mod temporal;

pub use amount::Amount;
pub use error::ValidationError;
pub use identity::AccountId;
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
