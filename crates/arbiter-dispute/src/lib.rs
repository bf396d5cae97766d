#![deny(missing_docs)]

//! # arbiter-dispute — Dispute Arbitration Authority
//!
//! A single arbitrator issues binding rulings on disputes raised by
//! requesters, with a timed appeal window between a provisional ruling and
//! finality:
//!
//! - **Fee** ([`fee`]): the owner-settable arbitration price and the
//!   derived appeal cost.
//!
//! - **Dispute** ([`dispute`]): dispute records, the forward-only status
//!   machine, and the append-only registry.
//!
//! - **Appeal** ([`appeal`]): per-dispute appeal windows, the lazy timeout
//!   gate, and parent/child links created by appeals.
//!
//! - **Authority** ([`authority`]): the composed public operations.
//!
//! - **Seams** ([`seams`]): the [`Arbitrable`] callback and the [`FeeSink`]
//!   payout target, with in-memory implementations.
//!
//! - **Events** ([`events`]) and **Config** ([`config`]).
//!
//! ## Design Principles
//!
//! 1. **No hidden time.** The authority reads time only from an injected
//!    [`Clock`](arbiter_core::Clock). Deadlines are evaluated lazily when an
//!    operation is invoked; nothing fires on its own.
//!
//! 2. **Explicit actors.** Every privileged operation takes the acting
//!    [`AccountId`](arbiter_core::AccountId) as an argument.
//!
//! 3. **Fail before write.** A failed operation leaves no trace: no id is
//!    consumed, no window is opened, no event is recorded.

pub mod appeal;
pub mod authority;
pub mod config;
pub mod dispute;
pub mod error;
pub mod events;
pub mod fee;
pub mod seams;

// Re-export primary types for ergonomic imports.

// Error types
pub use error::ArbitrationError;

// Records and lifecycle
pub use appeal::{appeal_window_elapsed, AppealScheduler, AppealWindow};
pub use dispute::{Dispute, DisputeId, DisputeRegistry, DisputeStatus, Ruling};
pub use fee::{FeeLedger, APPEAL_COST_MULTIPLIER};

// Authority
pub use authority::ArbitrationAuthority;
pub use config::{AuthorityConfig, MAX_APPEAL_TIMEOUT_SECS};
pub use events::ArbitrationEvent;

// Collaborators
pub use seams::{Arbitrable, FeeSink, InMemoryFeeSink, PayoutError, RecordingArbitrable};
