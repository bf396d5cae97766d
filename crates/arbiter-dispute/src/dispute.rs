//! # Dispute Records
//!
//! The dispute record, its status machine, and the append-only registry
//! that owns every record.
//!
//! ## Status Graph
//!
//! ```text
//! Waiting ──provisional ruling──▶ Appealable ──window elapsed──▶ Solved
//!    │                                                              ▲
//!    └───────────── appeal chain finalized (child ruling) ──────────┘
//! ```
//!
//! Status only ever moves forward. [`DisputeStatus::rank`] gives the order
//! and the registry refuses any write that would lower it.
//!
//! ## Design Choice: Validated Enum over Typestate
//!
//! Disputes live in one indexable collection and their status is only known
//! at runtime, so the status is a plain enum checked by each transition
//! method. Invalid transitions come back as [`ArbitrationError`] values
//! before anything is written.

use arbiter_core::{AccountId, Amount};
use serde::{Deserialize, Serialize};

use crate::error::ArbitrationError;

// ── Identifiers ────────────────────────────────────────────────────────

/// A sequential dispute identifier, assigned at creation and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisputeId(u64);

impl DisputeId {
    /// Wrap a raw index.
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// The raw index into the registry.
    pub const fn index(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DisputeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dispute:{}", self.0)
    }
}

/// A ruling value. `0` means "no decision" and is a valid, explicit outcome.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Ruling(u64);

impl Ruling {
    /// The explicit abstain/no-decision outcome.
    pub const NO_DECISION: Ruling = Ruling(0);

    /// Wrap a raw ruling value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw ruling value.
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ruling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Status ─────────────────────────────────────────────────────────────

/// Lifecycle status of a dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisputeStatus {
    /// Created, no ruling yet.
    Waiting,
    /// A provisional ruling exists and may still be appealed.
    Appealable,
    /// Final. Terminal state.
    Solved,
}

impl DisputeStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Appealable => "APPEALABLE",
            Self::Solved => "SOLVED",
        }
    }

    /// Position along `Waiting → Appealable → Solved`.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Waiting => 0,
            Self::Appealable => 1,
            Self::Solved => 2,
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Solved)
    }
}

impl std::fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── The Dispute ────────────────────────────────────────────────────────

/// One arbitration request.
///
/// ## Security Invariant
///
/// `fee_paid` and `choice_count` are fixed at creation. Once `status` is
/// [`Solved`](DisputeStatus::Solved) neither `status` nor `ruling` changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispute {
    /// Sequential identifier.
    pub id: DisputeId,
    /// The party that created the dispute and receives the ruling callback.
    pub requester: AccountId,
    /// Upper bound of valid ruling values.
    pub choice_count: u64,
    /// Amount escrowed at creation.
    pub fee_paid: Amount,
    /// Current, possibly provisional, outcome.
    pub ruling: Ruling,
    /// Lifecycle status.
    pub status: DisputeStatus,
}

impl Dispute {
    /// Whether `ruling` lies in `[0, choice_count]`.
    pub fn accepts(&self, ruling: Ruling) -> bool {
        ruling.value() <= self.choice_count
    }

    fn require_not_solved(&self) -> Result<(), ArbitrationError> {
        if self.status.is_terminal() {
            return Err(ArbitrationError::AlreadySolved {
                dispute_id: self.id,
            });
        }
        Ok(())
    }
}

// ── Registry ───────────────────────────────────────────────────────────

/// Append-only collection of disputes, indexed by [`DisputeId`].
///
/// Records are never removed; the id of a record is its position.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DisputeRegistry {
    disputes: Vec<Dispute>,
}

impl DisputeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next allocation will receive.
    pub fn next_id(&self) -> DisputeId {
        DisputeId::new(self.disputes.len() as u64)
    }

    /// Append a new dispute in [`Waiting`](DisputeStatus::Waiting).
    pub fn allocate(
        &mut self,
        requester: AccountId,
        choice_count: u64,
        fee_paid: Amount,
    ) -> DisputeId {
        let id = self.next_id();
        self.disputes.push(Dispute {
            id,
            requester,
            choice_count,
            fee_paid,
            ruling: Ruling::NO_DECISION,
            status: DisputeStatus::Waiting,
        });
        id
    }

    /// Look up a dispute.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::NotFound`] for an unknown id.
    pub fn get(&self, id: DisputeId) -> Result<&Dispute, ArbitrationError> {
        usize::try_from(id.index())
            .ok()
            .and_then(|i| self.disputes.get(i))
            .ok_or(ArbitrationError::NotFound(id))
    }

    fn get_mut(&mut self, id: DisputeId) -> Result<&mut Dispute, ArbitrationError> {
        usize::try_from(id.index())
            .ok()
            .and_then(|i| self.disputes.get_mut(i))
            .ok_or(ArbitrationError::NotFound(id))
    }

    /// Transition Waiting → Appealable, storing the provisional ruling.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::AlreadySolved`] for a final dispute,
    /// [`ArbitrationError::InvalidRuling`] for an out-of-range ruling, and
    /// [`ArbitrationError::NotAppealable`] if a provisional ruling already exists.
    pub fn mark_appealable(
        &mut self,
        id: DisputeId,
        ruling: Ruling,
    ) -> Result<(), ArbitrationError> {
        let dispute = self.get_mut(id)?;
        dispute.require_not_solved()?;
        if !dispute.accepts(ruling) {
            return Err(ArbitrationError::InvalidRuling {
                dispute_id: id,
                ruling,
                choices: dispute.choice_count,
            });
        }
        if dispute.status != DisputeStatus::Waiting {
            return Err(ArbitrationError::NotAppealable {
                dispute_id: id,
                reason: "a provisional ruling was already recorded",
            });
        }
        dispute.ruling = ruling;
        dispute.status = DisputeStatus::Appealable;
        Ok(())
    }

    /// Transition to Solved with the given ruling.
    ///
    /// Used both for the timeout path (with the stored provisional ruling)
    /// and for appeal-chain finality (with the child's ruling).
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::AlreadySolved`] for a final dispute and
    /// [`ArbitrationError::InvalidRuling`] for an out-of-range ruling.
    pub fn mark_solved(
        &mut self,
        id: DisputeId,
        ruling: Ruling,
    ) -> Result<&Dispute, ArbitrationError> {
        let dispute = self.get_mut(id)?;
        dispute.require_not_solved()?;
        if !dispute.accepts(ruling) {
            return Err(ArbitrationError::InvalidRuling {
                dispute_id: id,
                ruling,
                choices: dispute.choice_count,
            });
        }
        dispute.ruling = ruling;
        dispute.status = DisputeStatus::Solved;
        Ok(dispute)
    }

    /// Number of disputes ever created.
    pub fn len(&self) -> usize {
        self.disputes.len()
    }

    /// Whether no dispute was ever created.
    pub fn is_empty(&self) -> bool {
        self.disputes.is_empty()
    }

    /// Iterate over every dispute in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Dispute> {
        self.disputes.iter()
    }
}
