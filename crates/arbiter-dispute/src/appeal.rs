//! # Appeal Windows
//!
//! One [`AppealWindow`] per dispute, opened lazily when the first
//! provisional ruling is recorded. The scheduler also keeps the reverse
//! mapping from an appeal-spawned child dispute back to its parent.
//!
//! There is no timer. Whether a window has elapsed is decided by
//! [`appeal_window_elapsed`] each time someone asks, so a dispute nobody
//! calls about simply stays where it is.

use std::collections::BTreeMap;

use arbiter_core::Timestamp;
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::dispute::DisputeId;
use crate::error::ArbitrationError;

/// Timing state for one dispute's appeal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppealWindow {
    /// When the provisional ruling was recorded. Never changes once set.
    pub ruling_timestamp: Timestamp,
    /// The dispute spawned by an appeal, if one was filed. Set at most once.
    pub child_dispute_id: Option<DisputeId>,
}

/// Whether the window opened at `start` has strictly passed `time_out` at `now`.
///
/// The boundary instant `now == start + time_out` still belongs to the
/// window: it can be appealed but not finalized.
pub fn appeal_window_elapsed(now: Timestamp, start: Timestamp, time_out: Duration) -> bool {
    now.since(&start) > time_out
}

/// Owns every [`AppealWindow`], keyed by dispute id.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppealScheduler {
    windows: BTreeMap<DisputeId, AppealWindow>,
    parents: BTreeMap<DisputeId, DisputeId>,
}

impl AppealScheduler {
    /// An empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the window for `id` at `now`.
    ///
    /// Opening is idempotent: an existing window keeps its original start.
    pub fn open(&mut self, id: DisputeId, now: Timestamp) -> &AppealWindow {
        self.windows.entry(id).or_insert(AppealWindow {
            ruling_timestamp: now,
            child_dispute_id: None,
        })
    }

    /// The window for `id`, if one was ever opened.
    pub fn window(&self, id: DisputeId) -> Option<&AppealWindow> {
        self.windows.get(&id)
    }

    /// `(start, start + time_out)` for `id`.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::NotAppealable`] if no window exists and
    /// [`ArbitrationError::WindowOverflow`] if the end is unrepresentable.
    pub fn period(
        &self,
        id: DisputeId,
        time_out: Duration,
    ) -> Result<(Timestamp, Timestamp), ArbitrationError> {
        let window = self.windows.get(&id).ok_or(ArbitrationError::NotAppealable {
            dispute_id: id,
            reason: "no provisional ruling has been recorded",
        })?;
        let start = window.ruling_timestamp;
        let end = start
            .checked_add(time_out)
            .ok_or(ArbitrationError::WindowOverflow(id))?;
        Ok((start, end))
    }

    /// Whether the window for `id` exists and has elapsed at `now`.
    pub fn has_elapsed(&self, id: DisputeId, now: Timestamp, time_out: Duration) -> bool {
        self.windows
            .get(&id)
            .is_some_and(|w| appeal_window_elapsed(now, w.ruling_timestamp, time_out))
    }

    /// Check that `parent` can take an appeal at `now`.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::NotAppealable`] if there is no window, the window
    /// already has a child, or the window has elapsed.
    pub fn check_appealable(
        &self,
        parent: DisputeId,
        now: Timestamp,
        time_out: Duration,
    ) -> Result<(), ArbitrationError> {
        let window = self.windows.get(&parent).ok_or(ArbitrationError::NotAppealable {
            dispute_id: parent,
            reason: "no provisional ruling has been recorded",
        })?;
        if window.child_dispute_id.is_some() {
            return Err(ArbitrationError::NotAppealable {
                dispute_id: parent,
                reason: "already appealed; further appeals must target the child dispute",
            });
        }
        if appeal_window_elapsed(now, window.ruling_timestamp, time_out) {
            return Err(ArbitrationError::NotAppealable {
                dispute_id: parent,
                reason: "the appeal period has ended",
            });
        }
        Ok(())
    }

    /// Link `child` to `parent` in both directions.
    ///
    /// Callers run [`check_appealable`](Self::check_appealable) first; a
    /// parent that already has a child keeps it and the call is refused.
    pub fn attach_child(
        &mut self,
        parent: DisputeId,
        child: DisputeId,
    ) -> Result<(), ArbitrationError> {
        let window = self
            .windows
            .get_mut(&parent)
            .ok_or(ArbitrationError::NotAppealable {
                dispute_id: parent,
                reason: "no provisional ruling has been recorded",
            })?;
        if window.child_dispute_id.is_some() {
            return Err(ArbitrationError::NotAppealable {
                dispute_id: parent,
                reason: "already appealed; further appeals must target the child dispute",
            });
        }
        window.child_dispute_id = Some(child);
        self.parents.insert(child, parent);
        Ok(())
    }

    /// The dispute whose appeal spawned `child`.
    pub fn parent_of(&self, child: DisputeId) -> Option<DisputeId> {
        self.parents.get(&child).copied()
    }
}
