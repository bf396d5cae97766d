//! # Authority Configuration
//!
//! Everything the authority needs at construction: who owns the price, who
//! may rule, the starting price, and the appeal window length. Loaded from
//! YAML by the CLI; validated here.

use arbiter_core::{AccountId, Amount, ValidationError};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Upper bound on the appeal window, in seconds (ten years).
pub const MAX_APPEAL_TIMEOUT_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Construction parameters for an [`ArbitrationAuthority`](crate::ArbitrationAuthority).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorityConfig {
    /// Identity allowed to change the arbitration price.
    pub owner: AccountId,
    /// Identity allowed to give rulings; receives escrowed fees.
    pub arbitrator: AccountId,
    /// Initial arbitration price.
    pub arbitration_price: Amount,
    /// Appeal window length in seconds.
    pub appeal_timeout_secs: u64,
}

impl AuthorityConfig {
    /// Check ranges.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidConfig`] if the appeal timeout is zero or
    /// longer than [`MAX_APPEAL_TIMEOUT_SECS`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.appeal_timeout_secs == 0 {
            return Err(ValidationError::InvalidConfig {
                field: "appeal_timeout_secs".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.appeal_timeout_secs > MAX_APPEAL_TIMEOUT_SECS {
            return Err(ValidationError::InvalidConfig {
                field: "appeal_timeout_secs".to_string(),
                reason: format!("must not exceed {MAX_APPEAL_TIMEOUT_SECS}"),
            });
        }
        Ok(())
    }

    /// The appeal window as a duration, clamped to [`MAX_APPEAL_TIMEOUT_SECS`].
    pub fn time_out(&self) -> Duration {
        Duration::seconds(self.appeal_timeout_secs.min(MAX_APPEAL_TIMEOUT_SECS) as i64)
    }
}
