//! Relay configuration.

use arbiter_core::ValidationError;
use serde::{Deserialize, Serialize};

/// Parameters of one domain's bridge endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Name of the local execution domain.
    pub domain_id: String,
    /// Largest payload cost a single outbound message may have.
    pub max_gas_per_tx: u64,
}

impl RelayConfig {
    /// Check ranges.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidConfig`] for an empty or blank domain id or
    /// a zero budget.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.domain_id.trim().is_empty() {
            return Err(ValidationError::InvalidConfig {
                field: "domain_id".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.max_gas_per_tx == 0 {
            return Err(ValidationError::InvalidConfig {
                field: "max_gas_per_tx".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}
