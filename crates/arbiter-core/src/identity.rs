//! # Account Identities
//!
//! Every actor the stack deals with is named by an [`AccountId`]: dispute
//! requesters, the ruling authority, the fee owner, relay endpoints.
//! Authorization is an explicit equality check between the `actor` argument
//! of an operation and an identity stored in configuration; there is no
//! ambient "current caller".

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum accepted length of an account identity, in bytes.
pub const MAX_ACCOUNT_ID_LEN: usize = 128;

/// An opaque, validated account identity.
///
/// # Validation
///
/// - Must be non-empty and at most [`MAX_ACCOUNT_ID_LEN`] bytes
/// - Must not contain whitespace or control characters
///
/// Deserialization routes through [`AccountId::new`], so an invalid value
/// in a configuration file is rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AccountId(String);

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl AccountId {
    /// Create an account identity, validating its format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAccountId`] if the value is empty,
    /// too long, or contains whitespace or control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let well_formed = !s.is_empty()
            && s.len() <= MAX_ACCOUNT_ID_LEN
            && !s.chars().any(|c| c.is_whitespace() || c.is_control());
        if !well_formed {
            return Err(ValidationError::InvalidAccountId(s));
        }
        Ok(Self(s))
    }

    /// Access the identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
