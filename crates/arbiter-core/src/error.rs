//! # Validation Errors
//!
//! Errors raised when a domain primitive or a configuration value fails its
//! construction-time checks. Each variant carries the rejected input so that
//! operators can diagnose misconfiguration without guesswork.

use thiserror::Error;

/// Validation errors for domain primitive newtypes and configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Account identity is empty, too long, or contains whitespace/control characters.
    #[error("invalid account id: \"{0}\" (expected 1-128 printable characters without whitespace)")]
    InvalidAccountId(String),

    /// A configuration field holds a value outside its accepted range.
    #[error("invalid configuration field {field}: {reason}")]
    InvalidConfig {
        /// The offending field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}
