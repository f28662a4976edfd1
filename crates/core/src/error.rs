//! Error types for the diagnostic range store
//!
//! Errors fall into three groups:
//! - per-candidate problems (`Validation`) that skip one candidate
//! - store-shape problems (`Consistency`) that are repaired around
//! - I/O-level problems (`Storage`) that abort the call and are retried wholesale

use crate::types::SuiteKey;
use thiserror::Error;

/// Errors raised below the facade
#[derive(Debug, Error)]
pub enum Error {
    /// A candidate or stored payload is malformed
    #[error("validation error: {0}")]
    Validation(String),

    /// Stored ranges for a name overlap, leave gaps, or repeat content
    #[error("consistency error for {suite}/{name}: {reason}")]
    Consistency {
        /// Suite whose rows are inconsistent
        suite: SuiteKey,
        /// Diagnostic name whose rows are inconsistent
        name: String,
        /// What the normalization had to fix
        reason: String,
    },

    /// Range store or revision index failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Payload (de)serialization failure
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration
    #[error("config error: {0}")]
    Config(String),

    /// Bug or violated internal invariant
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for diagstore operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if retrying the whole call may succeed
    ///
    /// Only store failures are retryable; every insert branch is idempotent,
    /// so a retry reproduces the same state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
