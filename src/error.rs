//! Unified error types for diagstore.
//!
//! This module provides a clean error type that wraps internal errors
//! and presents a consistent interface to users.

use diagstore_core::SuiteKey;
use thiserror::Error;

/// All diagstore errors.
///
/// This is the canonical error type for all store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input (bad payload, empty name)
    #[error("validation error: {0}")]
    Validation(String),

    /// Stored ranges of a name do not form a partition
    #[error("inconsistent ranges for {suite}/{name}: {reason}")]
    Consistency {
        /// Suite of the damaged name
        suite: SuiteKey,
        /// Diagnostic name
        name: String,
        /// What is wrong with the rows
        reason: String,
    },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Storage or revision index failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for diagstore operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is retryable.
    ///
    /// Storage failures leave stored rows untouched and may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    /// Check if this is an input validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Check if this is a consistency error.
    pub fn is_consistency(&self) -> bool {
        matches!(self, Error::Consistency { .. })
    }

    /// Check if this is a serious/unrecoverable error.
    pub fn is_serious(&self) -> bool {
        matches!(self, Error::Internal(_))
    }
}

// Convert from internal core errors
impl From<diagstore_core::Error> for Error {
    fn from(e: diagstore_core::Error) -> Self {
        use diagstore_core::Error as CoreError;
        match e {
            CoreError::Validation(msg) => Error::Validation(msg),
            CoreError::Consistency { suite, name, reason } => {
                Error::Consistency { suite, name, reason }
            }
            CoreError::Storage(msg) => Error::Storage(msg),
            CoreError::Serialization(msg) => Error::Serialization(msg),
            CoreError::Config(msg) => Error::Config(msg),
            CoreError::Internal(msg) => Error::Internal(msg),
        }
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
