//! Convenient imports for diagstore.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```
//! use diagstore::prelude::*;
//!
//! let store = DiagnosticStore::ephemeral();
//! assert!(store.names(&SuiteKey::new("M/B/S")).unwrap().is_empty());
//! ```

// Main entry point
pub use crate::database::{DiagnosticStore, DiagnosticStoreBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Core types
pub use crate::types::{Candidate, DiagnosticPayload, DiagnosticRange, Guid, RangeEnd, Revision, SuiteKey};

// Configuration
pub use crate::types::EngineConfig;

// Re-export serde_json for convenience
pub use serde_json::json;
