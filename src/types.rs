//! Public types for the diagstore API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// Identity and position types
pub use diagstore_core::{Guid, RangeEnd, Revision, SuiteKey};

// Diagnostic content
pub use diagstore_core::{ContentHash, DiagnosticPayload};

// Ranges and insert results
pub use diagstore_core::{Candidate, DiagnosticRange, DiagnosticRef, GuidMapping};

// Collaborator traits, for plugging in other stores
pub use diagstore_core::{RangeStore, RevisionIndex};

// Default in-memory collaborators
pub use diagstore_storage::{InMemoryRevisionIndex, ShardedRangeStore};

// Engine configuration and reports
pub use diagstore_engine::{EngineConfig, RepairReport};
