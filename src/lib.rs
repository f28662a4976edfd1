//! # diagstore
//!
//! Range-partitioned storage for performance-test diagnostics.
//!
//! Diagnostics (owners, bug components, grouping keys) change rarely while
//! the measurements they describe arrive for every revision. diagstore keeps
//! one row per distinct value together with the revision range it applies to,
//! and merges new observations into those ranges whether they arrive in
//! revision order or not.
//!
//! ## Quick Start
//!
//! ```
//! use diagstore::prelude::*;
//!
//! let store = DiagnosticStore::ephemeral();
//! let suite = SuiteKey::new("ChromiumPerf/linux-perf/speedometer2");
//! let owners = |who: &str| DiagnosticPayload::new(json!({"type": "GenericSet", "values": [who]}));
//!
//! store.ingest(&suite, 100, &[Candidate::with_new_guid("owners", owners("a@x.org"))])?;
//! store.ingest(&suite, 200, &[Candidate::with_new_guid("owners", owners("b@x.org"))])?;
//!
//! let at_150 = store.value_at(&suite, "owners", 150)?.unwrap();
//! assert_eq!(at_150.payload, owners("a@x.org"));
//! # Ok::<(), diagstore::Error>(())
//! ```
//!
//! ## Crates
//!
//! - `diagstore-core`: data model, content hashing, collaborator traits
//! - `diagstore-storage`: in-memory range store and revision index
//! - `diagstore-engine`: insertion strategies, repair, and queries

#![warn(missing_docs)]

mod database;
mod error;
mod types;

pub mod prelude;

// Re-export main entry points
pub use database::{DiagnosticStore, DiagnosticStoreBuilder};
pub use error::{Error, Result};

// Re-export types
pub use types::*;
