//! Range engine for diagstore
//!
//! This crate maintains the range partition of every `(suite, name)`:
//! - RangeInserter: entry point for new observations
//! - FastAppendStrategy: in-order arrivals touching only the open range
//! - OutOfOrderInserter: late arrivals that split or nudge stored ranges
//! - Deduplicator: content equality via content hashes
//! - ConsistencyRepair: rebuilds damaged partitions
//! - DiagnosticReader: point and window queries
//!
//! Storage and the revision oracle are injected as trait objects; see
//! [`diagstore_core::RangeStore`] and [`diagstore_core::RevisionIndex`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dedup;
pub mod fast_append;
pub mod inserter;
pub mod out_of_order;
pub mod reader;
pub mod repair;
pub mod view;

pub use config::{EngineConfig, DEFAULT_QUERY_LIMIT};
pub use dedup::Deduplicator;
pub use fast_append::FastAppendStrategy;
pub use inserter::{Placement, RangeInserter};
pub use out_of_order::OutOfOrderInserter;
pub use reader::DiagnosticReader;
pub use repair::{ConsistencyRepair, RepairReport};
pub use view::{Normalized, RangeSet, WritePlan};
