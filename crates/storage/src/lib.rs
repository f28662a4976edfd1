//! Storage layer for diagstore
//!
//! This crate implements the in-memory collaborators the engine talks to:
//! - ShardedRangeStore: DashMap-by-suite storage of diagnostic ranges
//! - InMemoryRevisionIndex: per-suite ordered set of observed revisions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod revisions;
pub mod sharded;

pub use revisions::InMemoryRevisionIndex;
pub use sharded::{Shard, ShardedRangeStore};
