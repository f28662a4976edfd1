//! Core types for diagstore
//!
//! This crate defines the data model shared by every layer:
//! - [`SuiteKey`], [`Guid`], [`Revision`], [`RangeEnd`]: identity and position
//! - [`DiagnosticPayload`]: diagnostic content with a precomputed content hash
//! - [`DiagnosticRange`]: one stored row, a payload valid over a revision span
//! - [`RangeStore`] / [`RevisionIndex`]: the external collaborators the engine talks to
//! - [`Error`]: the error type used below the facade

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod payload;
pub mod range;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use payload::{ContentHash, DiagnosticPayload};
pub use range::{Candidate, DiagnosticRange, DiagnosticRef, GuidMapping};
pub use traits::{RangeStore, RevisionIndex};
pub use types::{Guid, RangeEnd, Revision, SuiteKey};
