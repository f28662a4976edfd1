//! Diagnostic ranges
//!
//! A [`DiagnosticRange`] is the stored unit: one diagnostic value for one
//! `(suite, name)` over the inclusive revision span `[start, end]`.
//!
//! For every `(suite, name)` the stored ranges form a partition:
//! - pairwise non-overlapping
//! - contiguous when sorted by start (`next.start == prev.end + 1`)
//! - exactly one range is [`RangeEnd::Unbounded`], and it is the last
//! - adjacent ranges never carry equal payloads

use crate::error::{Error, Result};
use crate::payload::DiagnosticPayload;
use crate::types::{Guid, RangeEnd, Revision, SuiteKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One stored diagnostic value and the revisions it applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRange {
    /// Suite the diagnostic belongs to
    pub suite: SuiteKey,
    /// Diagnostic name (e.g. `owners`, `bugComponents`)
    pub name: String,
    /// First revision covered
    pub start: Revision,
    /// Last revision covered
    pub end: RangeEnd,
    /// Diagnostic content
    pub payload: DiagnosticPayload,
    /// Row identity
    pub guid: Guid,
}

impl DiagnosticRange {
    /// Create a range `[start, end]`
    pub fn new(
        suite: SuiteKey,
        name: impl Into<String>,
        start: Revision,
        end: RangeEnd,
        payload: DiagnosticPayload,
        guid: Guid,
    ) -> Self {
        Self {
            suite,
            name: name.into(),
            start,
            end,
            payload,
            guid,
        }
    }

    /// Create the current value `[start, inf)` from a candidate
    pub fn open(suite: SuiteKey, start: Revision, candidate: &Candidate) -> Self {
        Self::new(
            suite,
            candidate.name.clone(),
            start,
            RangeEnd::Unbounded,
            candidate.payload.clone(),
            candidate.guid,
        )
    }

    /// Check if the range covers `revision`
    #[inline]
    pub fn contains(&self, revision: Revision) -> bool {
        self.start <= revision && self.end.covers(revision)
    }

    /// Check if this range is the current (unbounded) value
    pub fn is_open(&self) -> bool {
        self.end.is_unbounded()
    }

    /// Check that the row can take part in a partition
    ///
    /// The payload must be valid and the span non-empty.
    pub fn validate(&self) -> Result<()> {
        if let RangeEnd::At(end) = self.end {
            if end < self.start {
                return Err(Error::Validation(format!(
                    "range {} of {}/{} ends at {} before it starts at {}",
                    self.guid, self.suite, self.name, end, self.start
                )));
            }
        }
        self.payload.validate()
    }

    /// Reference to this row's identity and content
    pub fn to_ref(&self) -> DiagnosticRef {
        DiagnosticRef {
            guid: self.guid,
            payload: self.payload.clone(),
        }
    }

    /// Check if two ranges describe the same span and content
    ///
    /// Ignores the guid, so a row re-created under a new guid compares equal.
    pub fn same_shape(&self, other: &DiagnosticRange) -> bool {
        self.name == other.name
            && self.start == other.start
            && self.end == other.end
            && self.payload == other.payload
    }
}

impl std::fmt::Display for DiagnosticRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}, {}]", self.name, self.start, self.end)
    }
}

/// A newly observed diagnostic waiting to be merged into the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Diagnostic name
    pub name: String,
    /// Diagnostic content
    pub payload: DiagnosticPayload,
    /// Guid minted by the uploader
    pub guid: Guid,
}

impl Candidate {
    /// Create a candidate
    pub fn new(name: impl Into<String>, payload: DiagnosticPayload, guid: Guid) -> Self {
        Self {
            name: name.into(),
            payload,
            guid,
        }
    }

    /// Create a candidate with a freshly minted guid
    pub fn with_new_guid(name: impl Into<String>, payload: DiagnosticPayload) -> Self {
        Self::new(name, payload, Guid::new())
    }

    /// Check that the candidate can be inserted
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Validation(format!(
                "candidate {} has an empty name",
                self.guid
            )));
        }
        self.payload.validate()
    }
}

/// Identity and content of a stored row
///
/// Returned to the ingestion caller so it can replace references to a
/// freshly minted guid with the guid of the row that already stores the
/// same content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRef {
    /// Guid of the stored row
    pub guid: Guid,
    /// Content of the stored row
    pub payload: DiagnosticPayload,
}

/// Candidate guid -> stored row that now holds its content
pub type GuidMapping = HashMap<Guid, DiagnosticRef>;
