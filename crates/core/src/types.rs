//! Core identity and position types
//!
//! This module defines the fundamental types used throughout the system:
//! - [`Revision`]: ordinal of one measurement point
//! - [`RangeEnd`]: inclusive end of a stored range, possibly unbounded
//! - [`SuiteKey`]: the test suite a diagnostic belongs to
//! - [`Guid`]: unique identifier of a diagnostic instance

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordinal identifier of one measurement point (e.g. a commit position)
///
/// Revisions are totally ordered, but arrival order at the store is not
/// guaranteed to match revision order.
pub type Revision = i64;

/// Inclusive end of a diagnostic range
///
/// Ordered so that every bounded end sorts before [`RangeEnd::Unbounded`].
///
/// # Examples
///
/// ```
/// use diagstore_core::types::RangeEnd;
///
/// assert!(RangeEnd::At(i64::MAX) < RangeEnd::Unbounded);
/// assert!(RangeEnd::At(9) < RangeEnd::At(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RangeEnd {
    /// Last revision (inclusive) the range covers
    At(Revision),
    /// The range is the current value and extends to infinity
    Unbounded,
}

impl RangeEnd {
    /// Check if this end is unbounded
    pub fn is_unbounded(&self) -> bool {
        matches!(self, RangeEnd::Unbounded)
    }

    /// The bounded revision, if any
    pub fn revision(&self) -> Option<Revision> {
        match self {
            RangeEnd::At(rev) => Some(*rev),
            RangeEnd::Unbounded => None,
        }
    }

    /// Check if `revision` is at or before this end
    #[inline]
    pub fn covers(&self, revision: Revision) -> bool {
        match self {
            RangeEnd::At(end) => revision <= *end,
            RangeEnd::Unbounded => true,
        }
    }

    /// First revision after this end, `None` when unbounded
    pub fn successor(&self) -> Option<Revision> {
        self.revision().map(|end| end + 1)
    }
}

impl std::fmt::Display for RangeEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeEnd::At(rev) => write!(f, "{}", rev),
            RangeEnd::Unbounded => write!(f, "inf"),
        }
    }
}

/// Key of a test suite
///
/// A suite is a named series of related performance measurements, identified
/// by its test-path prefix (`master/bot/benchmark`). All diagnostic ranges and
/// all known revisions are partitioned by suite.
///
/// # Examples
///
/// ```
/// use diagstore_core::types::SuiteKey;
///
/// let suite = SuiteKey::new("ChromiumPerf/linux-perf/speedometer2");
/// assert_eq!(suite.as_str(), "ChromiumPerf/linux-perf/speedometer2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SuiteKey(String);

impl SuiteKey {
    /// Create a suite key from its test path
    pub fn new(path: impl Into<String>) -> Self {
        SuiteKey(path.into())
    }

    /// Get the test path
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SuiteKey {
    fn from(path: &str) -> Self {
        SuiteKey::new(path)
    }
}

impl From<String> for SuiteKey {
    fn from(path: String) -> Self {
        SuiteKey(path)
    }
}

impl std::fmt::Display for SuiteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of a diagnostic instance
///
/// Guids are minted by the uploader for every diagnostic it sends. After
/// deduplication most of them are discarded in favour of the guid of the row
/// that already stores the same content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Guid(Uuid);

impl Guid {
    /// Create a new random Guid using UUID v4
    ///
    /// # Examples
    ///
    /// ```
    /// use diagstore_core::types::Guid;
    ///
    /// let a = Guid::new();
    /// let b = Guid::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Guid(Uuid::new_v4())
    }

    /// Create a Guid from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Guid(Uuid::from_bytes(bytes))
    }

    /// Get raw bytes representation
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Parse a Guid from its hyphenated string form
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Guid)
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
