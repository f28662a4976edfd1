//! External collaborator traits
//!
//! The engine never owns storage. It reads and writes diagnostic rows through
//! a [`RangeStore`] and asks a [`RevisionIndex`] how far a freshly inserted
//! value may extend. Both are `Send + Sync` so one instance can serve many
//! suites from many threads; per-suite single-writer ordering is the caller's
//! responsibility.

use crate::error::Result;
use crate::range::DiagnosticRange;
use crate::types::{Guid, Revision, SuiteKey};

/// Durable keyed storage of diagnostic ranges
///
/// Rows are addressed by `(suite, guid)` and scanned by `(suite, name)`.
pub trait RangeStore: Send + Sync {
    /// All rows stored for `(suite, name)`, ordered by start revision
    ///
    /// Returns an empty vector when the name was never observed.
    fn query(&self, suite: &SuiteKey, name: &str) -> Result<Vec<DiagnosticRange>>;

    /// Every row stored for a suite, ordered by name then start revision
    fn scan_suite(&self, suite: &SuiteKey) -> Result<Vec<DiagnosticRange>>;

    /// Distinct diagnostic names stored for a suite, sorted
    fn names(&self, suite: &SuiteKey) -> Result<Vec<String>>;

    /// The row identified by `(suite, guid)`, if any
    fn get(&self, suite: &SuiteKey, guid: &Guid) -> Result<Option<DiagnosticRange>>;

    /// Insert or replace the row identified by `(range.suite, range.guid)`
    fn put(&self, range: DiagnosticRange) -> Result<()>;

    /// Remove a row; deleting a missing row is not an error
    fn delete(&self, suite: &SuiteKey, guid: &Guid) -> Result<()>;

    /// Apply one name's puts and deletes as a single logical write
    ///
    /// The default applies them one by one; stores that can do better
    /// (a single lock, a single transaction) should override it.
    fn apply_batch(
        &self,
        suite: &SuiteKey,
        puts: Vec<DiagnosticRange>,
        deletes: Vec<Guid>,
    ) -> Result<()> {
        for range in puts {
            self.put(range)?;
        }
        for guid in &deletes {
            self.delete(suite, guid)?;
        }
        Ok(())
    }
}

/// Lookup oracle over the revisions ever observed for a suite
pub trait RevisionIndex: Send + Sync {
    /// Smallest known revision strictly greater than `after`
    ///
    /// `None` means no later revision is known yet, i.e. infinity.
    fn next_known_revision(&self, suite: &SuiteKey, after: Revision) -> Result<Option<Revision>>;
}
