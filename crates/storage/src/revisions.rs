//! In-memory revision index
//!
//! Tracks which revisions have ever been observed for each suite. The
//! ingestion path records a revision whenever data for it arrives; the engine
//! only ever asks for the next known revision after a point.

use dashmap::DashMap;
use diagstore_core::{Result, Revision, RevisionIndex, SuiteKey};
use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

/// Observed revisions per suite, ordered for successor lookups
#[derive(Debug, Default)]
pub struct InMemoryRevisionIndex {
    suites: DashMap<SuiteKey, BTreeSet<Revision>>,
}

impl InMemoryRevisionIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `revision` was observed for `suite`
    ///
    /// Returns true if the revision was not known before.
    pub fn record(&self, suite: &SuiteKey, revision: Revision) -> bool {
        self.suites
            .entry(suite.clone())
            .or_default()
            .insert(revision)
    }

    /// Latest revision observed for `suite`
    pub fn latest(&self, suite: &SuiteKey) -> Option<Revision> {
        self.suites
            .get(suite)
            .and_then(|revs| revs.iter().next_back().copied())
    }
}

impl RevisionIndex for InMemoryRevisionIndex {
    fn next_known_revision(&self, suite: &SuiteKey, after: Revision) -> Result<Option<Revision>> {
        Ok(self.suites.get(suite).and_then(|revs| {
            revs.range((Excluded(after), Unbounded)).next().copied()
        }))
    }
}
