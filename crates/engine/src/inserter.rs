//! Range inserter
//!
//! Entry point for merging one revision's diagnostics into the store. Each
//! candidate is handled independently: its name's rows are loaded into a
//! [`RangeSet`], the fast path or the out-of-order path edits the set, and the
//! difference is written back in a single [`RangeStore::apply_batch`] call.

use crate::config::EngineConfig;
use crate::dedup::Deduplicator;
use crate::fast_append::FastAppendStrategy;
use crate::out_of_order::OutOfOrderInserter;
use crate::view::RangeSet;
use diagstore_core::{
    Candidate, DiagnosticRange, Error, Guid, GuidMapping, RangeStore, Result, Revision,
    RevisionIndex, SuiteKey,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// How a candidate ended up in its name's ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// First value ever stored for the name
    Created,
    /// The covering range already carried the same content
    Unchanged,
    /// The covering range starting at the revision took the new content
    Overwritten,
    /// The open range was closed and a new open range started
    Appended,
    /// The candidate replaced the head of a range, the rest moved right
    Nudged,
    /// The candidate was placed inside a range, splitting it
    Split,
    /// The earliest range was extended down to the revision
    Extended,
    /// The candidate filled the gap before the earliest range
    Prepended,
}

/// Merges diagnostics observed at a revision into stored ranges
pub struct RangeInserter {
    store: Arc<dyn RangeStore>,
    revisions: Arc<dyn RevisionIndex>,
    config: EngineConfig,
}

impl RangeInserter {
    /// Create an inserter over the given collaborators
    pub fn new(
        store: Arc<dyn RangeStore>,
        revisions: Arc<dyn RevisionIndex>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            revisions,
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Insert the diagnostics observed at `revision`
    ///
    /// `last_known_revision` is the latest revision integrated before this
    /// call. Candidates failing validation are skipped with a warning, as is
    /// any repeat of a name already seen in this call.
    ///
    /// Returns, for every candidate whose content ended up in a row under a
    /// different guid, that row's guid and content.
    ///
    /// # Errors
    ///
    /// Propagates store and revision index failures. With
    /// `strict_consistency` set, returns [`Error::Consistency`] when a name's
    /// stored rows do not form a partition.
    pub fn insert(
        &self,
        suite: &SuiteKey,
        revision: Revision,
        candidates: &[Candidate],
        last_known_revision: Revision,
    ) -> Result<GuidMapping> {
        let mut mapping = GuidMapping::new();
        let mut seen: HashSet<&str> = HashSet::with_capacity(candidates.len());

        for candidate in candidates {
            if let Err(e) = candidate.validate() {
                warn!(
                    suite = %suite,
                    name = %candidate.name,
                    guid = %candidate.guid,
                    revision,
                    error = %e,
                    "Skipping invalid diagnostic"
                );
                continue;
            }
            if !seen.insert(candidate.name.as_str()) {
                warn!(
                    suite = %suite,
                    name = %candidate.name,
                    guid = %candidate.guid,
                    revision,
                    "Skipping repeated diagnostic name"
                );
                continue;
            }

            let placement =
                self.insert_one(suite, revision, candidate, last_known_revision, &mut mapping)?;
            debug!(
                suite = %suite,
                name = %candidate.name,
                revision,
                ?placement,
                "Placed diagnostic"
            );
        }

        Ok(mapping)
    }

    fn insert_one(
        &self,
        suite: &SuiteKey,
        revision: Revision,
        candidate: &Candidate,
        last_known_revision: Revision,
        mapping: &mut GuidMapping,
    ) -> Result<Placement> {
        let stored = self.store.query(suite, &candidate.name)?;
        let mut set = self.load(suite, &candidate.name, &stored)?;

        // A guid that already keys a row must not key a second one
        let rekeyed = match self.store.get(suite, &candidate.guid)? {
            Some(existing) => {
                debug!(
                    suite = %suite,
                    name = %candidate.name,
                    guid = %candidate.guid,
                    existing = %existing,
                    revision,
                    "Candidate guid already stored, placing under a fresh guid"
                );
                Some(Candidate::new(
                    candidate.name.clone(),
                    candidate.payload.clone(),
                    Guid::new(),
                ))
            }
            None => None,
        };
        let placed = rekeyed.as_ref().unwrap_or(candidate);

        let placement = self.place(&mut set, revision, placed, last_known_revision, mapping)?;

        if rekeyed.is_some() {
            mapping.remove(&placed.guid);
            if let Some(holder) = set.value_at(revision) {
                Deduplicator::record(mapping, candidate, holder);
            }
        }

        debug_assert!(set.check_partition().is_ok());

        let plan = set.plan_against(&stored);
        if !plan.is_empty() {
            self.store.apply_batch(suite, plan.puts, plan.deletes)?;
        }
        Ok(placement)
    }

    fn place(
        &self,
        set: &mut RangeSet,
        revision: Revision,
        candidate: &Candidate,
        last_known_revision: Revision,
        mapping: &mut GuidMapping,
    ) -> Result<Placement> {
        let suite = set.suite().clone();
        let placement = if set.is_empty() {
            set.push(DiagnosticRange::open(suite, revision, candidate));
            Placement::Created
        } else if revision >= last_known_revision {
            match FastAppendStrategy::apply(set, revision, candidate, mapping) {
                Some(placement) => placement,
                None => {
                    debug!(
                        suite = %suite,
                        name = %candidate.name,
                        revision,
                        last_known_revision,
                        "Open range starts after revision, taking out-of-order path"
                    );
                    self.place_out_of_order(set, revision, candidate, mapping)?
                }
            }
        } else {
            self.place_out_of_order(set, revision, candidate, mapping)?
        };
        Ok(placement)
    }

    fn place_out_of_order(
        &self,
        set: &mut RangeSet,
        revision: Revision,
        candidate: &Candidate,
        mapping: &mut GuidMapping,
    ) -> Result<Placement> {
        let next_known = self.revisions.next_known_revision(set.suite(), revision)?;
        Ok(OutOfOrderInserter::apply(
            set, revision, next_known, candidate, mapping,
        ))
    }

    /// Load a name's rows, repairing them unless strict mode forbids it
    fn load(&self, suite: &SuiteKey, name: &str, stored: &[DiagnosticRange]) -> Result<RangeSet> {
        let normalized = RangeSet::from_stored(suite, name, stored);
        if normalized.is_consistent() {
            return Ok(normalized.set);
        }

        let err = Error::Consistency {
            suite: suite.clone(),
            name: name.to_string(),
            reason: normalized.issues.join("; "),
        };
        if self.config.strict_consistency {
            return Err(err);
        }
        warn!(error = %err, "Inserting over repaired view");
        Ok(normalized.set)
    }
}
