//! Placement of revisions that arrive before already integrated ones
//!
//! The candidate's value extends from its revision up to (but excluding) the
//! next revision known to the [`RevisionIndex`](diagstore_core::RevisionIndex),
//! never further than the range it lands in. Three shapes are possible:
//!
//! - the revision is the start of an existing range: the range is replaced
//!   up to the bound and the rest of it is nudged right
//! - the revision is inside an existing range: the range is split around the
//!   candidate, and the old value resumes after the bound
//! - the revision precedes every stored range: the candidate fills the gap
//!   up to the earliest range, or extends it when the content matches

use crate::dedup::Deduplicator;
use crate::inserter::Placement;
use crate::view::RangeSet;
use diagstore_core::{Candidate, DiagnosticRange, Guid, GuidMapping, RangeEnd, Revision};
use std::cmp::min;
use tracing::warn;

/// Splits and nudges ranges for late arrivals
#[derive(Debug, Clone, Copy, Default)]
pub struct OutOfOrderInserter;

impl OutOfOrderInserter {
    /// Apply the candidate observed at `revision`
    ///
    /// `next_known` is the smallest known revision after `revision`.
    pub fn apply(
        set: &mut RangeSet,
        revision: Revision,
        next_known: Option<Revision>,
        candidate: &Candidate,
        mapping: &mut GuidMapping,
    ) -> Placement {
        let Some(idx) = set.position_containing(revision) else {
            return Self::before_all(set, revision, candidate, mapping);
        };

        let current = &set.ranges()[idx];
        if Deduplicator::equal(&current.payload, &candidate.payload) {
            Deduplicator::record(mapping, candidate, current);
            return Placement::Unchanged;
        }

        let bound = Self::bound(set, revision, next_known);
        if current.start == revision {
            Self::replace_at_start(set, idx, bound, candidate, mapping)
        } else {
            Self::split_interior(set, idx, revision, bound, candidate, mapping)
        }
    }

    /// Last revision the candidate's value may cover
    fn bound(set: &RangeSet, revision: Revision, next_known: Option<Revision>) -> RangeEnd {
        match next_known {
            Some(next) if next > revision => RangeEnd::At(next - 1),
            Some(next) => {
                warn!(
                    suite = %set.suite(),
                    name = set.name(),
                    revision,
                    next_known = next,
                    "Revision index returned a revision not after the insert point"
                );
                RangeEnd::At(revision)
            }
            None => RangeEnd::Unbounded,
        }
    }

    fn replace_at_start(
        set: &mut RangeSet,
        idx: usize,
        bound: RangeEnd,
        candidate: &Candidate,
        mapping: &mut GuidMapping,
    ) -> Placement {
        let current = &set.ranges()[idx];
        let (start, old_end) = (current.start, current.end);

        match min(old_end, bound) {
            RangeEnd::At(last) if RangeEnd::At(last) < old_end => {
                set.range_mut(idx).start = last + 1;
                let replaced = DiagnosticRange::new(
                    set.suite().clone(),
                    set.name(),
                    start,
                    RangeEnd::At(last),
                    candidate.payload.clone(),
                    candidate.guid,
                );
                set.insert_at(idx, replaced);
                let survivor = set.coalesce(idx);
                Deduplicator::record(mapping, candidate, &set.ranges()[survivor]);
                Placement::Nudged
            }
            _ => {
                set.range_mut(idx).payload = candidate.payload.clone();
                let survivor = set.coalesce(idx);
                Deduplicator::record(mapping, candidate, &set.ranges()[survivor]);
                Placement::Overwritten
            }
        }
    }

    fn split_interior(
        set: &mut RangeSet,
        idx: usize,
        revision: Revision,
        bound: RangeEnd,
        candidate: &Candidate,
        mapping: &mut GuidMapping,
    ) -> Placement {
        let old = set.ranges()[idx].clone();
        set.range_mut(idx).end = RangeEnd::At(revision - 1);

        let at = idx + 1;
        let covered = min(old.end, bound);
        set.insert_at(
            at,
            DiagnosticRange::new(
                old.suite.clone(),
                old.name.clone(),
                revision,
                covered,
                candidate.payload.clone(),
                candidate.guid,
            ),
        );
        if let RangeEnd::At(last) = covered {
            if covered < old.end {
                set.insert_at(
                    at + 1,
                    DiagnosticRange::new(old.suite, old.name, last + 1, old.end, old.payload, Guid::new()),
                );
            }
        }

        let survivor = set.coalesce(at);
        Deduplicator::record(mapping, candidate, &set.ranges()[survivor]);
        Placement::Split
    }

    fn before_all(
        set: &mut RangeSet,
        revision: Revision,
        candidate: &Candidate,
        mapping: &mut GuidMapping,
    ) -> Placement {
        let Some(earliest) = set.earliest() else {
            let suite = set.suite().clone();
            set.push(DiagnosticRange::open(suite, revision, candidate));
            return Placement::Created;
        };

        if Deduplicator::equal(&earliest.payload, &candidate.payload) {
            set.range_mut(0).start = revision;
            Deduplicator::record(mapping, candidate, &set.ranges()[0]);
            return Placement::Extended;
        }

        let end = RangeEnd::At(earliest.start - 1);
        let filler = DiagnosticRange::new(
            set.suite().clone(),
            set.name(),
            revision,
            end,
            candidate.payload.clone(),
            candidate.guid,
        );
        set.insert_at(0, filler);
        Placement::Prepended
    }
}
