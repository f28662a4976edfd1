//! Fast path for in-order arrivals
//!
//! When the incoming revision is at or after the latest integrated revision,
//! only the open range can be affected: the value either stays the same, is
//! overwritten at the open range's start, or a new open range begins.

use crate::dedup::Deduplicator;
use crate::inserter::Placement;
use crate::view::RangeSet;
use diagstore_core::{Candidate, DiagnosticRange, GuidMapping, RangeEnd, Revision};

/// Places a candidate relative to the open range
#[derive(Debug, Clone, Copy, Default)]
pub struct FastAppendStrategy;

impl FastAppendStrategy {
    /// Apply the candidate observed at `revision`
    ///
    /// Returns `None` without touching the set when the open range starts
    /// after `revision`; the caller must then use the out-of-order path.
    pub fn apply(
        set: &mut RangeSet,
        revision: Revision,
        candidate: &Candidate,
        mapping: &mut GuidMapping,
    ) -> Option<Placement> {
        let last = set.len().checked_sub(1)?;
        let current = &set.ranges()[last];
        if current.start > revision {
            return None;
        }

        if Deduplicator::equal(&current.payload, &candidate.payload) {
            Deduplicator::record(mapping, candidate, current);
            return Some(Placement::Unchanged);
        }

        if current.start == revision {
            set.range_mut(last).payload = candidate.payload.clone();
            let survivor = set.coalesce(last);
            Deduplicator::record(mapping, candidate, &set.ranges()[survivor]);
            return Some(Placement::Overwritten);
        }

        set.range_mut(last).end = RangeEnd::At(revision - 1);
        let suite = set.suite().clone();
        set.push(DiagnosticRange::open(suite, revision, candidate));
        Some(Placement::Appended)
    }
}
