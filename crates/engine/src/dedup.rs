//! Content deduplication
//!
//! Payload equality is content-hash equality; see
//! [`diagstore_core::ContentHash`] for what the hash covers. Guids never take
//! part in the comparison.

use diagstore_core::{Candidate, DiagnosticPayload, DiagnosticRange, GuidMapping};

/// Structural equality over diagnostic content
#[derive(Debug, Clone, Copy, Default)]
pub struct Deduplicator;

impl Deduplicator {
    /// Check if two payloads carry the same diagnostic content
    #[inline]
    pub fn equal(a: &DiagnosticPayload, b: &DiagnosticPayload) -> bool {
        a.content_hash() == b.content_hash()
    }

    /// Record that `candidate`'s content now lives in `survivor`
    ///
    /// Nothing is recorded when the survivor is the candidate's own row.
    pub(crate) fn record(mapping: &mut GuidMapping, candidate: &Candidate, survivor: &DiagnosticRange) {
        if survivor.guid != candidate.guid {
            mapping.insert(candidate.guid, survivor.to_ref());
        }
    }
}
