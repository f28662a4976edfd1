//! Consistency repair
//!
//! Rebuilds every diagnostic name of a suite into a valid partition. The
//! repair uses the same normalization as the insert path, so an insert over
//! damaged rows and a repair followed by an insert end in the same state.

use crate::view::RangeSet;
use diagstore_core::{RangeStore, Result, SuiteKey};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a repair pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Diagnostic names examined
    pub names_checked: usize,
    /// Names whose rows needed changes
    pub names_repaired: usize,
    /// Rows written (new or changed)
    pub rows_written: usize,
    /// Rows deleted
    pub rows_deleted: usize,
    /// Deleted rows that were malformed
    pub malformed_dropped: usize,
}

impl RepairReport {
    /// Check if the pass found nothing to fix
    pub fn is_clean(&self) -> bool {
        self.rows_written == 0 && self.rows_deleted == 0
    }

    fn merge(&mut self, other: RepairReport) {
        self.names_checked += other.names_checked;
        self.names_repaired += other.names_repaired;
        self.rows_written += other.rows_written;
        self.rows_deleted += other.rows_deleted;
        self.malformed_dropped += other.malformed_dropped;
    }
}

/// Restores the partition invariant over stored rows
pub struct ConsistencyRepair {
    store: Arc<dyn RangeStore>,
}

impl ConsistencyRepair {
    /// Create a repair pass over `store`
    pub fn new(store: Arc<dyn RangeStore>) -> Self {
        Self { store }
    }

    /// Repair every diagnostic name of `suite`
    ///
    /// Idempotent: a second pass over the result reports no changes.
    pub fn fix_diagnostics(&self, suite: &SuiteKey) -> Result<RepairReport> {
        let mut report = RepairReport::default();
        for name in self.store.names(suite)? {
            report.merge(self.fix_name(suite, &name)?);
        }

        info!(
            suite = %suite,
            names = report.names_checked,
            repaired = report.names_repaired,
            written = report.rows_written,
            deleted = report.rows_deleted,
            malformed = report.malformed_dropped,
            "Diagnostic repair complete"
        );
        Ok(report)
    }

    /// Repair one diagnostic name
    pub fn fix_name(&self, suite: &SuiteKey, name: &str) -> Result<RepairReport> {
        let stored = self.store.query(suite, name)?;
        let normalized = RangeSet::from_stored(suite, name, &stored);
        let mut report = RepairReport {
            names_checked: 1,
            ..Default::default()
        };

        if normalized.is_consistent() {
            return Ok(report);
        }

        for guid in &normalized.malformed {
            warn!(suite = %suite, name, guid = %guid, "Dropping malformed diagnostic row");
        }
        for issue in &normalized.issues {
            debug!(suite = %suite, name, issue = %issue, "Repairing diagnostic rows");
        }

        let plan = normalized.set.plan_against(&stored);
        report.names_repaired = 1;
        report.rows_written = plan.puts.len();
        report.rows_deleted = plan.deletes.len();
        report.malformed_dropped = normalized.malformed.len();

        if !plan.is_empty() {
            self.store.apply_batch(suite, plan.puts, plan.deletes)?;
        }
        Ok(report)
    }
}
