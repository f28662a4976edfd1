//! Read paths over stored ranges
//!
//! Reads never write. Point lookups go through the same repaired view the
//! inserter uses, so a reader sees what the next insert would see.

use crate::config::EngineConfig;
use crate::view::RangeSet;
use diagstore_core::{
    DiagnosticPayload, DiagnosticRange, DiagnosticRef, RangeStore, Result, Revision, SuiteKey,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Query access to diagnostic ranges
pub struct DiagnosticReader {
    store: Arc<dyn RangeStore>,
    config: EngineConfig,
}

impl DiagnosticReader {
    /// Create a reader over `store`
    pub fn new(store: Arc<dyn RangeStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Ranges of `(suite, name)` as a partition, ascending by start
    pub fn ranges(&self, suite: &SuiteKey, name: &str) -> Result<Vec<DiagnosticRange>> {
        Ok(self.view(suite, name)?.into_ranges())
    }

    /// The value of `name` at `revision`
    pub fn value_at(
        &self,
        suite: &SuiteKey,
        name: &str,
        revision: Revision,
    ) -> Result<Option<DiagnosticRef>> {
        Ok(self
            .view(suite, name)?
            .value_at(revision)
            .map(DiagnosticRange::to_ref))
    }

    /// Current value of each requested name
    ///
    /// Among a name's open rows the one with the greatest start wins. Names
    /// with no open row are absent from the result.
    pub fn most_recent_by_names<'a>(
        &self,
        suite: &SuiteKey,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<HashMap<String, DiagnosticPayload>> {
        let mut current = HashMap::new();
        for name in names {
            let latest = self
                .store
                .query(suite, name)?
                .into_iter()
                .filter(|r| r.is_open() && r.validate().is_ok())
                .max_by(|a, b| a.start.cmp(&b.start).then_with(|| b.guid.cmp(&a.guid)));
            if let Some(range) = latest {
                current.insert(name.to_string(), range.payload);
            }
        }
        Ok(current)
    }

    /// Well-formed rows of `suite` starting within `[min, max]`
    ///
    /// Either bound may be omitted. Results are ordered by start descending,
    /// then by name, and capped at the configured query limit.
    pub fn diagnostics_between(
        &self,
        suite: &SuiteKey,
        min: Option<Revision>,
        max: Option<Revision>,
    ) -> Result<Vec<DiagnosticRange>> {
        let mut rows: Vec<DiagnosticRange> = self
            .store
            .scan_suite(suite)?
            .into_iter()
            .filter(|r| r.validate().is_ok())
            .filter(|r| min.map_or(true, |min| r.start >= min))
            .filter(|r| max.map_or(true, |max| r.start <= max))
            .collect();
        rows.sort_by(|a, b| b.start.cmp(&a.start).then_with(|| a.name.cmp(&b.name)));
        rows.truncate(self.config.query_limit);
        Ok(rows)
    }

    fn view(&self, suite: &SuiteKey, name: &str) -> Result<RangeSet> {
        let stored = self.store.query(suite, name)?;
        Ok(RangeSet::from_stored(suite, name, &stored).set)
    }
}
