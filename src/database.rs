//! Main entry point for diagstore.
//!
//! This module provides the `DiagnosticStore` struct, which wires a range
//! store, a revision index, and the range engine together.

use crate::error::Result;
use diagstore_core::{
    Candidate, DiagnosticPayload, DiagnosticRange, DiagnosticRef, GuidMapping, RangeStore,
    Revision, SuiteKey,
};
use diagstore_engine::{
    ConsistencyRepair, DiagnosticReader, EngineConfig, RangeInserter, RepairReport,
};
use diagstore_storage::{InMemoryRevisionIndex, ShardedRangeStore};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The diagnostic range store.
///
/// Create one with [`DiagnosticStore::ephemeral`] or
/// [`DiagnosticStore::builder`].
///
/// # Example
///
/// ```
/// use diagstore::prelude::*;
///
/// let store = DiagnosticStore::ephemeral();
/// let suite = SuiteKey::new("ChromiumPerf/linux-perf/speedometer2");
/// let owners = DiagnosticPayload::new(json!({"type": "GenericSet", "values": ["a@x.org"]}));
///
/// store.ingest(&suite, 100, &[Candidate::with_new_guid("owners", owners.clone())])?;
/// let current = store.most_recent_by_names(&suite, ["owners"])?;
/// assert_eq!(current["owners"], owners);
/// # Ok::<(), diagstore::Error>(())
/// ```
pub struct DiagnosticStore {
    store: Arc<dyn RangeStore>,
    revisions: Arc<InMemoryRevisionIndex>,
    inserter: RangeInserter,
    repair: ConsistencyRepair,
    reader: DiagnosticReader,
}

impl DiagnosticStore {
    /// Create an all-in-memory store with default settings.
    pub fn ephemeral() -> Self {
        Self::builder().build()
    }

    /// Create a builder for store configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use diagstore::prelude::*;
    ///
    /// let store = DiagnosticStore::builder()
    ///     .config(EngineConfig::new().strict_consistency(true))
    ///     .build();
    /// assert!(store.config().strict_consistency);
    /// ```
    pub fn builder() -> DiagnosticStoreBuilder {
        DiagnosticStoreBuilder::new()
    }

    /// Merge diagnostics observed at `revision` into stored ranges.
    ///
    /// `last_known_revision` is the latest revision integrated before this
    /// call. Returns the guid mapping described on
    /// [`RangeInserter::insert`].
    pub fn insert(
        &self,
        suite: &SuiteKey,
        revision: Revision,
        candidates: &[Candidate],
        last_known_revision: Revision,
    ) -> Result<GuidMapping> {
        Ok(self
            .inserter
            .insert(suite, revision, candidates, last_known_revision)?)
    }

    /// Record `revision` and merge its diagnostics.
    ///
    /// The last known revision is the latest revision recorded for the suite
    /// before this call, or `revision` itself for a suite's first upload.
    pub fn ingest(
        &self,
        suite: &SuiteKey,
        revision: Revision,
        candidates: &[Candidate],
    ) -> Result<GuidMapping> {
        let last_known = self.revisions.latest(suite).unwrap_or(revision);
        self.revisions.record(suite, revision);
        debug!(suite = %suite, revision, last_known, "Ingesting diagnostics");
        self.insert(suite, revision, candidates, last_known)
    }

    /// Record that `revision` was observed for `suite`.
    ///
    /// Returns true if the revision was new.
    pub fn record_revision(&self, suite: &SuiteKey, revision: Revision) -> bool {
        self.revisions.record(suite, revision)
    }

    /// Restore the range partition of every name in `suite`.
    pub fn fix_diagnostics(&self, suite: &SuiteKey) -> Result<RepairReport> {
        Ok(self.repair.fix_diagnostics(suite)?)
    }

    /// Current value of each requested name.
    pub fn most_recent_by_names<'a>(
        &self,
        suite: &SuiteKey,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<HashMap<String, DiagnosticPayload>> {
        Ok(self.reader.most_recent_by_names(suite, names)?)
    }

    /// The value of `name` at `revision`.
    pub fn value_at(
        &self,
        suite: &SuiteKey,
        name: &str,
        revision: Revision,
    ) -> Result<Option<DiagnosticRef>> {
        Ok(self.reader.value_at(suite, name, revision)?)
    }

    /// Ranges of `(suite, name)` in ascending start order.
    pub fn ranges(&self, suite: &SuiteKey, name: &str) -> Result<Vec<DiagnosticRange>> {
        Ok(self.reader.ranges(suite, name)?)
    }

    /// Rows of `suite` starting within `[min, max]`, newest first.
    pub fn diagnostics_between(
        &self,
        suite: &SuiteKey,
        min: Option<Revision>,
        max: Option<Revision>,
    ) -> Result<Vec<DiagnosticRange>> {
        Ok(self.reader.diagnostics_between(suite, min, max)?)
    }

    /// Diagnostic names stored for `suite`.
    pub fn names(&self, suite: &SuiteKey) -> Result<Vec<String>> {
        Ok(self.store.names(suite)?)
    }

    /// The underlying range store.
    pub fn range_store(&self) -> &Arc<dyn RangeStore> {
        &self.store
    }

    /// The revision index fed by [`DiagnosticStore::ingest`].
    pub fn revisions(&self) -> &InMemoryRevisionIndex {
        &self.revisions
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        self.inserter.config()
    }
}

/// Builder for store configuration.
///
/// # Example
///
/// ```
/// use diagstore::prelude::*;
/// use diagstore::ShardedRangeStore;
/// use std::sync::Arc;
///
/// let rows = Arc::new(ShardedRangeStore::new());
/// let store = DiagnosticStore::builder()
///     .range_store(rows.clone())
///     .config(EngineConfig::new().query_limit(100))
///     .build();
/// assert_eq!(store.config().query_limit, 100);
/// ```
pub struct DiagnosticStoreBuilder {
    config: EngineConfig,
    store: Option<Arc<dyn RangeStore>>,
}

impl DiagnosticStoreBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            store: None,
        }
    }

    /// Set the engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an existing range store instead of a fresh in-memory one.
    pub fn range_store(mut self, store: Arc<dyn RangeStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Abort inserts over inconsistent rows instead of repairing them.
    pub fn strict_consistency(mut self) -> Self {
        self.config.strict_consistency = true;
        self
    }

    /// Build the store.
    pub fn build(self) -> DiagnosticStore {
        let store: Arc<dyn RangeStore> = match self.store {
            Some(store) => store,
            None => Arc::new(ShardedRangeStore::new()),
        };
        let revisions = Arc::new(InMemoryRevisionIndex::new());

        DiagnosticStore {
            inserter: RangeInserter::new(store.clone(), revisions.clone(), self.config.clone()),
            repair: ConsistencyRepair::new(store.clone()),
            reader: DiagnosticReader::new(store.clone(), self.config),
            revisions,
            store,
        }
    }
}

impl Default for DiagnosticStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
