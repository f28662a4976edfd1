//! Sharded in-memory range store
//!
//! DashMap by SuiteKey, FxHashMap by Guid within.
//!
//! # Design
//!
//! - DashMap: 16-way sharded by default, lock-free reads
//! - FxHashMap: O(1) row lookups, fast non-crypto hash
//! - Per-suite: the natural single-writer unit, different suites never contend
//!
//! Name scans collect and sort the suite's rows. A suite holds a few dozen
//! diagnostic names with a handful of ranges each, so this stays cheap.

use dashmap::DashMap;
use diagstore_core::{DiagnosticRange, Guid, RangeStore, Result, SuiteKey};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Per-suite shard containing the suite's rows
#[derive(Debug)]
pub struct Shard {
    /// Rows keyed by guid
    pub(crate) rows: FxHashMap<Guid, DiagnosticRange>,
}

impl Shard {
    /// Create a new empty shard
    pub fn new() -> Self {
        Self {
            rows: FxHashMap::default(),
        }
    }

    /// Create a shard with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Get number of rows in this shard
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if shard is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn sorted_for_name(&self, name: &str) -> Vec<DiagnosticRange> {
        let mut results: Vec<_> = self
            .rows
            .values()
            .filter(|r| r.name == name)
            .cloned()
            .collect();
        results.sort_by(|a, b| a.start.cmp(&b.start).then(a.guid.cmp(&b.guid)));
        results
    }
}

impl Default for Shard {
    fn default() -> Self {
        Self::new()
    }
}

/// Sharded range store - DashMap by SuiteKey, HashMap within
///
/// # Thread Safety
///
/// - reads: lock-free via DashMap read guards
/// - put/delete: only lock the target suite's shard
/// - apply_batch: holds the suite's shard lock for the whole batch, so
///   readers never observe half of a name's rewrite
///
/// # Example
///
/// ```ignore
/// use diagstore_storage::ShardedRangeStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(ShardedRangeStore::new());
/// let rows = store.query(&suite, "owners")?;
/// ```
pub struct ShardedRangeStore {
    /// Per-suite shards
    shards: DashMap<SuiteKey, Shard>,
    /// Bumped once per successful write (put, delete, or batch)
    version: AtomicU64,
}

impl ShardedRangeStore {
    /// Create new sharded store
    pub fn new() -> Self {
        Self {
            shards: DashMap::new(),
            version: AtomicU64::new(0),
        }
    }

    /// Create with expected number of suites
    pub fn with_capacity(num_suites: usize) -> Self {
        Self {
            shards: DashMap::with_capacity(num_suites),
            version: AtomicU64::new(0),
        }
    }

    /// Get current write version
    ///
    /// Tests use this to assert that an operation wrote nothing.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    #[inline]
    fn bump_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Get number of shards (suites)
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Check if a suite has any rows
    pub fn has_suite(&self, suite: &SuiteKey) -> bool {
        self.shards
            .get(suite)
            .map(|shard| !shard.is_empty())
            .unwrap_or(false)
    }

    /// Get total number of rows across all shards
    pub fn total_entries(&self) -> usize {
        self.shards.iter().map(|entry| entry.value().len()).sum()
    }

    /// Get count of rows for a specific suite
    pub fn suite_entry_count(&self, suite: &SuiteKey) -> usize {
        self.shards.get(suite).map(|shard| shard.len()).unwrap_or(0)
    }

    /// Check if a row exists
    #[inline]
    pub fn contains(&self, suite: &SuiteKey, guid: &Guid) -> bool {
        self.shards
            .get(suite)
            .map(|shard| shard.rows.contains_key(guid))
            .unwrap_or(false)
    }

    /// All suites that have a shard
    pub fn suite_keys(&self) -> Vec<SuiteKey> {
        let mut keys: Vec<_> = self.shards.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Clear all rows for a suite
    ///
    /// Returns true if the suite existed and was removed.
    pub fn clear_suite(&self, suite: &SuiteKey) -> bool {
        let removed = self.shards.remove(suite).is_some();
        if removed {
            self.bump_version();
        }
        removed
    }
}

impl RangeStore for ShardedRangeStore {
    fn query(&self, suite: &SuiteKey, name: &str) -> Result<Vec<DiagnosticRange>> {
        Ok(self
            .shards
            .get(suite)
            .map(|shard| shard.sorted_for_name(name))
            .unwrap_or_default())
    }

    fn scan_suite(&self, suite: &SuiteKey) -> Result<Vec<DiagnosticRange>> {
        Ok(self
            .shards
            .get(suite)
            .map(|shard| {
                let mut results: Vec<_> = shard.rows.values().cloned().collect();
                results.sort_by(|a, b| {
                    a.name
                        .cmp(&b.name)
                        .then(a.start.cmp(&b.start))
                        .then(a.guid.cmp(&b.guid))
                });
                results
            })
            .unwrap_or_default())
    }

    fn names(&self, suite: &SuiteKey) -> Result<Vec<String>> {
        Ok(self
            .shards
            .get(suite)
            .map(|shard| {
                shard
                    .rows
                    .values()
                    .map(|r| r.name.clone())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get(&self, suite: &SuiteKey, guid: &Guid) -> Result<Option<DiagnosticRange>> {
        Ok(self
            .shards
            .get(suite)
            .and_then(|shard| shard.rows.get(guid).cloned()))
    }

    fn put(&self, range: DiagnosticRange) -> Result<()> {
        self.shards
            .entry(range.suite.clone())
            .or_insert_with(Shard::new)
            .rows
            .insert(range.guid, range);
        self.bump_version();
        Ok(())
    }

    fn delete(&self, suite: &SuiteKey, guid: &Guid) -> Result<()> {
        let removed = self
            .shards
            .get_mut(suite)
            .and_then(|mut shard| shard.rows.remove(guid));
        if removed.is_some() {
            self.bump_version();
        }
        Ok(())
    }

    fn apply_batch(
        &self,
        suite: &SuiteKey,
        puts: Vec<DiagnosticRange>,
        deletes: Vec<Guid>,
    ) -> Result<()> {
        if puts.is_empty() && deletes.is_empty() {
            return Ok(());
        }

        let (put_count, delete_count) = (puts.len(), deletes.len());
        {
            let mut shard = self
                .shards
                .entry(suite.clone())
                .or_insert_with(|| Shard::with_capacity(put_count));

            // Apply writes
            for range in puts {
                shard.rows.insert(range.guid, range);
            }

            // Apply deletes
            for guid in &deletes {
                shard.rows.remove(guid);
            }
        }

        let version = self.bump_version();
        debug!(
            suite = %suite,
            puts = put_count,
            deletes = delete_count,
            version,
            "Applied range batch"
        );
        Ok(())
    }
}

impl Default for ShardedRangeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShardedRangeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedRangeStore")
            .field("shard_count", &self.shard_count())
            .field("version", &self.version())
            .field("total_entries", &self.total_entries())
            .finish()
    }
}
