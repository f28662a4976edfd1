//! Working view of one diagnostic name's ranges
//!
//! Every insert and every repair pass loads the stored rows of a
//! `(suite, name)` into a [`RangeSet`], edits it in memory, and writes back
//! only the difference. Loading normalizes the rows into a valid partition:
//!
//! 1. rows with an invalid payload or an inverted span are dropped
//! 2. survivors are sorted by `(start, guid)`
//! 3. a row starting where the previous survivor starts is dropped
//! 4. a row whose payload equals the previous survivor's is dropped
//! 5. ends are recomputed as `next.start - 1`; the last range is unbounded
//!
//! On a consistent partition none of these steps changes anything.

use crate::dedup::Deduplicator;
use diagstore_core::{DiagnosticRange, Error, Guid, RangeEnd, Result, Revision, SuiteKey};
use std::collections::{HashMap, HashSet};

/// Ranges of one `(suite, name)`, ascending by start
#[derive(Debug, Clone)]
pub struct RangeSet {
    suite: SuiteKey,
    name: String,
    ranges: Vec<DiagnosticRange>,
}

/// Result of loading stored rows into a [`RangeSet`]
#[derive(Debug)]
pub struct Normalized {
    /// The repaired view
    pub set: RangeSet,
    /// Guids of rows dropped for being malformed
    pub malformed: Vec<Guid>,
    /// One line per deviation from the partition invariant
    pub issues: Vec<String>,
}

impl Normalized {
    /// Check if the stored rows already formed a partition
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Rows to write back after editing a [`RangeSet`]
#[derive(Debug, Default)]
pub struct WritePlan {
    /// New or changed rows
    pub puts: Vec<DiagnosticRange>,
    /// Rows no longer part of the partition
    pub deletes: Vec<Guid>,
}

impl WritePlan {
    /// Check if the plan writes nothing
    pub fn is_empty(&self) -> bool {
        self.puts.is_empty() && self.deletes.is_empty()
    }
}

impl RangeSet {
    /// Create an empty set
    pub fn empty(suite: SuiteKey, name: impl Into<String>) -> Self {
        Self {
            suite,
            name: name.into(),
            ranges: Vec::new(),
        }
    }

    /// Load stored rows, repairing whatever breaks the partition
    pub fn from_stored(suite: &SuiteKey, name: &str, rows: &[DiagnosticRange]) -> Normalized {
        let mut issues = Vec::new();
        let mut malformed = Vec::new();

        let mut valid: Vec<&DiagnosticRange> = Vec::with_capacity(rows.len());
        for row in rows {
            match row.validate() {
                Ok(()) => valid.push(row),
                Err(e) => {
                    issues.push(format!("malformed row {}: {}", row.guid, e));
                    malformed.push(row.guid);
                }
            }
        }
        valid.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.guid.cmp(&b.guid)));

        let mut ranges: Vec<DiagnosticRange> = Vec::with_capacity(valid.len());
        for row in valid {
            if let Some(prev) = ranges.last() {
                if prev.start == row.start {
                    issues.push(format!(
                        "row {} starts at {} like row {}",
                        row.guid, row.start, prev.guid
                    ));
                    continue;
                }
                if Deduplicator::equal(&prev.payload, &row.payload) {
                    issues.push(format!(
                        "row {} repeats the content of row {}",
                        row.guid, prev.guid
                    ));
                    continue;
                }
            }
            ranges.push(row.clone());
        }

        let count = ranges.len();
        for i in 0..count {
            let end = match ranges.get(i + 1) {
                Some(next) => RangeEnd::At(next.start - 1),
                None => RangeEnd::Unbounded,
            };
            let range = &mut ranges[i];
            if range.end != end {
                issues.push(format!(
                    "row {} ends at {} instead of {}",
                    range.guid, range.end, end
                ));
                range.end = end;
            }
        }

        Normalized {
            set: RangeSet {
                suite: suite.clone(),
                name: name.to_string(),
                ranges,
            },
            malformed,
            issues,
        }
    }

    /// Suite of the set
    pub fn suite(&self) -> &SuiteKey {
        &self.suite
    }

    /// Diagnostic name of the set
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if the name has no ranges
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Ranges in ascending start order
    pub fn ranges(&self) -> &[DiagnosticRange] {
        &self.ranges
    }

    /// Consume the set
    pub fn into_ranges(self) -> Vec<DiagnosticRange> {
        self.ranges
    }

    /// The current (open) range
    pub fn latest(&self) -> Option<&DiagnosticRange> {
        self.ranges.last()
    }

    /// The range with the smallest start
    pub fn earliest(&self) -> Option<&DiagnosticRange> {
        self.ranges.first()
    }

    /// Index of the range covering `revision`
    pub fn position_containing(&self, revision: Revision) -> Option<usize> {
        let after = self.ranges.partition_point(|r| r.start <= revision);
        let idx = after.checked_sub(1)?;
        self.ranges[idx].contains(revision).then_some(idx)
    }

    /// The range covering `revision`
    pub fn value_at(&self, revision: Revision) -> Option<&DiagnosticRange> {
        self.position_containing(revision).map(|idx| &self.ranges[idx])
    }

    pub(crate) fn range_mut(&mut self, idx: usize) -> &mut DiagnosticRange {
        &mut self.ranges[idx]
    }

    pub(crate) fn insert_at(&mut self, idx: usize, range: DiagnosticRange) {
        self.ranges.insert(idx, range);
    }

    pub(crate) fn push(&mut self, range: DiagnosticRange) {
        self.ranges.push(range);
    }

    /// Merge the range at `idx` with neighbours carrying equal content
    ///
    /// A left neighbour absorbs the touched range. A right neighbour is
    /// absorbed by the survivor if a left merge happened; otherwise the right
    /// neighbour absorbs the touched range. Returns the survivor's index.
    pub(crate) fn coalesce(&mut self, idx: usize) -> usize {
        let mut idx = idx;
        let mut merged_left = false;

        if idx > 0 && Deduplicator::equal(&self.ranges[idx - 1].payload, &self.ranges[idx].payload)
        {
            let touched = self.ranges.remove(idx);
            idx -= 1;
            self.ranges[idx].end = touched.end;
            merged_left = true;
        }

        if idx + 1 < self.ranges.len()
            && Deduplicator::equal(&self.ranges[idx + 1].payload, &self.ranges[idx].payload)
        {
            if merged_left {
                let right = self.ranges.remove(idx + 1);
                self.ranges[idx].end = right.end;
            } else {
                let touched = self.ranges.remove(idx);
                self.ranges[idx].start = touched.start;
            }
        }

        idx
    }

    /// Verify the partition invariant
    pub fn check_partition(&self) -> Result<()> {
        let fail = |reason: String| Error::Consistency {
            suite: self.suite.clone(),
            name: self.name.clone(),
            reason,
        };

        let mut guids = HashSet::with_capacity(self.ranges.len());
        for range in &self.ranges {
            range.validate().map_err(|e| fail(e.to_string()))?;
            if !guids.insert(range.guid) {
                return Err(fail(format!("guid {} keys more than one range", range.guid)));
            }
        }
        for pair in self.ranges.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.end.successor() != Some(next.start) {
                return Err(fail(format!("{} is not followed by {}", prev, next)));
            }
            if Deduplicator::equal(&prev.payload, &next.payload) {
                return Err(fail(format!("{} and {} carry equal content", prev, next)));
            }
        }
        match self.ranges.last() {
            Some(last) if !last.is_open() => Err(fail(format!("{} is the last range", last))),
            _ => Ok(()),
        }
    }

    /// Rows to put and delete so `stored` becomes this set
    ///
    /// Rows identical to their stored version are left alone.
    pub fn plan_against(&self, stored: &[DiagnosticRange]) -> WritePlan {
        let before: HashMap<Guid, &DiagnosticRange> = stored.iter().map(|r| (r.guid, r)).collect();
        let after: HashSet<Guid> = self.ranges.iter().map(|r| r.guid).collect();

        let puts = self
            .ranges
            .iter()
            .filter(|r| before.get(&r.guid).map_or(true, |old| *old != *r))
            .cloned()
            .collect();
        let deletes = stored
            .iter()
            .filter(|r| !after.contains(&r.guid))
            .map(|r| r.guid)
            .collect();

        WritePlan { puts, deletes }
    }
}
