//! Repair of damaged partitions
//!
//! Mock data: `owners` and `bugs` with three ranges each,
//! `[0, 9]`, `[10, 19]`, `[20, inf)`.

use crate::common::*;
use diagstore::prelude::*;

fn add_mock_data(t: &TestStore, suite: &SuiteKey) {
    for (name, values) in [("owners", ["1", "2", "3"]), ("bugs", ["a", "b", "c"])] {
        for (i, value) in values.iter().enumerate() {
            let start = i as Revision * 10;
            let end = if i == values.len() - 1 {
                RangeEnd::Unbounded
            } else {
                RangeEnd::At(start + 9)
            };
            t.rows()
                .put(DiagnosticRange::new(
                    suite.clone(),
                    name,
                    start,
                    end,
                    generic_set(value),
                    Guid::new(),
                ))
                .unwrap();
        }
    }
}

fn put_open(t: &TestStore, suite: &SuiteKey, name: &str, value: &str, start: Revision) {
    t.rows()
        .put(DiagnosticRange::new(
            suite.clone(),
            name,
            start,
            RangeEnd::Unbounded,
            generic_set(value),
            Guid::new(),
        ))
        .unwrap();
}

fn spans(t: &TestStore, suite: &SuiteKey, name: &str) -> Vec<(Revision, RangeEnd)> {
    t.rows()
        .query(suite, name)
        .unwrap()
        .into_iter()
        .map(|r| (r.start, r.end))
        .collect()
}

fn mock_spans() -> Vec<(Revision, RangeEnd)> {
    vec![
        (0, RangeEnd::At(9)),
        (10, RangeEnd::At(19)),
        (20, RangeEnd::Unbounded),
    ]
}

#[test]
fn middle_overlap_fixes_range() {
    let t = TestStore::new();
    let suite = t.suite.clone();
    add_mock_data(&t, &suite);
    put_open(&t, &suite, "owners", "10", 5);

    t.store.fix_diagnostics(&suite).unwrap();

    assert_eq!(
        spans(&t, &suite, "owners"),
        vec![
            (0, RangeEnd::At(4)),
            (5, RangeEnd::At(9)),
            (10, RangeEnd::At(19)),
            (20, RangeEnd::Unbounded),
        ]
    );
    assert_eq!(spans(&t, &suite, "bugs"), mock_spans());
}

#[test]
fn end_overlap_fixes_range() {
    let t = TestStore::new();
    let suite = t.suite.clone();
    add_mock_data(&t, &suite);
    put_open(&t, &suite, "owners", "10", 100);

    t.store.fix_diagnostics(&suite).unwrap();

    assert_eq!(
        spans(&t, &suite, "owners"),
        vec![
            (0, RangeEnd::At(9)),
            (10, RangeEnd::At(19)),
            (20, RangeEnd::At(99)),
            (100, RangeEnd::Unbounded),
        ]
    );
    assert_eq!(spans(&t, &suite, "bugs"), mock_spans());
}

#[test]
fn different_suite_unchanged() {
    let t = TestStore::new();
    let damaged = SuiteKey::new("Chromium/win7/1");
    let other = SuiteKey::new("Chromium/win7/2");
    add_mock_data(&t, &damaged);
    add_mock_data(&t, &other);
    put_open(&t, &damaged, "owners", "10", 5);

    let report = t.store.fix_diagnostics(&other).unwrap();

    assert!(report.is_clean());
    assert_eq!(spans(&t, &other, "owners"), mock_spans());
    assert_eq!(spans(&t, &damaged, "owners").len(), 4);
}

#[test]
fn duplicate_content_collapses() {
    let t = TestStore::new();
    let suite = t.suite.clone();
    add_mock_data(&t, &suite);
    put_open(&t, &suite, "owners", "1", 5);

    let report = t.store.fix_diagnostics(&suite).unwrap();

    assert_eq!(report.rows_deleted, 1);
    assert_eq!(spans(&t, &suite, "owners"), mock_spans());
    assert_eq!(spans(&t, &suite, "bugs"), mock_spans());
}

#[test]
fn repair_preserves_revision_mapping() {
    let t = TestStore::new();
    let suite = t.suite.clone();
    put_open(&t, &suite, "owners", "a", 0);
    put_open(&t, &suite, "owners", "b", 10);
    t.rows()
        .put(DiagnosticRange::new(
            suite.clone(),
            "owners",
            20,
            RangeEnd::At(29),
            generic_set("c"),
            Guid::new(),
        ))
        .unwrap();

    // The view readers see before the repair
    let before: Vec<_> = (0..40)
        .map(|rev| t.store.value_at(&suite, "owners", rev).unwrap().map(|r| r.payload))
        .collect();

    let report = t.store.fix_diagnostics(&suite).unwrap();
    assert!(!report.is_clean());
    t.assert_partition("owners");

    let after: Vec<_> = (0..40)
        .map(|rev| t.store.value_at(&suite, "owners", rev).unwrap().map(|r| r.payload))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn repair_is_idempotent() {
    let t = TestStore::new();
    let suite = t.suite.clone();
    add_mock_data(&t, &suite);
    put_open(&t, &suite, "owners", "10", 5);
    put_open(&t, &suite, "bugs", "a", 15);

    let first = t.store.fix_diagnostics(&suite).unwrap();
    assert_eq!(first.names_repaired, 2);

    let rows = t.rows().scan_suite(&suite).unwrap();
    let second = t.store.fix_diagnostics(&suite).unwrap();
    assert!(second.is_clean());
    assert_eq!(t.rows().scan_suite(&suite).unwrap(), rows);
}

#[test]
fn malformed_rows_are_dropped() {
    let t = TestStore::new();
    let suite = t.suite.clone();
    add_mock_data(&t, &suite);
    let bad = t.put_raw("owners", "x", 30, RangeEnd::Unbounded);
    t.corrupt(bad);

    let report = t.store.fix_diagnostics(&suite).unwrap();

    assert_eq!(report.malformed_dropped, 1);
    assert_eq!(spans(&t, &suite, "owners"), mock_spans());
}
