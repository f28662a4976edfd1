//! Read queries: current values, point lookups, revision windows

use crate::common::*;
use diagstore::prelude::*;

// =============================================================================
// most_recent_by_names
// =============================================================================

#[test]
fn most_recent_returns_all_data() {
    let t = TestStore::new();
    t.put_raw("owners", "alice@chromium.org", 1, RangeEnd::Unbounded);
    t.put_raw("bugComponents", "abc", 1, RangeEnd::Unbounded);

    let current = t
        .store
        .most_recent_by_names(&t.suite, ["owners", "bugComponents"])
        .unwrap();

    assert_eq!(value_of(&current["owners"]), "alice@chromium.org");
    assert_eq!(value_of(&current["bugComponents"]), "abc");
}

#[test]
fn most_recent_omits_missing_names() {
    let t = TestStore::new();
    t.put_raw("owners", "alice@chromium.org", 1, RangeEnd::Unbounded);

    let current = t
        .store
        .most_recent_by_names(&t.suite, ["owners", "bugComponents"])
        .unwrap();

    assert_eq!(current.len(), 1);
    assert!(!current.contains_key("bugComponents"));
}

#[test]
fn most_recent_ignores_unrequested_names() {
    let t = TestStore::new();
    t.put_raw("deviceInfo", "linux", 1, RangeEnd::Unbounded);

    let current = t
        .store
        .most_recent_by_names(&t.suite, ["owners", "bugComponents"])
        .unwrap();
    assert!(current.is_empty());
}

#[test]
fn most_recent_tolerates_duplicate_open_rows() {
    let t = TestStore::new();
    t.put_raw("owners", "alice@chromium.org", 1, RangeEnd::Unbounded);
    t.put_raw("owners", "bob@chromium.org", 2, RangeEnd::Unbounded);

    let current = t.store.most_recent_by_names(&t.suite, ["owners"]).unwrap();
    assert_eq!(value_of(&current["owners"]), "bob@chromium.org");
}

#[test]
fn most_recent_skips_closed_rows() {
    let t = TestStore::new();
    t.store
        .ingest(&t.suite, 1, &[Candidate::with_new_guid("owners", generic_set("a"))])
        .unwrap();
    t.store
        .ingest(&t.suite, 5, &[Candidate::with_new_guid("owners", generic_set("b"))])
        .unwrap();

    let current = t.store.most_recent_by_names(&t.suite, ["owners"]).unwrap();
    assert_eq!(value_of(&current["owners"]), "b");
}

// =============================================================================
// value_at
// =============================================================================

#[test]
fn value_at_follows_ranges() {
    let t = TestStore::new();
    for (revision, value) in [(10, "a"), (20, "b"), (30, "c")] {
        t.store
            .ingest(&t.suite, revision, &[Candidate::with_new_guid("owners", generic_set(value))])
            .unwrap();
    }

    let value = |rev| {
        t.store
            .value_at(&t.suite, "owners", rev)
            .unwrap()
            .map(|r| value_of(&r.payload))
    };
    assert_eq!(value(9), None);
    assert_eq!(value(10).as_deref(), Some("a"));
    assert_eq!(value(19).as_deref(), Some("a"));
    assert_eq!(value(25).as_deref(), Some("b"));
    assert_eq!(value(Revision::MAX).as_deref(), Some("c"));
}

#[test]
fn value_at_reads_repaired_view_without_writing() {
    let t = TestStore::new();
    t.put_raw("owners", "a", 0, RangeEnd::Unbounded);
    t.put_raw("owners", "b", 10, RangeEnd::Unbounded);
    let rows = t.rows().scan_suite(&t.suite).unwrap();

    let at_5 = t.store.value_at(&t.suite, "owners", 5).unwrap().unwrap();
    assert_eq!(value_of(&at_5.payload), "a");
    assert_eq!(t.rows().scan_suite(&t.suite).unwrap(), rows);
}

// =============================================================================
// diagnostics_between
// =============================================================================

#[test]
fn window_query_orders_newest_first() {
    let t = TestStore::new();
    for (revision, owner, bug) in [(10, "a", "x"), (20, "b", "x"), (30, "c", "y")] {
        t.store
            .ingest(
                &t.suite,
                revision,
                &[
                    Candidate::with_new_guid("owners", generic_set(owner)),
                    Candidate::with_new_guid("bugs", generic_set(bug)),
                ],
            )
            .unwrap();
    }

    let rows = t.store.diagnostics_between(&t.suite, Some(15), None).unwrap();
    let keys: Vec<_> = rows.iter().map(|r| (r.start, r.name.as_str())).collect();
    assert_eq!(keys, vec![(30, "bugs"), (30, "owners"), (20, "owners")]);

    let rows = t.store.diagnostics_between(&t.suite, None, Some(10)).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.start == 10));
}

#[test]
fn window_query_is_capped() {
    let t = TestStore::with_config(EngineConfig::new().query_limit(2));
    for revision in 1..=5 {
        t.store
            .ingest(
                &t.suite,
                revision,
                &[Candidate::with_new_guid("owners", generic_set(&revision.to_string()))],
            )
            .unwrap();
    }

    let rows = t.store.diagnostics_between(&t.suite, None, None).unwrap();
    let starts: Vec<_> = rows.iter().map(|r| r.start).collect();
    assert_eq!(starts, vec![5, 4]);
}
