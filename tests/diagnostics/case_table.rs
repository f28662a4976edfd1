//! Insertion case table
//!
//! Each case seeds `foo` by adding open rows one at a time (each followed by
//! a repair pass, which also records the row's start as a known revision),
//! inserts one candidate, and checks the exact stored rows.

use crate::common::*;
use diagstore::Revision;

const NAME: &str = "foo";

/// Seed open rows, insert `(value, revision)` with `last_known`, return the store
fn run(
    seed: &[(&str, Revision)],
    value: &str,
    revision: Revision,
    last_known: Revision,
) -> TestStore {
    let t = TestStore::new();
    for (seed_value, start) in seed {
        t.add(NAME, seed_value, *start);
    }

    let (candidate, mapping) = t.insert(NAME, value, revision, last_known);
    if !mapping.is_empty() {
        t.assert_mapped(&candidate, &mapping, revision);
    }
    t.assert_partition(NAME);
    t
}

// =============================================================================
// Latest (fast path)
// =============================================================================

#[test]
fn latest_same() {
    let t = run(&[("m1", 1)], "m1", 10, 10);
    assert_eq!(t.shape(NAME), vec![open(1, "m1")]);
}

#[test]
fn latest_different() {
    let t = run(&[("m1", 1)], "m2", 10, 10);
    assert_eq!(t.shape(NAME), vec![at(1, 9, "m1"), open(10, "m2")]);
}

#[test]
fn latest_invalid() {
    let t = TestStore::new();
    let invalid = t.add(NAME, "m1", 1);
    t.corrupt(invalid);

    t.insert(NAME, "m2", 10, 10);
    assert_eq!(t.shape(NAME), vec![open(10, "m2")]);
    assert_eq!(t.raw_row_count(NAME), 1);
}

#[test]
fn latest_new() {
    let t = run(&[], "m1", 10, 10);
    assert_eq!(t.shape(NAME), vec![open(10, "m1")]);
}

// =============================================================================
// Out of order: covered by an equal range or before every range
// =============================================================================

#[test]
fn out_of_order_same() {
    let t = run(&[("m1", 1), ("m1", 10)], "m1", 5, 10);
    assert_eq!(t.shape(NAME), vec![open(1, "m1")]);
}

#[test]
fn out_of_order_before_same() {
    let t = run(&[("m1", 5), ("m1", 10)], "m1", 1, 10);
    assert_eq!(t.shape(NAME), vec![open(1, "m1")]);
}

#[test]
fn out_of_order_before_diff() {
    let t = run(&[("m1", 5), ("m1", 10)], "m2", 1, 10);
    assert_eq!(t.shape(NAME), vec![at(1, 4, "m2"), open(5, "m1")]);
}

// =============================================================================
// Out of order: interior splits
// =============================================================================

#[test]
fn splits_cur_same_next_diff() {
    let t = run(&[("m1", 1), ("m1", 10)], "m2", 5, 10);
    assert_eq!(
        t.shape(NAME),
        vec![at(1, 4, "m1"), at(5, 9, "m2"), open(10, "m1")]
    );
}

#[test]
fn splits_cur_diff_next_none() {
    let t = run(&[("m1", 1), ("m1", 10)], "m2", 12, 10);
    assert_eq!(t.shape(NAME), vec![at(1, 11, "m1"), open(12, "m2")]);
}

#[test]
fn splits_cur_diff_next_none_rev() {
    let t = run(&[("m1", 1), ("m1", 10)], "m2", 8, 10);
    assert_eq!(
        t.shape(NAME),
        vec![at(1, 7, "m1"), at(8, 9, "m2"), open(10, "m1")]
    );
}

#[test]
fn splits_cur_diff_has_revs() {
    let t = run(&[("m1", 1), ("m1", 8), ("m2", 10)], "m2", 5, 10);
    assert_eq!(
        t.shape(NAME),
        vec![at(1, 4, "m1"), at(5, 7, "m2"), at(8, 9, "m1"), open(10, "m2")]
    );
}

#[test]
fn splits_cur_diff_next_diff() {
    let t = run(&[("m1", 1), ("m3", 10)], "m2", 5, 10);
    assert_eq!(
        t.shape(NAME),
        vec![at(1, 4, "m1"), at(5, 9, "m2"), open(10, "m3")]
    );
}

#[test]
fn splits_cur_diff_next_same() {
    let t = run(&[("m1", 1), ("m3", 10)], "m3", 5, 10);
    assert_eq!(t.shape(NAME), vec![at(1, 4, "m1"), open(5, "m3")]);
}

// =============================================================================
// Out of order: replacing a range from its start
// =============================================================================

#[test]
fn clobber_no_next_no_revs() {
    let t = run(&[("m1", 1), ("m3", 10)], "m2", 10, 10);
    assert_eq!(t.shape(NAME), vec![at(1, 9, "m1"), open(10, "m2")]);
}

#[test]
fn clobber_no_next_revs() {
    let t = run(&[("m1", 1), ("m3", 10), ("m3", 15)], "m2", 10, 15);
    assert_eq!(
        t.shape(NAME),
        vec![at(1, 9, "m1"), at(10, 14, "m2"), open(15, "m3")]
    );
}

#[test]
fn clobber_next_revs() {
    let t = run(&[("m1", 1), ("m3", 10), ("m3", 13), ("m4", 15)], "m2", 10, 15);
    assert_eq!(
        t.shape(NAME),
        vec![at(1, 9, "m1"), at(10, 12, "m2"), at(13, 14, "m3"), open(15, "m4")]
    );
}

#[test]
fn clobber_next_revs_same() {
    let t = run(&[("m1", 1), ("m3", 10), ("m2", 15)], "m2", 10, 15);
    assert_eq!(t.shape(NAME), vec![at(1, 9, "m1"), open(10, "m2")]);
}

#[test]
fn clobber_next_no_revs_diff() {
    let t = run(&[("m1", 1), ("m2", 10), ("m3", 15)], "m4", 10, 15);
    assert_eq!(
        t.shape(NAME),
        vec![at(1, 9, "m1"), at(10, 14, "m4"), open(15, "m3")]
    );
}

#[test]
fn clobber_next_no_revs_same() {
    let t = run(&[("m1", 1), ("m2", 10), ("m3", 15)], "m3", 10, 15);
    assert_eq!(t.shape(NAME), vec![at(1, 9, "m1"), open(10, "m3")]);
}

#[test]
fn clobber_next_prev_same() {
    let t = run(&[("m1", 1), ("m2", 10), ("m1", 15)], "m1", 10, 15);
    assert_eq!(t.shape(NAME), vec![open(1, "m1")]);
}

#[test]
fn clobber_next_diff_prev_same() {
    let t = run(&[("m1", 1), ("m2", 10), ("m3", 15)], "m1", 10, 15);
    assert_eq!(t.shape(NAME), vec![at(1, 14, "m1"), open(15, "m3")]);
}

// =============================================================================
// Out of order: malformed stored rows
// =============================================================================

#[test]
fn last_invalid() {
    let t = TestStore::new();
    t.add_until(NAME, "m1", 1, diagstore::RangeEnd::At(Revision::MAX - 1));
    let invalid = t.add(NAME, "m2", 5);
    t.corrupt(invalid);

    let (candidate, mapping) = t.insert(NAME, "m3", 3, 5);
    assert!(mapping.is_empty());
    assert_eq!(
        t.shape(NAME),
        vec![at(1, 2, "m1"), at(3, 4, "m3"), open(5, "m1")]
    );
    assert_eq!(t.raw_row_count(NAME), 3);
    assert_eq!(
        t.store.value_at(&t.suite, NAME, 3).unwrap().unwrap().guid,
        candidate.guid
    );
}

#[test]
fn all_invalid() {
    let t = TestStore::new();
    let invalid = t.add(NAME, "m1", 5);
    t.corrupt(invalid);

    t.insert(NAME, "m2", 1, 5);
    assert_eq!(t.shape(NAME), vec![open(1, "m2")]);
    assert_eq!(t.raw_row_count(NAME), 1);
}
