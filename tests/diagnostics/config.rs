//! Configuration loading and strict consistency handling

use crate::common::*;
use diagstore::prelude::*;
use std::io::Write;

#[test]
fn load_config_file_into_builder() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "strict_consistency = true").unwrap();
    writeln!(file, "query_limit = 50").unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    let store = DiagnosticStore::builder().config(config).build();

    assert!(store.config().strict_consistency);
    assert_eq!(store.config().query_limit, 50);
}

#[test]
fn bad_config_file_is_a_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "query_limit = \"many\"").unwrap();

    let err: Error = EngineConfig::load(file.path()).unwrap_err().into();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn strict_mode_rejects_damaged_rows() {
    let t = TestStore::with_config(EngineConfig::new().strict_consistency(true));
    t.put_raw("owners", "a", 0, RangeEnd::Unbounded);
    t.put_raw("owners", "b", 10, RangeEnd::Unbounded);

    let err = t
        .store
        .insert(&t.suite, 20, &[Candidate::with_new_guid("owners", generic_set("c"))], 20)
        .unwrap_err();
    assert!(err.is_consistency());
    assert!(!err.is_retryable());
    assert_eq!(t.raw_row_count("owners"), 2);

    // A repair pass unblocks the name
    t.store.fix_diagnostics(&t.suite).unwrap();
    t.store
        .insert(&t.suite, 20, &[Candidate::with_new_guid("owners", generic_set("c"))], 20)
        .unwrap();
    assert_eq!(
        t.shape("owners"),
        vec![at(0, 9, "a"), at(10, 19, "b"), open(20, "c")]
    );
}

#[test]
fn lenient_mode_repairs_on_insert() {
    let t = TestStore::new();
    t.put_raw("owners", "a", 0, RangeEnd::Unbounded);
    t.put_raw("owners", "b", 10, RangeEnd::Unbounded);

    t.store
        .insert(&t.suite, 20, &[Candidate::with_new_guid("owners", generic_set("c"))], 20)
        .unwrap();
    assert_eq!(
        t.shape("owners"),
        vec![at(0, 9, "a"), at(10, 19, "b"), open(20, "c")]
    );
}
