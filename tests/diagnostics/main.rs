//! Diagnostic Range Integration Tests
//!
//! End-to-end tests through the `DiagnosticStore` facade: insertion paths,
//! repair, read queries, and the partition properties.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all diagnostic tests
//! cargo test --test diagnostics
//!
//! # Run the insertion case table only
//! cargo test --test diagnostics case_table::
//! ```

#[path = "../common/mod.rs"]
mod common;

mod case_table;
mod config;
mod queries;
mod repair;
