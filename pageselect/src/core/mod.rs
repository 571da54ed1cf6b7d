//! Deterministic, pure selection logic.
//!
//! Core modules are free of I/O. They operate on in-memory pages and selection
//! sets and return deterministic outputs suitable for tests.

pub mod bulk_input;
pub mod pager;
pub mod reconcile;
pub mod reconciler;
pub mod types;
