//! `cadence-report` library crate.
//!
//! Aggregates the `cadence-core` calculators into per-tab dashboard
//! payloads. Re-exports internal modules for integration testing; the
//! binary entrypoint lives in `main.rs`.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod snapshot;
