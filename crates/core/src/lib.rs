//! `cadence-core` -- forecast and metrics-blending engine.
//!
//! Pure functions that turn historical weekly series into forecasts,
//! trend indicators, blended current-week estimates and performance
//! tiers for the DORA and Flow dashboards. Nothing in this crate performs
//! I/O; callers pass in clean numeric sequences and receive typed records.

pub mod blend;
pub mod error;
pub mod flow;
pub mod forecast;
pub mod metrics;
pub mod numeric;
pub mod pert;
pub mod threshold_validation;
pub mod tiers;
pub mod trend;

pub use error::CoreError;
