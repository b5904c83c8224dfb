//! Derived metrics and classification for the network energy dashboard.
//!
//! Everything here is pure and synchronous: callers fetch raw records from
//! the analytics API and pass them in; this crate turns them into
//! severities, signal bands, percentages and statuses. No I/O, no global
//! state.

pub mod claims;
pub mod energy;
pub mod error;
pub mod marker;
pub mod policy;
pub mod severity;
pub mod signal;
pub mod simulation;
pub mod status;
pub mod telemetry;
pub mod threshold;
pub mod trend;
pub mod types;
