//! Rule simulation support
//!
//! This crate provides the dashboard's side of the backend `simulate`
//! endpoint: the dry-run request and response shapes, the match status
//! derived from a per-rule result, and the diff engine that highlights
//! which rules changed status between two runs.
//!
//! Everything here is pure, synchronous data handling; issuing the actual
//! `simulate` call is the data layer's concern.
//!
//! # Key Types
//!
//! - [`SimulationRequest`] / [`SimulationResponse`] - the wire shapes
//! - [`RuleStatus`] - derived per-rule match status
//! - [`compute_simulation_diff`] - baseline vs. changed run comparison

pub mod diff;
pub mod result;

pub use diff::{compute_simulation_diff, ChangedRule, SimulationDiff};
pub use result::{
    ForStatus, RuleStatus, SimulatedRule, SimulationRequest, SimulationResponse,
    SimulationSummary, WOULD_SCHEDULE,
};
