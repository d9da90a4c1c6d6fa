//! Grid-based risk-aware path finding for SafeRoute.
//!
//! This crate provides [`GridSolver`], the default implementation of the
//! [`PathSolver`](saferoute_core::PathSolver) trait. It lays a regular
//! lattice of candidate waypoints over the padded bounding box of the two
//! endpoints, samples the hotspot [`RiskField`](saferoute_core::RiskField) at
//! every node, and runs a best-first search in which entering a risky node
//! inflates the accumulated cost.
//!
//! The lattice is synthetic: it does not follow any street network. When the
//! search cannot reach the goal the solver falls back to the straight line
//! between the endpoints.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod grid;
mod search;
mod solver;

pub use grid::{Grid, GridNode};
pub use search::SearchOutcome;
pub use solver::{GridPlan, GridSolver, GridSolverConfig};
