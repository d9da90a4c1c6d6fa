//! Facade crate for the SafeRoute engine.
//!
//! This crate re-exports the core domain types and exposes the grid solver
//! and SQLite collaborators behind feature flags.

#![forbid(unsafe_code)]

pub use saferoute_core::{
    Endpoint, Hotspot, HotspotAnalyzer, HotspotAnalyzerConfig, IncidentRecord, IncidentSource,
    IncidentSourceError, NoHistory, PathSolver, ProximityScorer, RiskAssessment, RiskField,
    RiskTier, RouteError, RouteHistory, RouteHistoryEntry, RouteHistoryError, RouteRequest,
    RouteRequestValidationError, RouteScorer, RouteSegment, SafeRouteError, SafeRouteResult,
    SafeRouteService, ScoreError, ScoredRoute, haversine_km,
};

#[cfg(feature = "store-sqlite")]
pub use saferoute_core::{
    SqliteIncidentSource, SqliteIncidentSourceError, SqliteRouteHistory, SqliteRouteHistoryError,
};

#[cfg(feature = "solver-grid")]
pub use saferoute_solver_grid::{GridSolver, GridSolverConfig};
