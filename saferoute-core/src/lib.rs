//! Core domain types for the SafeRoute engine.
//!
//! The crate turns raw crime incidents into hotspots, answers point risk
//! queries against them, scores candidate paths, and orchestrates a complete
//! route computation through [`SafeRouteService`]. Path finding itself is
//! delegated to a [`PathSolver`] so search strategies can live in their own
//! crates.
//!
//! Coordinates are WGS84 degrees stored in [`geo::Coord`] with
//! `x = longitude` and `y = latitude`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod distance;
pub mod hotspot;
pub mod incident;
pub mod request;
pub mod risk;
pub mod route;
pub mod scorer;
#[cfg(feature = "serde")]
mod serde_coord;
pub mod service;
pub mod solver;
pub mod store;
pub mod test_support;

pub use distance::{EARTH_RADIUS_KM, KM_PER_DEGREE, haversine_km, segment_distance_km};
pub use hotspot::{
    Hotspot, HotspotAnalyzer, HotspotAnalyzerConfig, ParseRiskTierError, RiskTier,
};
pub use incident::IncidentRecord;
pub use request::{Endpoint, RouteRequest, RouteRequestValidationError};
pub use risk::{RiskAssessment, RiskField, SAFETY_MARGIN};
pub use route::{RouteError, RouteSegment, SafeRouteResult};
pub use scorer::{ProximityScorer, RouteScorer, ScoreError, ScoredRoute, safety_score};
pub use service::{SafeRouteError, SafeRouteService};
pub use solver::PathSolver;
pub use store::{
    IncidentSource, IncidentSourceError, NoHistory, RouteHistory, RouteHistoryEntry,
    RouteHistoryError,
};

#[cfg(feature = "store-sqlite")]
pub use store::{
    SqliteIncidentSource, SqliteIncidentSourceError, SqliteRouteHistory, SqliteRouteHistoryError,
};
