//! Request-scoped orchestration of a safe route computation.
//!
//! [`SafeRouteService`] validates a [`RouteRequest`], derives hotspots from
//! the configured [`IncidentSource`], asks a [`PathSolver`] for a path,
//! scores it and optionally records the outcome. Only invalid requests and
//! scorer rejections surface as errors; unavailable incident data and
//! history failures degrade to a best-effort result.

use geo::Coord;
use thiserror::Error;

use crate::{
    Hotspot, HotspotAnalyzer, IncidentSource, NoHistory, PathSolver, ProximityScorer, RouteError,
    RouteHistory, RouteHistoryEntry, RouteRequest, RouteRequestValidationError, RouteScorer,
    SafeRouteResult, ScoreError,
};

/// Errors returned by [`SafeRouteService::compute`].
#[derive(Debug, Error)]
pub enum SafeRouteError {
    /// The request failed validation.
    #[error("invalid route request: {0}")]
    InvalidRequest(#[from] RouteRequestValidationError),
    /// The scorer rejected the computed path.
    #[error("failed to score route: {0}")]
    Scoring(#[from] ScoreError),
    /// The assembled result violated its invariants.
    #[error("failed to assemble route result: {0}")]
    InvalidResult(#[from] RouteError),
}

/// Computes safe routes for individual requests.
///
/// The service holds no per-request state, so a single instance can serve
/// concurrent requests when its collaborators allow it.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::test_support::{DirectLineSolver, MemoryIncidentSource};
/// use saferoute_core::{RouteRequest, SafeRouteService};
///
/// # fn main() -> Result<(), saferoute_core::SafeRouteError> {
/// let service = SafeRouteService::new(MemoryIncidentSource::default(), DirectLineSolver);
/// let request = RouteRequest::new(
///     Coord { x: 77.2295, y: 28.6129 },
///     Coord { x: 77.2177, y: 28.6304 },
/// );
/// let result = service.compute(&request)?;
/// assert_eq!(result.route.len(), 2);
/// assert_eq!(result.overall_safety_score, 100);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SafeRouteService<S, P, H = NoHistory, R = ProximityScorer> {
    incidents: S,
    solver: P,
    history: H,
    scorer: R,
    analyzer: HotspotAnalyzer,
}

impl<S, P> SafeRouteService<S, P> {
    /// Create a service with the proximity scorer, default clustering and no
    /// history sink.
    pub fn new(incidents: S, solver: P) -> Self {
        Self {
            incidents,
            solver,
            history: NoHistory,
            scorer: ProximityScorer,
            analyzer: HotspotAnalyzer::default(),
        }
    }
}

impl<S, P, H, R> SafeRouteService<S, P, H, R> {
    /// Record results for identified users in `history`.
    pub fn with_history<H2>(self, history: H2) -> SafeRouteService<S, P, H2, R> {
        SafeRouteService {
            incidents: self.incidents,
            solver: self.solver,
            history,
            scorer: self.scorer,
            analyzer: self.analyzer,
        }
    }

    /// Replace the route scorer.
    pub fn with_scorer<R2>(self, scorer: R2) -> SafeRouteService<S, P, H, R2> {
        SafeRouteService {
            incidents: self.incidents,
            solver: self.solver,
            history: self.history,
            scorer,
            analyzer: self.analyzer,
        }
    }

    /// Replace the hotspot analyzer.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: HotspotAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }
}

impl<S, P, H, R> SafeRouteService<S, P, H, R>
where
    S: IncidentSource,
    P: PathSolver,
    H: RouteHistory,
    R: RouteScorer,
{
    /// Compute a scored route for `request`.
    pub fn compute(&self, request: &RouteRequest) -> Result<SafeRouteResult, SafeRouteError> {
        request.validate()?;

        let incidents = self.incidents.incidents().unwrap_or_else(|err| {
            log::warn!("routing without hotspots: {err}");
            Vec::new()
        });
        let hotspots = self.analyzer.analyze(&incidents);
        let route = self.find_path(request.source, request.destination, &hotspots);
        let scored = self.scorer.score(&route, &hotspots)?;
        let result = SafeRouteResult::new(
            route,
            scored.segments,
            scored.overall_safety_score,
            hotspots,
        )?;

        log::info!(
            "computed route with {} points and safety score {} against {} hotspots",
            result.route.len(),
            result.overall_safety_score,
            result.hotspots.len()
        );

        if let Some(user_id) = &request.user_id {
            self.record(user_id, request, &result);
        }

        Ok(result)
    }

    fn find_path(
        &self,
        source: Coord<f64>,
        destination: Coord<f64>,
        hotspots: &[Hotspot],
    ) -> Vec<Coord<f64>> {
        if hotspots.is_empty() {
            return vec![source, destination];
        }
        let path = self.solver.solve(source, destination, hotspots);
        if path.len() < 2 {
            log::debug!(
                "solver returned {} point(s); using the direct line",
                path.len()
            );
            return vec![source, destination];
        }
        path
    }

    fn record(&self, user_id: &str, request: &RouteRequest, result: &SafeRouteResult) {
        let entry = RouteHistoryEntry {
            user_id: user_id.to_owned(),
            source: request.source,
            destination: request.destination,
            result: result.clone(),
        };
        if let Err(err) = self.history.record(&entry) {
            log::warn!("route history not recorded for user {user_id}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        DirectLineSolver, FailingIncidentSource, FailingRouteHistory, FixedPathSolver,
        MemoryIncidentSource, MemoryRouteHistory, incident_cluster,
    };
    use crate::RiskTier;
    use rstest::{fixture, rstest};

    const SOURCE: Coord<f64> = Coord {
        x: 77.2295,
        y: 28.6129,
    };
    const DESTINATION: Coord<f64> = Coord {
        x: 77.2177,
        y: 28.6304,
    };

    #[fixture]
    fn request() -> RouteRequest {
        RouteRequest::new(SOURCE, DESTINATION)
    }

    #[fixture]
    fn hotspot_source() -> MemoryIncidentSource {
        MemoryIncidentSource::with_incidents(incident_cluster(28.62165, 77.2236, 12, 0.0005))
    }

    #[rstest]
    fn rejects_invalid_requests() {
        let service = SafeRouteService::new(MemoryIncidentSource::default(), DirectLineSolver);
        let request = RouteRequest::new(Coord { x: 0.0, y: f64::NAN }, DESTINATION);
        let err = service.compute(&request).expect_err("invalid");
        assert!(matches!(
            err,
            SafeRouteError::InvalidRequest(RouteRequestValidationError::NonFiniteCoordinate { .. })
        ));
    }

    #[rstest]
    fn empty_incidents_yield_direct_line(request: RouteRequest) {
        let solver = FixedPathSolver::new(vec![SOURCE, SOURCE, DESTINATION]);
        let service = SafeRouteService::new(MemoryIncidentSource::default(), solver);
        let result = service.compute(&request).expect("route");
        assert_eq!(result.route, vec![SOURCE, DESTINATION]);
        assert_eq!(result.overall_safety_score, 100);
        assert!(result.hotspots.is_empty());
    }

    #[rstest]
    fn unavailable_incidents_degrade_to_direct_line(request: RouteRequest) {
        let service = SafeRouteService::new(FailingIncidentSource, DirectLineSolver);
        let result = service.compute(&request).expect("route");
        assert_eq!(result.route, vec![SOURCE, DESTINATION]);
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].risk_tier, RiskTier::Low);
    }

    #[rstest]
    fn hotspots_route_through_solver(request: RouteRequest, hotspot_source: MemoryIncidentSource) {
        let detour = vec![SOURCE, Coord { x: 77.20, y: 28.62 }, DESTINATION];
        let service = SafeRouteService::new(hotspot_source, FixedPathSolver::new(detour.clone()));
        let result = service.compute(&request).expect("route");
        assert_eq!(result.route, detour);
        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.hotspots.len(), 1);
        assert_eq!(result.hotspots[0].risk_tier, RiskTier::High);
    }

    #[rstest]
    #[case::single_point(vec![SOURCE])]
    #[case::empty(Vec::new())]
    fn short_solver_paths_fall_back(
        request: RouteRequest,
        hotspot_source: MemoryIncidentSource,
        #[case] path: Vec<Coord<f64>>,
    ) {
        let service = SafeRouteService::new(hotspot_source, FixedPathSolver::new(path));
        let result = service.compute(&request).expect("route");
        assert_eq!(result.route, vec![SOURCE, DESTINATION]);
    }

    #[rstest]
    fn crossing_a_high_hotspot_lowers_the_score(
        request: RouteRequest,
        hotspot_source: MemoryIncidentSource,
    ) {
        let service = SafeRouteService::new(hotspot_source, DirectLineSolver);
        let result = service.compute(&request).expect("route");
        assert_eq!(result.segments[0].risk_tier, RiskTier::High);
        assert_eq!(result.overall_safety_score, 70);
    }

    #[rstest]
    fn records_history_for_identified_users(request: RouteRequest) {
        let history = MemoryRouteHistory::default();
        let service = SafeRouteService::new(MemoryIncidentSource::default(), DirectLineSolver)
            .with_history(&history);

        service.compute(&request).expect("anonymous route");
        assert!(history.entries().is_empty());

        let result = service
            .compute(&request.clone().with_user_id("ravi"))
            .expect("identified route");
        let entries = history.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id, "ravi");
        assert_eq!(entries[0].source, SOURCE);
        assert_eq!(entries[0].result, result);
    }

    #[rstest]
    fn history_failures_do_not_fail_the_request(request: RouteRequest) {
        let service = SafeRouteService::new(MemoryIncidentSource::default(), DirectLineSolver)
            .with_history(FailingRouteHistory);
        let result = service.compute(&request.with_user_id("meera"));
        assert!(result.is_ok());
    }

    #[rstest]
    fn scorer_rejections_surface_as_errors(request: RouteRequest) {
        struct Rejecting;
        impl RouteScorer for Rejecting {
            fn score(
                &self,
                route: &[Coord<f64>],
                _: &[Hotspot],
            ) -> Result<crate::ScoredRoute, ScoreError> {
                Err(ScoreError::DegenerateRoute {
                    points: route.len(),
                })
            }
        }

        let service = SafeRouteService::new(MemoryIncidentSource::default(), DirectLineSolver)
            .with_scorer(Rejecting);
        let err = service.compute(&request).expect_err("rejected");
        assert!(matches!(err, SafeRouteError::Scoring(_)));
    }
}
