//! Tests for the `GridSolver`.

use super::*;
use geo::Coord;
use rstest::{fixture, rstest};
use saferoute_core::test_support::incident_cluster;
use saferoute_core::{HotspotAnalyzer, RiskField, RiskTier, haversine_km};

const SOURCE: Coord<f64> = Coord {
    x: 77.2295,
    y: 28.6129,
};
const DESTINATION: Coord<f64> = Coord {
    x: 77.2177,
    y: 28.6304,
};

#[fixture]
fn solver() -> GridSolver {
    GridSolver::default()
}

fn midpoint_hotspot() -> Hotspot {
    let incidents = incident_cluster(28.62165, 77.2236, 12, 0.0005);
    HotspotAnalyzer::default()
        .analyze(&incidents)
        .into_iter()
        .next()
        .expect("cluster forms a hotspot")
}

#[rstest]
fn default_config_matches_documented_values() {
    let config = GridSolverConfig::default();
    assert_eq!(config.resolution, 20);
    assert!((config.padding_deg - 0.01).abs() < f64::EPSILON);
    assert!((config.risk_penalty - 0.5).abs() < f64::EPSILON);
}

#[rstest]
fn path_starts_and_ends_at_nearest_nodes(solver: GridSolver) {
    let plan = solver.plan(SOURCE, DESTINATION, &[]);
    let path = plan.waypoints().expect("goal reached");
    let start = plan.grid.node(plan.start).expect("start node").location;
    let goal = plan.grid.node(plan.goal).expect("goal node").location;
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    assert_eq!(plan.grid.nearest(SOURCE), Some(plan.start));
    assert_eq!(plan.grid.nearest(DESTINATION), Some(plan.goal));
}

#[rstest]
#[expect(clippy::float_arithmetic, reason = "compares path length to a scaled distance")]
fn unobstructed_path_is_short(solver: GridSolver) {
    let path = solver.solve(SOURCE, DESTINATION, &[]);
    let length: f64 = path.windows(2).map(|w| haversine_km(w[0], w[1])).sum();
    let direct = haversine_km(SOURCE, DESTINATION);
    assert!(path.len() >= 2);
    assert!(length < direct * 1.3, "path {length} km vs direct {direct} km");
}

#[rstest]
fn hotspot_on_the_direct_line_is_skirted(solver: GridSolver) {
    let hotspot = midpoint_hotspot();
    assert_eq!(hotspot.risk_tier, RiskTier::High);
    let hotspots = [hotspot];
    let field = RiskField::new(&hotspots);

    let avoided = solver.solve(SOURCE, DESTINATION, &hotspots);
    let worst: f64 = avoided
        .iter()
        .map(|&p| field.risk_at(p))
        .fold(0.0, f64::max);
    let centre = hotspots.first().expect("hotspot").center;
    assert!(field.risk_at(centre) > worst);
}

#[rstest]
fn identical_inputs_produce_identical_paths(solver: GridSolver) {
    let hotspots = [midpoint_hotspot()];
    let first = solver.solve(SOURCE, DESTINATION, &hotspots);
    let second = solver.solve(SOURCE, DESTINATION, &hotspots);
    assert_eq!(first, second);
}

#[rstest]
fn shared_nearest_node_yields_single_waypoint() {
    let solver = GridSolver::with_config(GridSolverConfig {
        resolution: 1,
        ..GridSolverConfig::default()
    });
    let plan = solver.plan(SOURCE, SOURCE, &[]);
    assert_eq!(plan.start, plan.goal);
    assert_eq!(plan.waypoints().map(|p| p.len()), Some(1));
    assert_eq!(solver.solve(SOURCE, SOURCE, &[]).len(), 1);
}

#[rstest]
fn config_is_exposed(solver: GridSolver) {
    assert_eq!(solver.config(), &GridSolverConfig::default());
}

#[rstest]
fn exhausted_plan_has_no_waypoints() {
    let plan = GridPlan {
        grid: Grid::build(SOURCE, DESTINATION, &[], &GridSolverConfig::default()),
        start: 0,
        goal: 1,
        outcome: SearchOutcome::Exhausted,
    };
    assert_eq!(plan.waypoints(), None);
}
