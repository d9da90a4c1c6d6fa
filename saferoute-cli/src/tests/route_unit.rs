//! Focused unit tests covering route configuration and execution.

use super::helpers::{CONNAUGHT_PLACE, INDIA_GATE, Workspace};
use super::*;
use crate::route::{RouteArgs, RouteConfig, config_from_layers_for_test, execute_route, parse_lat_lng, run_route_with};
use camino::Utf8PathBuf;
use geo::Coord;
use rstest::rstest;
use saferoute_core::test_support::incident_cluster;
use saferoute_core::{RiskTier, SafeRouteResult, SqliteRouteHistory};

fn args(workspace: &Workspace) -> RouteArgs {
    RouteArgs {
        from: Some(INDIA_GATE.to_owned()),
        to: Some(CONNAUGHT_PLACE.to_owned()),
        incidents_db: Some(workspace.path("crime.db")),
        ..RouteArgs::default()
    }
}

#[rstest]
#[case::plain("28.6129,77.2295", 28.6129, 77.2295)]
#[case::spaced(" 28.6129 , 77.2295 ", 28.6129, 77.2295)]
#[case::southern("-33.8688,151.2093", -33.8688, 151.2093)]
fn parse_lat_lng_accepts_pairs(#[case] value: &str, #[case] lat: f64, #[case] lng: f64) {
    let coord = parse_lat_lng(ARG_FROM, value).expect("valid pair");
    assert_eq!(coord, Coord { x: lng, y: lat });
}

#[rstest]
#[case::no_comma("28.6129")]
#[case::semicolon("28.6129;77.2295")]
#[case::not_a_number("north,77.2295")]
#[case::empty("")]
fn parse_lat_lng_rejects_malformed_values(#[case] value: &str) {
    let err = parse_lat_lng(ARG_TO, value).expect_err("malformed pair");
    match err {
        CliError::InvalidCoordinate { field, value: got } => {
            assert_eq!(field, ARG_TO);
            assert_eq!(got, value);
        }
        other => panic!("expected InvalidCoordinate, found {other:?}"),
    }
}

#[rstest]
#[case::missing_from(ARG_FROM, ENV_ROUTE_FROM)]
#[case::missing_to(ARG_TO, ENV_ROUTE_TO)]
fn converting_without_endpoints_errors(
    #[case] missing: &'static str,
    #[case] expected_env: &'static str,
) {
    let workspace = Workspace::new();
    let mut route_args = args(&workspace);
    if missing == ARG_FROM {
        route_args.from = None;
    } else {
        route_args.to = None;
    }

    let err = RouteConfig::try_from(route_args).expect_err("missing endpoint should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, missing);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn route_config_applies_defaults() {
    let route_args = RouteArgs {
        from: Some(INDIA_GATE.to_owned()),
        to: Some(CONNAUGHT_PLACE.to_owned()),
        ..RouteArgs::default()
    };
    let config = RouteConfig::try_from(route_args).expect("config should build");
    assert_eq!(config.incidents_db, Utf8PathBuf::from("crime.db"));
    assert_eq!(config.grid_resolution, 20);
    assert_eq!(config.history_db, None);
    assert_eq!(config.source, Coord { x: 77.2295, y: 28.6129 });
}

#[rstest]
fn validate_sources_reports_missing_database() {
    let workspace = Workspace::new();
    let config = RouteConfig::try_from(args(&workspace)).expect("config");
    let err = config.validate_sources().expect_err("database is absent");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_INCIDENTS_DB),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_directories() {
    let workspace = Workspace::new();
    std::fs::create_dir(workspace.path("crime.db")).expect("directory");
    let config = RouteConfig::try_from(args(&workspace)).expect("config");
    let err = config.validate_sources().expect_err("directory is not a database");
    assert!(matches!(err, CliError::SourcePathNotFile { .. }));
}

#[rstest]
fn empty_incident_database_yields_direct_route() {
    let workspace = Workspace::new();
    workspace.incidents_db(&[]);
    let config = RouteConfig::try_from(args(&workspace)).expect("config");

    let result = execute_route(&config).expect("route");
    assert_eq!(result.route.len(), 2);
    assert_eq!(result.overall_safety_score, 100);
    assert!(result.hotspots.is_empty());
}

#[rstest]
fn hotspot_database_is_reflected_in_result() {
    let workspace = Workspace::new();
    workspace.incidents_db(&incident_cluster(28.62165, 77.2236, 12, 0.0005));
    let config = RouteConfig::try_from(args(&workspace)).expect("config");

    let result = execute_route(&config).expect("route");
    assert_eq!(result.hotspots.len(), 1);
    assert_eq!(
        result.hotspots.first().map(|h| h.risk_tier),
        Some(RiskTier::High)
    );
    assert!(result.route.len() >= 2);
}

#[rstest]
fn identified_routes_are_recorded() {
    let workspace = Workspace::new();
    workspace.incidents_db(&[]);
    let history_db = workspace.path("history.db");
    let mut route_args = args(&workspace);
    route_args.history_db = Some(history_db.clone());
    route_args.user_id = Some("rider-7".to_owned());
    let config = RouteConfig::try_from(route_args).expect("config");

    execute_route(&config).expect("route");
    let history = SqliteRouteHistory::open(history_db.as_std_path()).expect("history");
    let entries = history.entries_for("rider-7").expect("entries");
    assert_eq!(entries.len(), 1);
}

#[rstest]
fn unopenable_history_database_still_returns_route() {
    let workspace = Workspace::new();
    workspace.incidents_db(&[]);
    let mut route_args = args(&workspace);
    route_args.history_db = Some(workspace.path("no-such-dir/sub/history.db"));
    route_args.user_id = Some("rider-7".to_owned());
    let config = RouteConfig::try_from(route_args).expect("config");

    let result = execute_route(&config).expect("history failure must not fail the route");
    assert_eq!(result.route.len(), 2);
    assert_eq!(result.overall_safety_score, 100);
}

#[rstest]
fn anonymous_routes_leave_history_untouched() {
    let workspace = Workspace::new();
    workspace.incidents_db(&[]);
    let history_db = workspace.path("history.db");
    let mut route_args = args(&workspace);
    route_args.history_db = Some(history_db.clone());
    let config = RouteConfig::try_from(route_args).expect("config");

    execute_route(&config).expect("route");
    assert!(!history_db.exists());
}

#[rstest]
#[case::missing(None)]
#[case::not_sqlite(Some(b"not a sqlite database".as_slice()))]
fn unusable_incident_database_degrades_to_direct_route(#[case] contents: Option<&[u8]>) {
    let workspace = Workspace::new();
    if let Some(bytes) = contents {
        std::fs::write(workspace.path("crime.db"), bytes).expect("write crime.db");
    }
    let config = RouteConfig::try_from(args(&workspace)).expect("config");

    let result = execute_route(&config).expect("incident failure must not fail the route");
    assert_eq!(result.route.len(), 2);
    assert_eq!(result.overall_safety_score, 100);
    assert!(result.hotspots.is_empty());
}

#[rstest]
fn unusable_incident_database_still_rejects_invalid_coordinates() {
    let workspace = Workspace::new();
    let mut route_args = args(&workspace);
    route_args.to = Some("28.6304,181.0".to_owned());
    let config = RouteConfig::try_from(route_args).expect("config");

    let err = execute_route(&config).expect_err("longitude out of range");
    assert!(matches!(err, CliError::Route(_)));
}

#[rstest]
fn invalid_coordinates_surface_as_route_errors() {
    let workspace = Workspace::new();
    workspace.incidents_db(&[]);
    let mut route_args = args(&workspace);
    route_args.from = Some("95.0,77.2".to_owned());
    let config = RouteConfig::try_from(route_args).expect("config");

    let err = execute_route(&config).expect_err("latitude out of range");
    assert!(matches!(err, CliError::Route(_)));
}

#[rstest]
fn output_option_writes_a_file() {
    let workspace = Workspace::new();
    workspace.incidents_db(&[]);
    let output = workspace.root().join("out/route.json");
    let mut route_args = args(&workspace);
    route_args.output = Some(output.clone());
    let mut stdout = Vec::new();

    run_route_with(route_args, &mut stdout).expect("route");
    assert!(stdout.is_empty());
    let written = std::fs::read_to_string(&output).expect("output file");
    let result: SafeRouteResult = serde_json::from_str(&written).expect("route JSON");
    assert_eq!(result.overall_safety_score, 100);
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "grid_resolution": "fine" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    assert!(matches!(err, CliError::Configuration(_)));
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "from": INDIA_GATE,
            "to": INDIA_GATE,
            "grid_resolution": 10,
        }),
        None,
    );
    composer.push_environment(json!({
        "to": CONNAUGHT_PLACE,
        "grid_resolution": 30,
    }));
    composer.push_cli(json!({ "grid_resolution": 40 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.source, Coord { x: 77.2295, y: 28.6129 });
    assert_eq!(config.destination, Coord { x: 77.2177, y: 28.6304 });
    assert_eq!(config.grid_resolution, 40);
}

#[rstest]
fn clap_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "saferoute",
        "route",
        "--from",
        "-33.8688,151.2093",
        "--to",
        "-33.8568,151.2153",
    ])
    .expect("arguments parse");
    match cli.command {
        Command::Route(route_args) => {
            assert_eq!(route_args.from.as_deref(), Some("-33.8688,151.2093"));
        }
        Command::History(_) => panic!("expected route command"),
    }
}
