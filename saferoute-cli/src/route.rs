//! Route command implementation for the SafeRoute CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use saferoute_core::{
    IncidentRecord, IncidentSource, IncidentSourceError, RouteHistory, RouteHistoryEntry,
    RouteHistoryError, RouteRequest, SafeRouteResult, SafeRouteService, SqliteIncidentSource,
    SqliteRouteHistory,
};
use saferoute_solver_grid::{GridSolver, GridSolverConfig};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_FROM, ARG_GRID_RESOLUTION, ARG_HISTORY_DB, ARG_INCIDENTS_DB, ARG_OUTPUT, ARG_TO,
    ARG_USER_ID, CliError, DEFAULT_INCIDENTS_DB, ENV_ROUTE_FROM, ENV_ROUTE_TO, fs,
};

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Compute a route between two coordinates that steers \
                 around clusters of historical crime incidents. Incidents \
                 are read from a SQLite database with a `crime` table; \
                 the result is printed as JSON.",
    about = "Compute a crime-aware route"
)]
#[ortho_config(prefix = "SAFEROUTE")]
pub(crate) struct RouteArgs {
    /// Starting point as "lat,lng".
    #[arg(long = ARG_FROM, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) from: Option<String>,
    /// Destination as "lat,lng".
    #[arg(long = ARG_TO, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) to: Option<String>,
    /// SQLite database holding the crime incidents (defaults to `crime.db`).
    #[arg(long = ARG_INCIDENTS_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) incidents_db: Option<Utf8PathBuf>,
    /// SQLite database where computed routes are recorded.
    #[arg(long = ARG_HISTORY_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) history_db: Option<Utf8PathBuf>,
    /// User the route is recorded against.
    #[arg(long = ARG_USER_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    /// Cells per side of the search lattice.
    #[arg(long = ARG_GRID_RESOLUTION, value_name = "cells")]
    #[serde(default)]
    pub(crate) grid_resolution: Option<u32>,
    /// Write the JSON result to this file instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RouteConfig {
    pub(crate) source: Coord<f64>,
    pub(crate) destination: Coord<f64>,
    pub(crate) incidents_db: Utf8PathBuf,
    pub(crate) history_db: Option<Utf8PathBuf>,
    pub(crate) user_id: Option<String>,
    pub(crate) grid_resolution: u32,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl RouteConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.incidents_db, ARG_INCIDENTS_DB)
    }

    fn request(&self) -> RouteRequest {
        let request = RouteRequest::new(self.source, self.destination);
        match &self.user_id {
            Some(user_id) => request.with_user_id(user_id.clone()),
            None => request,
        }
    }
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let from = args.from.ok_or(CliError::MissingArgument {
            field: ARG_FROM,
            env: ENV_ROUTE_FROM,
        })?;
        let to = args.to.ok_or(CliError::MissingArgument {
            field: ARG_TO,
            env: ENV_ROUTE_TO,
        })?;
        Ok(Self {
            source: parse_lat_lng(ARG_FROM, &from)?,
            destination: parse_lat_lng(ARG_TO, &to)?,
            incidents_db: args
                .incidents_db
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_INCIDENTS_DB)),
            history_db: args.history_db,
            user_id: args.user_id,
            grid_resolution: args
                .grid_resolution
                .unwrap_or_else(|| GridSolverConfig::default().resolution),
            output: args.output,
        })
    }
}

/// Parse a `"lat,lng"` pair into a coordinate (`x = lng`, `y = lat`).
///
/// Range checks are left to request validation.
pub(crate) fn parse_lat_lng(field: &'static str, value: &str) -> Result<Coord<f64>, CliError> {
    let invalid = || CliError::InvalidCoordinate {
        field,
        value: value.to_owned(),
    };
    let (lat, lng) = value.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
    Ok(Coord { x: lng, y: lat })
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Incident collaborator chosen at runtime.
///
/// A database that is missing or unreadable becomes [`IncidentFeed::Unavailable`],
/// which the route service treats as zero incidents.
#[derive(Debug)]
enum IncidentFeed {
    Sqlite(SqliteIncidentSource),
    Unavailable(String),
}

impl IncidentFeed {
    fn open(config: &RouteConfig) -> Self {
        let opened = config.validate_sources().and_then(|()| {
            SqliteIncidentSource::open(config.incidents_db.as_std_path()).map_err(CliError::from)
        });
        match opened {
            Ok(source) => Self::Sqlite(source),
            Err(err) => {
                log::warn!("routing without incident data: {err}");
                Self::Unavailable(err.to_string())
            }
        }
    }
}

impl IncidentSource for IncidentFeed {
    fn incidents(&self) -> Result<Vec<IncidentRecord>, IncidentSourceError> {
        match self {
            Self::Sqlite(source) => source.incidents(),
            Self::Unavailable(reason) => Err(IncidentSourceError::unavailable(reason.clone())),
        }
    }
}

/// History collaborator chosen at runtime.
#[derive(Debug)]
enum HistorySink {
    Disabled,
    Sqlite(SqliteRouteHistory),
}

impl HistorySink {
    /// History is only opened for identified requests; an unusable database
    /// disables recording for this run.
    fn open(config: &RouteConfig) -> Self {
        let Some(path) = &config.history_db else {
            return Self::Disabled;
        };
        if config.user_id.is_none() {
            log::debug!("no user id; skipping route history at {path}");
            return Self::Disabled;
        }
        match SqliteRouteHistory::open(path.as_std_path()) {
            Ok(history) => Self::Sqlite(history),
            Err(err) => {
                log::warn!("route history disabled: {err}");
                Self::Disabled
            }
        }
    }
}

impl RouteHistory for HistorySink {
    fn record(&self, entry: &RouteHistoryEntry) -> Result<(), RouteHistoryError> {
        match self {
            Self::Disabled => Ok(()),
            Self::Sqlite(history) => history.record(entry),
        }
    }
}

pub(crate) fn run_route(args: RouteArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_route_with(args, &mut stdout)
}

pub(crate) fn run_route_with(args: RouteArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let result = execute_route(&config)?;
    write_route_result(&config, writer, &result)
}

/// Compute a route for `config`.
///
/// Only invalid coordinates fail; unusable incident or history databases are
/// logged and the route is still returned.
pub(crate) fn execute_route(config: &RouteConfig) -> Result<SafeRouteResult, CliError> {
    let incidents = IncidentFeed::open(config);
    let history = HistorySink::open(config);
    let solver = GridSolver::with_config(GridSolverConfig {
        resolution: config.grid_resolution,
        ..GridSolverConfig::default()
    });
    let service = SafeRouteService::new(incidents, solver).with_history(history);
    Ok(service.compute(&config.request())?)
}

fn write_route_result(
    config: &RouteConfig,
    writer: &mut dyn Write,
    result: &SafeRouteResult,
) -> Result<(), CliError> {
    let mut payload = serde_json::to_string_pretty(result).map_err(CliError::SerializeOutput)?;
    payload.push('\n');
    match &config.output {
        Some(path) => {
            fs::write_utf8_file(path, payload.as_bytes()).map_err(CliError::WriteOutput)?;
            log::info!("wrote route to {path}");
            Ok(())
        }
        None => writer
            .write_all(payload.as_bytes())
            .map_err(CliError::WriteOutput),
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RouteConfig, CliError> {
    let merged = RouteArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RouteConfig::try_from(merged)
}
