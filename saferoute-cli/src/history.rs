//! History command implementation for the SafeRoute CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use saferoute_core::{RouteHistoryEntry, SafeRouteResult, SqliteRouteHistory};
use serde::{Deserialize, Serialize};

use crate::route::require_existing;
use crate::{ARG_HISTORY_DB, ARG_USER_ID, CliError, ENV_HISTORY_DB, ENV_HISTORY_USER_ID};

/// CLI arguments for the `history` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "List a user's recorded routes, newest first")]
#[ortho_config(prefix = "SAFEROUTE")]
pub(crate) struct HistoryArgs {
    /// SQLite database where routes were recorded.
    #[arg(long = ARG_HISTORY_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) history_db: Option<Utf8PathBuf>,
    /// User whose routes are listed.
    #[arg(long = ARG_USER_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    /// Show at most this many routes.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

/// Resolved `history` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HistoryConfig {
    pub(crate) history_db: Utf8PathBuf,
    pub(crate) user_id: String,
    pub(crate) limit: Option<usize>,
}

impl TryFrom<HistoryArgs> for HistoryConfig {
    type Error = CliError;

    fn try_from(args: HistoryArgs) -> Result<Self, Self::Error> {
        let history_db = args.history_db.ok_or(CliError::MissingArgument {
            field: ARG_HISTORY_DB,
            env: ENV_HISTORY_DB,
        })?;
        let user_id = args.user_id.ok_or(CliError::MissingArgument {
            field: ARG_USER_ID,
            env: ENV_HISTORY_USER_ID,
        })?;
        Ok(Self {
            history_db,
            user_id,
            limit: args.limit,
        })
    }
}

#[derive(Debug, Serialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<Coord<f64>> for LatLng {
    fn from(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryItem {
    source: LatLng,
    destination: LatLng,
    result: SafeRouteResult,
}

impl From<RouteHistoryEntry> for HistoryItem {
    fn from(entry: RouteHistoryEntry) -> Self {
        Self {
            source: entry.source.into(),
            destination: entry.destination.into(),
            result: entry.result,
        }
    }
}

pub(crate) fn run_history(args: HistoryArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_history_with(args, &mut stdout)
}

pub(crate) fn run_history_with(args: HistoryArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = HistoryConfig::try_from(merged)?;
    require_existing(&config.history_db, ARG_HISTORY_DB)?;

    let history = SqliteRouteHistory::open(config.history_db.as_std_path())?;
    let entries = history.entries_for(&config.user_id)?;
    let items: Vec<HistoryItem> = entries
        .into_iter()
        .take(config.limit.unwrap_or(usize::MAX))
        .map(HistoryItem::from)
        .collect();
    log::debug!("listing {} routes for {}", items.len(), config.user_id);

    let mut payload = serde_json::to_string_pretty(&items).map_err(CliError::SerializeOutput)?;
    payload.push('\n');
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)
}
