//! Command-line interface for the SafeRoute engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod history;
mod route;

pub use error::CliError;

use history::{HistoryArgs, run_history};
use route::{RouteArgs, run_route};

pub(crate) const ARG_FROM: &str = "from";
pub(crate) const ARG_TO: &str = "to";
pub(crate) const ARG_INCIDENTS_DB: &str = "incidents-db";
pub(crate) const ARG_HISTORY_DB: &str = "history-db";
pub(crate) const ARG_USER_ID: &str = "user-id";
pub(crate) const ARG_GRID_RESOLUTION: &str = "grid-resolution";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ENV_ROUTE_FROM: &str = "SAFEROUTE_CMDS_ROUTE_FROM";
pub(crate) const ENV_ROUTE_TO: &str = "SAFEROUTE_CMDS_ROUTE_TO";
pub(crate) const ENV_HISTORY_DB: &str = "SAFEROUTE_CMDS_HISTORY_HISTORY_DB";
pub(crate) const ENV_HISTORY_USER_ID: &str = "SAFEROUTE_CMDS_HISTORY_USER_ID";

/// Default incident database filename, resolved against the working directory.
pub(crate) const DEFAULT_INCIDENTS_DB: &str = "crime.db";

/// Run the SafeRoute CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Route(args) => run_route(args),
        Command::History(args) => run_history(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "saferoute",
    about = "Crime-aware route planning backed by historical incident data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute a route that steers around crime hotspots.
    Route(RouteArgs),
    /// List the routes previously recorded for a user.
    History(HistoryArgs),
}

#[cfg(test)]
mod tests;
