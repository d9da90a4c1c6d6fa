//! Error types emitted by the SafeRoute CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use saferoute_core::{SafeRouteError, SqliteIncidentSourceError, SqliteRouteHistoryError};
use thiserror::Error;

/// Errors emitted by the SafeRoute CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A coordinate option is not of the form `lat,lng`.
    #[error("{field} value {value:?} is not a \"lat,lng\" pair")]
    InvalidCoordinate { field: &'static str, value: String },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the incident database failed.
    #[error(transparent)]
    OpenIncidents(#[from] SqliteIncidentSourceError),
    /// Opening or querying the route history database failed.
    #[error(transparent)]
    History(#[from] SqliteRouteHistoryError),
    /// The route service rejected the request.
    #[error("route computation failed: {0}")]
    Route(#[from] SafeRouteError),
    /// Serializing the command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
