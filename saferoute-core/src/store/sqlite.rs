//! SQLite-backed incident source and route history.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Mutex,
};

use geo::Coord;
use rusqlite::{Connection, OpenFlags, params};
use thiserror::Error;

use crate::{IncidentRecord, SafeRouteResult};

use super::{
    IncidentSource, IncidentSourceError, RouteHistory, RouteHistoryEntry, RouteHistoryError,
};

const SELECT_INCIDENTS: &str = r#"SELECT nm_pol, lat, long, totalcrime, "crime/area"
    FROM crime
    WHERE lat IS NOT NULL AND long IS NOT NULL
    ORDER BY rowid"#;

const CREATE_HISTORY: &str = "CREATE TABLE IF NOT EXISTS route_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    source_lat REAL NOT NULL,
    source_lng REAL NOT NULL,
    destination_lat REAL NOT NULL,
    destination_lng REAL NOT NULL,
    route_data TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Error raised when reading incidents from SQLite.
#[derive(Debug, Error)]
pub enum SqliteIncidentSourceError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The database lacks the `crime` table or one of its columns.
    #[error("database at {path} does not expose the expected crime table: {source}")]
    Schema {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Generic SQLite error when reading incident rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Read-only incident source over a `crime` table.
///
/// Every call to [`IncidentSource::incidents`] opens its own read-only
/// connection, so the source can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct SqliteIncidentSource {
    path: PathBuf,
}

impl SqliteIncidentSource {
    /// Validate that `path` holds a readable `crime` table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SqliteIncidentSourceError> {
        let path = path.as_ref().to_path_buf();
        let connection = connect_read_only(&path)?;
        connection
            .prepare(SELECT_INCIDENTS)
            .map_err(|source| SqliteIncidentSourceError::Schema {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path })
    }

    /// Location of the backing database.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all located incidents in `rowid` order.
    pub fn load(&self) -> Result<Vec<IncidentRecord>, SqliteIncidentSourceError> {
        let connection = connect_read_only(&self.path)?;
        let mut statement = connection.prepare(SELECT_INCIDENTS)?;
        let mut rows = statement.query([])?;
        let mut incidents = Vec::new();

        while let Some(row) = rows.next()? {
            let name: Option<String> = row.get(0)?;
            let total: Option<i64> = row.get(3)?;
            let density: Option<f64> = row.get(4)?;
            incidents.push(IncidentRecord {
                name: name.unwrap_or_default(),
                lat: row.get(1)?,
                lng: row.get(2)?,
                total_count: total.and_then(|count| u32::try_from(count).ok()),
                density: density.unwrap_or_default(),
            });
        }

        Ok(incidents)
    }
}

impl IncidentSource for SqliteIncidentSource {
    fn incidents(&self) -> Result<Vec<IncidentRecord>, IncidentSourceError> {
        self.load().map_err(IncidentSourceError::unavailable)
    }
}

fn connect_read_only(path: &Path) -> Result<Connection, SqliteIncidentSourceError> {
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(|source| {
        SqliteIncidentSourceError::OpenDatabase {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Error raised when writing or reading route history.
#[derive(Debug, Error)]
pub enum SqliteRouteHistoryError {
    /// Opening or initialising the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The route could not be encoded or decoded as JSON.
    #[error("failed to encode route data: {0}")]
    RouteData(#[from] serde_json::Error),
    /// A previous writer panicked while holding the connection.
    #[error("route history connection lock was poisoned")]
    Poisoned,
    /// Generic SQLite error when reading or writing rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Route history persisted in a `route_history` table.
pub struct SqliteRouteHistory {
    path: PathBuf,
    connection: Mutex<Connection>,
}

impl fmt::Debug for SqliteRouteHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteRouteHistory")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteRouteHistory {
    /// Open (or create) the database at `path` and ensure the history table exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SqliteRouteHistoryError> {
        let path = path.as_ref().to_path_buf();
        let open_error = |source| SqliteRouteHistoryError::OpenDatabase {
            path: path.clone(),
            source,
        };
        let connection = Connection::open(&path).map_err(open_error)?;
        connection.execute(CREATE_HISTORY, []).map_err(open_error)?;
        Ok(Self {
            path,
            connection: Mutex::new(connection),
        })
    }

    /// Insert a single entry.
    pub fn insert(&self, entry: &RouteHistoryEntry) -> Result<(), SqliteRouteHistoryError> {
        let route_data = serde_json::to_string(&entry.result)?;
        let connection = self
            .connection
            .lock()
            .map_err(|_| SqliteRouteHistoryError::Poisoned)?;
        connection.execute(
            "INSERT INTO route_history
                (user_id, source_lat, source_lng, destination_lat, destination_lng, route_data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.user_id,
                entry.source.y,
                entry.source.x,
                entry.destination.y,
                entry.destination.x,
                route_data,
            ],
        )?;
        Ok(())
    }

    /// Return a user's recorded routes, newest first.
    pub fn entries_for(
        &self,
        user_id: &str,
    ) -> Result<Vec<RouteHistoryEntry>, SqliteRouteHistoryError> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| SqliteRouteHistoryError::Poisoned)?;
        let mut statement = connection.prepare(
            "SELECT user_id, source_lat, source_lng, destination_lat, destination_lng, route_data
             FROM route_history
             WHERE user_id = ?1
             ORDER BY id DESC",
        )?;
        let mut rows = statement.query([user_id])?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            let route_data: String = row.get(5)?;
            let result: SafeRouteResult = serde_json::from_str(&route_data)?;
            entries.push(RouteHistoryEntry {
                user_id: row.get(0)?,
                source: Coord {
                    x: row.get(2)?,
                    y: row.get(1)?,
                },
                destination: Coord {
                    x: row.get(4)?,
                    y: row.get(3)?,
                },
                result,
            });
        }

        Ok(entries)
    }
}

impl RouteHistory for SqliteRouteHistory {
    fn record(&self, entry: &RouteHistoryEntry) -> Result<(), RouteHistoryError> {
        self.insert(entry).map_err(RouteHistoryError::write_failed)
    }
}
