//! In-memory collaborators and fixture builders used by unit and behaviour
//! tests.

use std::f64::consts::TAU;
use std::sync::{Mutex, PoisonError};

use geo::Coord;

use crate::{
    Hotspot, IncidentRecord, IncidentSource, IncidentSourceError, PathSolver, RouteHistory,
    RouteHistoryEntry, RouteHistoryError,
};

/// In-memory `IncidentSource` used in tests.
#[derive(Default, Debug, Clone)]
pub struct MemoryIncidentSource {
    incidents: Vec<IncidentRecord>,
}

impl MemoryIncidentSource {
    /// Create a source from a collection of records.
    pub fn with_incidents<I>(incidents: I) -> Self
    where
        I: IntoIterator<Item = IncidentRecord>,
    {
        Self {
            incidents: incidents.into_iter().collect(),
        }
    }
}

impl IncidentSource for MemoryIncidentSource {
    fn incidents(&self) -> Result<Vec<IncidentRecord>, IncidentSourceError> {
        Ok(self
            .incidents
            .iter()
            .filter(|record| record.location().is_some())
            .cloned()
            .collect())
    }
}

/// In-memory `RouteHistory` that keeps every recorded entry.
#[derive(Default, Debug)]
pub struct MemoryRouteHistory {
    entries: Mutex<Vec<RouteHistoryEntry>>,
}

impl MemoryRouteHistory {
    /// Snapshot of the recorded entries in write order.
    pub fn entries(&self) -> Vec<RouteHistoryEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RouteHistory for MemoryRouteHistory {
    fn record(&self, entry: &RouteHistoryEntry) -> Result<(), RouteHistoryError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        Ok(())
    }
}

/// `PathSolver` that always returns the straight line between the endpoints.
#[derive(Default, Debug, Copy, Clone)]
pub struct DirectLineSolver;

impl PathSolver for DirectLineSolver {
    fn solve(
        &self,
        source: Coord<f64>,
        destination: Coord<f64>,
        _hotspots: &[Hotspot],
    ) -> Vec<Coord<f64>> {
        vec![source, destination]
    }
}

/// `IncidentSource` whose backing store is always unreachable.
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
#[derive(Default, Debug, Copy, Clone)]
pub struct FailingIncidentSource;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
impl IncidentSource for FailingIncidentSource {
    fn incidents(&self) -> Result<Vec<IncidentRecord>, IncidentSourceError> {
        Err(IncidentSourceError::unavailable("incident store offline"))
    }
}

/// `RouteHistory` that rejects every write.
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
#[derive(Default, Debug, Copy, Clone)]
pub struct FailingRouteHistory;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
impl RouteHistory for FailingRouteHistory {
    fn record(&self, _entry: &RouteHistoryEntry) -> Result<(), RouteHistoryError> {
        Err(RouteHistoryError::write_failed("history store offline"))
    }
}

/// `PathSolver` that ignores its inputs and returns a canned path.
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
#[derive(Default, Debug, Clone)]
pub struct FixedPathSolver {
    path: Vec<Coord<f64>>,
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
impl FixedPathSolver {
    /// Create a solver returning `path` for every request.
    pub fn new(path: Vec<Coord<f64>>) -> Self {
        Self { path }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
impl PathSolver for FixedPathSolver {
    fn solve(&self, _: Coord<f64>, _: Coord<f64>, _: &[Hotspot]) -> Vec<Coord<f64>> {
        self.path.clone()
    }
}

/// A located incident with placeholder name and counts.
pub fn incident_at(lat: f64, lng: f64) -> IncidentRecord {
    IncidentRecord::at(format!("station@{lat:.4},{lng:.4}"), Coord { x: lng, y: lat })
}

/// `count` incidents evenly spaced on a circle of `spread` degrees around
/// `(lat, lng)`.
///
/// Any two members are at most `2 * spread` degrees apart, so a spread below
/// half the clustering epsilon guarantees a single cluster.
pub fn incident_cluster(lat: f64, lng: f64, count: usize, spread: f64) -> Vec<IncidentRecord> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f64 / count as f64;
            incident_at(lat + spread * angle.sin(), lng + spread * angle.cos())
        })
        .collect()
}

/// Create a SQLite database with a `crime` table holding `incidents`.
#[cfg(feature = "store-sqlite")]
pub fn write_incident_database(
    path: &std::path::Path,
    incidents: &[IncidentRecord],
) -> Result<(), rusqlite::Error> {
    let mut connection = rusqlite::Connection::open(path)?;
    connection.execute(
        "CREATE TABLE IF NOT EXISTS crime (
            nm_pol TEXT,
            lat REAL,
            long REAL,
            totalcrime INTEGER,
            \"crime/area\" REAL
        )",
        [],
    )?;
    let tx = connection.transaction()?;
    {
        let mut statement = tx.prepare(
            "INSERT INTO crime (nm_pol, lat, long, totalcrime, \"crime/area\")
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for incident in incidents {
            statement.execute(rusqlite::params![
                incident.name,
                incident.lat,
                incident.lng,
                incident.total_count,
                incident.density,
            ])?;
        }
    }
    tx.commit()
}
