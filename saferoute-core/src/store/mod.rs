//! Collaborator traits for incident data and route history.
//!
//! The engine reads incidents through [`IncidentSource`] and hands finished
//! results to a [`RouteHistory`]. Neither trait says anything about the
//! storage technology; SQLite implementations are available behind the
//! `store-sqlite` feature.

use std::error::Error as StdError;

use geo::Coord;
use thiserror::Error;

use crate::{IncidentRecord, SafeRouteResult};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{
    SqliteIncidentSource, SqliteIncidentSourceError, SqliteRouteHistory, SqliteRouteHistoryError,
};

type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// Error raised when incident records cannot be retrieved.
#[derive(Debug, Error)]
pub enum IncidentSourceError {
    /// The backing store could not be reached or queried.
    #[error("incident source unavailable: {0}")]
    Unavailable(#[source] BoxedError),
}

impl IncidentSourceError {
    /// Wrap a backend-specific error.
    pub fn unavailable<E>(error: E) -> Self
    where
        E: Into<BoxedError>,
    {
        Self::Unavailable(error.into())
    }
}

/// Error raised when a route cannot be recorded.
#[derive(Debug, Error)]
pub enum RouteHistoryError {
    /// The backing store rejected the write.
    #[error("failed to record route history: {0}")]
    WriteFailed(#[source] BoxedError),
}

impl RouteHistoryError {
    /// Wrap a backend-specific error.
    pub fn write_failed<E>(error: E) -> Self
    where
        E: Into<BoxedError>,
    {
        Self::WriteFailed(error.into())
    }
}

/// Read-only access to historical crime incidents.
///
/// Implementations return only records with both coordinates present and
/// must yield them in a stable order so clustering stays reproducible.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use saferoute_core::{IncidentRecord, IncidentSource, IncidentSourceError};
///
/// struct Fixed(Vec<IncidentRecord>);
///
/// impl IncidentSource for Fixed {
///     fn incidents(&self) -> Result<Vec<IncidentRecord>, IncidentSourceError> {
///         Ok(self.0.clone())
///     }
/// }
///
/// let source = Fixed(vec![IncidentRecord::at("Chandni Chowk", Coord { x: 77.23, y: 28.65 })]);
/// assert_eq!(source.incidents().map(|v| v.len()).ok(), Some(1));
/// ```
pub trait IncidentSource: Send + Sync {
    /// Return every incident with a known location.
    fn incidents(&self) -> Result<Vec<IncidentRecord>, IncidentSourceError>;
}

impl<T: IncidentSource + ?Sized> IncidentSource for &T {
    fn incidents(&self) -> Result<Vec<IncidentRecord>, IncidentSourceError> {
        (**self).incidents()
    }
}

/// A completed route computation attributed to a user.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteHistoryEntry {
    /// Identifier of the requesting user.
    pub user_id: String,
    /// Requested origin.
    pub source: Coord<f64>,
    /// Requested target.
    pub destination: Coord<f64>,
    /// Result returned to the user.
    pub result: SafeRouteResult,
}

/// Sink for completed route computations.
///
/// Writes are best effort: the route service logs failures and still returns
/// the computed route.
pub trait RouteHistory: Send + Sync {
    /// Persist a single entry.
    fn record(&self, entry: &RouteHistoryEntry) -> Result<(), RouteHistoryError>;
}

impl<T: RouteHistory + ?Sized> RouteHistory for &T {
    fn record(&self, entry: &RouteHistoryEntry) -> Result<(), RouteHistoryError> {
        (**self).record(entry)
    }
}

/// History sink that discards every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl RouteHistory for NoHistory {
    fn record(&self, _entry: &RouteHistoryEntry) -> Result<(), RouteHistoryError> {
        Ok(())
    }
}
