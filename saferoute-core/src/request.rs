//! Inbound route requests and their validation.

use geo::Coord;
use thiserror::Error;

/// Which endpoint of a request a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The route origin.
    Source,
    /// The route target.
    Destination,
}

impl Endpoint {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Destination => "destination",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`RouteRequest::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteRequestValidationError {
    /// A coordinate component was `NaN` or infinite.
    #[error("{endpoint} coordinate must be finite")]
    NonFiniteCoordinate {
        /// Endpoint carrying the invalid value.
        endpoint: Endpoint,
    },
    /// Latitude fell outside `-90..=90`.
    #[error("{endpoint} latitude {value} is outside -90..=90")]
    LatitudeOutOfRange {
        /// Endpoint carrying the invalid value.
        endpoint: Endpoint,
        /// Rejected latitude.
        value: f64,
    },
    /// Longitude fell outside `-180..=180`.
    #[error("{endpoint} longitude {value} is outside -180..=180")]
    LongitudeOutOfRange {
        /// Endpoint carrying the invalid value.
        endpoint: Endpoint,
        /// Rejected longitude.
        value: f64,
    },
    /// A user identifier was supplied but blank.
    #[error("user id must not be blank")]
    EmptyUserId,
}

/// A request for a safe route between two points.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::RouteRequest;
///
/// let request = RouteRequest::new(
///     Coord { x: 77.2295, y: 28.6129 },
///     Coord { x: 77.2177, y: 28.6304 },
/// )
/// .with_user_id("commuter-7");
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// Route origin (`x = longitude`, `y = latitude`).
    pub source: Coord<f64>,
    /// Route target (`x = longitude`, `y = latitude`).
    pub destination: Coord<f64>,
    /// Caller identity; history is only recorded when present.
    pub user_id: Option<String>,
}

impl RouteRequest {
    /// Construct an anonymous request.
    #[must_use]
    pub const fn new(source: Coord<f64>, destination: Coord<f64>) -> Self {
        Self {
            source,
            destination,
            user_id: None,
        }
    }

    /// Attach a user identifier to the request.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Check that both endpoints are finite WGS84 coordinates and that any
    /// user identifier is non-blank.
    pub fn validate(&self) -> Result<(), RouteRequestValidationError> {
        validate_endpoint(Endpoint::Source, self.source)?;
        validate_endpoint(Endpoint::Destination, self.destination)?;
        if self
            .user_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            return Err(RouteRequestValidationError::EmptyUserId);
        }
        Ok(())
    }
}

fn validate_endpoint(
    endpoint: Endpoint,
    coord: Coord<f64>,
) -> Result<(), RouteRequestValidationError> {
    if !coord.x.is_finite() || !coord.y.is_finite() {
        return Err(RouteRequestValidationError::NonFiniteCoordinate { endpoint });
    }
    if !(-90.0..=90.0).contains(&coord.y) {
        return Err(RouteRequestValidationError::LatitudeOutOfRange {
            endpoint,
            value: coord.y,
        });
    }
    if !(-180.0..=180.0).contains(&coord.x) {
        return Err(RouteRequestValidationError::LongitudeOutOfRange {
            endpoint,
            value: coord.x,
        });
    }
    Ok(())
}
