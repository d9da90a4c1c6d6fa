//! Raw crime incident records consumed by the hotspot analyzer.

use geo::Coord;

/// A police-station level crime record as produced by the incident store.
///
/// Only records whose latitude and longitude are both present take part in
/// clustering; see [`IncidentRecord::location`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::IncidentRecord;
///
/// let record = IncidentRecord::at("Connaught Place", Coord { x: 77.2182, y: 28.6453 });
/// assert_eq!(record.location(), Some(Coord { x: 77.2182, y: 28.6453 }));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct IncidentRecord {
    /// Name of the reporting area.
    pub name: String,
    /// Latitude in degrees, when recorded.
    pub lat: Option<f64>,
    /// Longitude in degrees, when recorded.
    pub lng: Option<f64>,
    /// Total incidents reported for the area, when recorded.
    pub total_count: Option<u32>,
    /// Incidents per unit area.
    pub density: f64,
}

impl IncidentRecord {
    /// Construct a record with a known location and no aggregate counts.
    pub fn at(name: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            name: name.into(),
            lat: Some(location.y),
            lng: Some(location.x),
            total_count: None,
            density: 0.0,
        }
    }

    /// Return the record's coordinate when both components are present.
    #[must_use]
    pub fn location(&self) -> Option<Coord<f64>> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coord { x: lng, y: lat }),
            _ => None,
        }
    }
}
