//! Serde adapters that expose `geo::Coord` values as `{ "lat", "lng" }`.

use geo::Coord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
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

impl From<LatLng> for Coord<f64> {
    fn from(value: LatLng) -> Self {
        Self {
            x: value.lng,
            y: value.lat,
        }
    }
}

pub(crate) mod latlng {
    use super::*;

    pub(crate) fn serialize<S: Serializer>(coord: &Coord<f64>, s: S) -> Result<S::Ok, S::Error> {
        LatLng::from(*coord).serialize(s)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Coord<f64>, D::Error> {
        LatLng::deserialize(d).map(Coord::from)
    }
}

pub(crate) mod latlng_seq {
    use super::*;

    pub(crate) fn serialize<S: Serializer>(coords: &[Coord<f64>], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(coords.iter().copied().map(LatLng::from))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Vec<Coord<f64>>, D::Error> {
        let points = Vec::<LatLng>::deserialize(d)?;
        Ok(points.into_iter().map(Coord::from).collect())
    }
}
