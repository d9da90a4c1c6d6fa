//! Great-circle and planar distance helpers.
//!
//! Every other component measures distance through these functions so the
//! engine agrees on a single Earth model.

use geo::Coord;

/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate kilometres per degree used when converting planar degree
/// distances to kilometres.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle distance in kilometres between two WGS84 coordinates.
///
/// `NaN` inputs propagate to a `NaN` result.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::haversine_km;
///
/// let india_gate = Coord { x: 77.2295, y: 28.6129 };
/// assert_eq!(haversine_km(india_gate, india_gate), 0.0);
/// ```
#[must_use]
pub fn haversine_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let phi1 = a.y.to_radians();
    let phi2 = b.y.to_radians();
    let dphi = (b.y - a.y).to_radians();
    let dlambda = (b.x - a.x).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Approximate distance in kilometres from `point` to the segment
/// `start..end`.
///
/// The projection happens in raw degree space and is clamped to the segment
/// endpoints; the resulting degree distance is scaled by [`KM_PER_DEGREE`].
/// A zero-length segment degrades to the distance from `start`.
#[must_use]
pub fn segment_distance_km(point: Coord<f64>, start: Coord<f64>, end: Coord<f64>) -> f64 {
    let along = end - start;
    let offset = point - start;
    let length_sq = along.x * along.x + along.y * along.y;

    let nearest = if length_sq > 0.0 {
        let t = (offset.x * along.x + offset.y * along.y) / length_sq;
        if t < 0.0 {
            start
        } else if t > 1.0 {
            end
        } else {
            start + along * t
        }
    } else {
        start
    };

    let delta = point - nearest;
    (delta.x * delta.x + delta.y * delta.y).sqrt() * KM_PER_DEGREE
}
