//! Route output types.

use geo::Coord;
use thiserror::Error;

use crate::{Hotspot, RiskTier};

/// A leg between two consecutive route points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RouteSegment {
    /// First point of the leg.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_coord::latlng"))]
    pub start: Coord<f64>,
    /// Last point of the leg.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_coord::latlng"))]
    pub end: Coord<f64>,
    /// Tier of the most severe hotspot the leg passes near.
    pub risk_tier: RiskTier,
}

/// Errors returned by [`SafeRouteResult::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The route had fewer than two points.
    #[error("route must contain at least two points, found {0}")]
    TooFewPoints(usize),
    /// The number of segments did not match the number of route legs.
    #[error("route with {points} points requires {} segments, found {segments}", .points.saturating_sub(1))]
    SegmentCountMismatch {
        /// Number of route points.
        points: usize,
        /// Number of segments supplied.
        segments: usize,
    },
    /// The overall score exceeded 100.
    #[error("safety score {0} is outside 0..=100")]
    ScoreOutOfRange(u8),
}

/// The complete answer to a route request.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::{RiskTier, RouteSegment, SafeRouteResult};
///
/// # fn main() -> Result<(), saferoute_core::RouteError> {
/// let a = Coord { x: 77.2295, y: 28.6129 };
/// let b = Coord { x: 77.2177, y: 28.6304 };
/// let segment = RouteSegment { start: a, end: b, risk_tier: RiskTier::Low };
/// let result = SafeRouteResult::new(vec![a, b], vec![segment], 100, Vec::new())?;
/// assert_eq!(result.overall_safety_score, 100);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SafeRouteResult {
    /// Ordered waypoints from source to destination.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_coord::latlng_seq"))]
    pub route: Vec<Coord<f64>>,
    /// One segment per consecutive pair of waypoints.
    pub segments: Vec<RouteSegment>,
    /// Aggregate safety rating in `0..=100`.
    pub overall_safety_score: u8,
    /// Hotspots considered while computing the route.
    pub hotspots: Vec<Hotspot>,
}

impl SafeRouteResult {
    /// Validates and constructs a [`SafeRouteResult`].
    pub fn new(
        route: Vec<Coord<f64>>,
        segments: Vec<RouteSegment>,
        overall_safety_score: u8,
        hotspots: Vec<Hotspot>,
    ) -> Result<Self, RouteError> {
        if route.len() < 2 {
            return Err(RouteError::TooFewPoints(route.len()));
        }
        if segments.len() + 1 != route.len() {
            return Err(RouteError::SegmentCountMismatch {
                points: route.len(),
                segments: segments.len(),
            });
        }
        if overall_safety_score > 100 {
            return Err(RouteError::ScoreOutOfRange(overall_safety_score));
        }
        Ok(Self {
            route,
            segments,
            overall_safety_score,
            hotspots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn segment(a: Coord<f64>, b: Coord<f64>) -> RouteSegment {
        RouteSegment {
            start: a,
            end: b,
            risk_tier: RiskTier::Low,
        }
    }

    const A: Coord<f64> = Coord { x: 0.0, y: 0.0 };
    const B: Coord<f64> = Coord { x: 1.0, y: 1.0 };

    #[rstest]
    fn rejects_single_point_route() {
        let err = SafeRouteResult::new(vec![A], Vec::new(), 100, Vec::new()).expect_err("too short");
        assert_eq!(err, RouteError::TooFewPoints(1));
    }

    #[rstest]
    fn rejects_mismatched_segments() {
        let err = SafeRouteResult::new(vec![A, B], vec![segment(A, B), segment(B, A)], 100, Vec::new())
            .expect_err("mismatch");
        assert_eq!(
            err,
            RouteError::SegmentCountMismatch {
                points: 2,
                segments: 2
            }
        );
        assert_eq!(
            err.to_string(),
            "route with 2 points requires 1 segments, found 2"
        );
    }

    #[rstest]
    fn rejects_score_above_hundred() {
        let err = SafeRouteResult::new(vec![A, B], vec![segment(A, B)], 101, Vec::new())
            .expect_err("score");
        assert_eq!(err, RouteError::ScoreOutOfRange(101));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn serialises_with_camel_case_keys() {
        let result = SafeRouteResult::new(vec![A, B], vec![segment(A, B)], 85, Vec::new())
            .expect("valid result");
        let json = serde_json::to_value(&result).expect("serialise");
        assert_eq!(json["overallSafetyScore"], 85);
        assert_eq!(json["route"][1]["lat"], 1.0);
        assert_eq!(json["segments"][0]["riskTier"], "low");
        assert_eq!(json["hotspots"], serde_json::json!([]));
    }
}
