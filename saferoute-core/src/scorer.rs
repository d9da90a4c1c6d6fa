//! Segment classification and aggregate safety scoring.
//!
//! The [`RouteScorer`] trait lets callers substitute alternative scoring
//! strategies. [`ProximityScorer`] classifies each leg by the most severe
//! hotspot whose margin it passes through.

use geo::Coord;
use thiserror::Error;

use crate::{Hotspot, RiskTier, RouteSegment, SAFETY_MARGIN, segment_distance_km};

/// Score penalty per high-risk segment before averaging.
const HIGH_PENALTY: f64 = 30.0;
/// Score penalty per medium-risk segment before averaging.
const MEDIUM_PENALTY: f64 = 15.0;

/// Errors returned by [`RouteScorer::score`] and [`safety_score`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// The route did not contain a single segment.
    #[error("cannot score a route with {points} point(s); at least two are required")]
    DegenerateRoute {
        /// Number of points in the rejected route.
        points: usize,
    },
}

/// Segments and aggregate score for a route.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRoute {
    /// One classified segment per consecutive pair of route points.
    pub segments: Vec<RouteSegment>,
    /// Aggregate safety rating in `0..=100`.
    pub overall_safety_score: u8,
}

/// Classify a route against hotspots and compute its safety score.
///
/// Implementors must reject routes with fewer than two points with
/// [`ScoreError::DegenerateRoute`] and must be `Send + Sync`.
///
/// # Examples
/// ```rust
/// use geo::Coord;
/// use saferoute_core::{Hotspot, RouteScorer, ScoreError, ScoredRoute};
///
/// struct Optimist;
///
/// impl RouteScorer for Optimist {
///     fn score(&self, route: &[Coord<f64>], _hotspots: &[Hotspot]) -> Result<ScoredRoute, ScoreError> {
///         if route.len() < 2 {
///             return Err(ScoreError::DegenerateRoute { points: route.len() });
///         }
///         Ok(ScoredRoute { segments: Vec::new(), overall_safety_score: 100 })
///     }
/// }
///
/// assert!(Optimist.score(&[Coord { x: 0.0, y: 0.0 }], &[]).is_err());
/// ```
pub trait RouteScorer: Send + Sync {
    /// Split `route` into segments, classify them and aggregate a score.
    fn score(&self, route: &[Coord<f64>], hotspots: &[Hotspot]) -> Result<ScoredRoute, ScoreError>;
}

/// Scores legs by their planar proximity to hotspot centers.
///
/// A leg is `High` when it passes within `radius * SAFETY_MARGIN` of any
/// high-tier hotspot, otherwise `Medium` when it passes within the margin of
/// a medium-tier hotspot, otherwise `Low`. Low-tier hotspots never raise a
/// leg's tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProximityScorer;

impl ProximityScorer {
    /// Classify a single leg.
    #[must_use]
    pub fn classify(start: Coord<f64>, end: Coord<f64>, hotspots: &[Hotspot]) -> RiskTier {
        let mut tier = RiskTier::Low;
        for hotspot in hotspots {
            let distance = segment_distance_km(hotspot.center, start, end);
            if distance > hotspot.radius_km * SAFETY_MARGIN {
                continue;
            }
            match hotspot.risk_tier {
                RiskTier::High => return RiskTier::High,
                RiskTier::Medium => tier = RiskTier::Medium,
                RiskTier::Low => {}
            }
        }
        tier
    }
}

impl RouteScorer for ProximityScorer {
    fn score(&self, route: &[Coord<f64>], hotspots: &[Hotspot]) -> Result<ScoredRoute, ScoreError> {
        if route.len() < 2 {
            return Err(ScoreError::DegenerateRoute {
                points: route.len(),
            });
        }

        let segments: Vec<RouteSegment> = route
            .windows(2)
            .filter_map(|pair| match pair {
                [start, end] => Some(RouteSegment {
                    start: *start,
                    end: *end,
                    risk_tier: Self::classify(*start, *end, hotspots),
                }),
                _ => None,
            })
            .collect();
        let overall_safety_score = safety_score(&segments)?;

        Ok(ScoredRoute {
            segments,
            overall_safety_score,
        })
    }
}

/// Aggregate score: `100 - (high * 30 + medium * 15) / total`, rounded and
/// clamped to `0..=100`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::{RiskTier, RouteSegment, safety_score};
///
/// let leg = |risk_tier| RouteSegment {
///     start: Coord { x: 0.0, y: 0.0 },
///     end: Coord { x: 1.0, y: 1.0 },
///     risk_tier,
/// };
/// let segments = [leg(RiskTier::High), leg(RiskTier::Low), leg(RiskTier::Medium)];
/// assert_eq!(safety_score(&segments), Ok(85));
/// ```
pub fn safety_score(segments: &[RouteSegment]) -> Result<u8, ScoreError> {
    if segments.is_empty() {
        return Err(ScoreError::DegenerateRoute { points: 0 });
    }

    let (high, medium) = segments
        .iter()
        .fold((0_u32, 0_u32), |(high, medium), segment| match segment.risk_tier {
            RiskTier::High => (high + 1, medium),
            RiskTier::Medium => (high, medium + 1),
            RiskTier::Low => (high, medium),
        });

    let total = segments.len() as f64;
    let penalty = (f64::from(high) * HIGH_PENALTY + f64::from(medium) * MEDIUM_PENALTY) / total;
    let score = (100.0 - penalty).round().clamp(0.0, 100.0);
    // Clamped to 0..=100 above, so the cast is lossless.
    Ok(score as u8)
}
