//! Point risk queries against a hotspot set.

use geo::Coord;

use crate::{Hotspot, haversine_km};

/// Multiplier applied to a hotspot radius to obtain its influence boundary.
pub const SAFETY_MARGIN: f64 = 1.5;

/// Result of a [`RiskField::assess`] query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RiskAssessment {
    /// Whether the point lies within the margin of at least one hotspot.
    pub is_near_any_hotspot: bool,
    /// Strongest scaled severity among nearby hotspots, `0.0` when none.
    pub risk_value: f64,
}

/// Continuous risk surface derived from a set of hotspots.
///
/// Each hotspot contributes its tier severity scaled by
/// `1 - distance / (radius * SAFETY_MARGIN)` inside its margin. The field
/// takes the maximum contribution rather than the sum, so overlapping
/// hotspots never exceed the strongest single severity.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::{Hotspot, RiskField, RiskTier};
///
/// let hotspot = Hotspot {
///     center: Coord { x: 77.2182, y: 28.6453 },
///     radius_km: 0.5,
///     incident_count: 12,
///     risk_tier: RiskTier::High,
/// };
/// let hotspots = [hotspot];
/// let field = RiskField::new(&hotspots);
/// let at_center = field.assess(Coord { x: 77.2182, y: 28.6453 });
/// assert!(at_center.is_near_any_hotspot);
/// assert_eq!(at_center.risk_value, 5.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RiskField<'a> {
    hotspots: &'a [Hotspot],
}

impl<'a> RiskField<'a> {
    /// Build a field over the provided hotspots.
    #[must_use]
    pub const fn new(hotspots: &'a [Hotspot]) -> Self {
        Self { hotspots }
    }

    /// Evaluate the risk at `point`.
    #[must_use]
    pub fn assess(&self, point: Coord<f64>) -> RiskAssessment {
        self.hotspots
            .iter()
            .filter_map(|hotspot| scaled_severity(hotspot, point))
            .fold(RiskAssessment::default(), |acc, value| RiskAssessment {
                is_near_any_hotspot: true,
                risk_value: acc.risk_value.max(value),
            })
    }

    /// Convenience accessor for [`RiskAssessment::risk_value`].
    #[must_use]
    pub fn risk_at(&self, point: Coord<f64>) -> f64 {
        self.assess(point).risk_value
    }
}

/// Severity contributed by `hotspot` at `point`, or `None` outside its margin.
///
/// A zero-radius hotspot still counts as near for a point on its center but
/// contributes no risk.
fn scaled_severity(hotspot: &Hotspot, point: Coord<f64>) -> Option<f64> {
    let reach = hotspot.radius_km * SAFETY_MARGIN;
    let distance = haversine_km(point, hotspot.center);
    if distance > reach {
        return None;
    }
    if reach <= 0.0 {
        return Some(0.0);
    }
    Some(hotspot.risk_tier.severity() * (1.0 - distance / reach))
}
