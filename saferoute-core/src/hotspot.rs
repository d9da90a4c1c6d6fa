//! Density-based clustering of crime incidents into hotspots.
//!
//! The analyzer runs DBSCAN over incident coordinates. Neighbourhoods are
//! measured as Euclidean distance in raw degree space while hotspot radii
//! are reported in kilometres, so `epsilon_deg` and `radius_km` live in
//! different units. Downstream risk thresholds are tuned against this
//! behaviour.
//!
//! Region queries go through an R\*-tree and results are visited in input
//! order, so identical input yields identical clusters even when a border
//! point is reachable from more than one cluster.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use geo::Coord;
use rstar::RTree;
use rstar::primitives::GeomWithData;
use thiserror::Error;

use crate::{IncidentRecord, haversine_km};

/// Smallest membership a cluster needs to be reported as a hotspot.
const MIN_HOTSPOT_SIZE: usize = 2;

/// Severity band assigned to a hotspot.
///
/// Tiers are ordered `Low < Medium < High`.
///
/// # Examples
/// ```
/// use saferoute_core::RiskTier;
///
/// assert_eq!(RiskTier::from_incident_count(11), RiskTier::High);
/// assert_eq!(RiskTier::Medium.as_str(), "medium");
/// assert!(RiskTier::Low < RiskTier::High);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RiskTier {
    /// Small clusters of up to five incidents.
    #[default]
    Low,
    /// Clusters of six to ten incidents.
    Medium,
    /// Clusters of more than ten incidents.
    High,
}

impl RiskTier {
    /// Classify a cluster by its incident count.
    #[must_use]
    pub const fn from_incident_count(count: usize) -> Self {
        if count > 10 {
            Self::High
        } else if count > 5 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Base severity used by the risk field: 1, 3 or 5.
    #[must_use]
    pub const fn severity(self) -> f64 {
        match self {
            Self::Low => 1.0,
            Self::Medium => 3.0,
            Self::High => 5.0,
        }
    }

    /// Return the tier as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown risk tier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown risk tier '{0}'")]
pub struct ParseRiskTierError(String);

impl FromStr for RiskTier {
    type Err = ParseRiskTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseRiskTierError(s.to_owned())),
        }
    }
}

/// A geographic cluster of historical incidents.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Hotspot {
    /// Arithmetic mean of the member coordinates.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_coord::latlng"))]
    pub center: Coord<f64>,
    /// Largest haversine distance from the center to any member.
    pub radius_km: f64,
    /// Number of member incidents; always at least two.
    pub incident_count: usize,
    /// Tier derived from `incident_count`.
    pub risk_tier: RiskTier,
}

impl Hotspot {
    /// Summarise a cluster of member coordinates.
    ///
    /// Returns `None` when fewer than two members are supplied.
    #[must_use]
    pub fn from_members(members: &[Coord<f64>]) -> Option<Self> {
        if members.len() < MIN_HOTSPOT_SIZE {
            return None;
        }

        let count = members.len() as f64;
        let sum = members
            .iter()
            .fold(Coord { x: 0.0, y: 0.0 }, |acc, member| acc + *member);
        let center = sum / count;
        let radius_km = members
            .iter()
            .map(|member| haversine_km(center, *member))
            .fold(0.0_f64, f64::max);

        Some(Self {
            center,
            radius_km,
            incident_count: members.len(),
            risk_tier: RiskTier::from_incident_count(members.len()),
        })
    }
}

/// Tunables for [`HotspotAnalyzer`].
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotAnalyzerConfig {
    /// Neighbourhood radius in coordinate degrees.
    pub epsilon_deg: f64,
    /// Minimum neighbourhood size (including the point itself) for a core point.
    pub min_points: usize,
    /// Upper bound on the number of incidents clustered per request.
    pub max_incidents: usize,
}

impl Default for HotspotAnalyzerConfig {
    fn default() -> Self {
        Self {
            epsilon_deg: 0.01,
            min_points: 2,
            max_incidents: 50_000,
        }
    }
}

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Clusters incidents into [`Hotspot`]s.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::{HotspotAnalyzer, IncidentRecord, RiskTier};
///
/// let incidents: Vec<_> = (0..3)
///     .map(|i| IncidentRecord::at("Karol Bagh", Coord { x: 77.19 + f64::from(i) * 0.001, y: 28.65 }))
///     .collect();
/// let hotspots = HotspotAnalyzer::default().analyze(&incidents);
/// assert_eq!(hotspots.len(), 1);
/// assert_eq!(hotspots[0].incident_count, 3);
/// assert_eq!(hotspots[0].risk_tier, RiskTier::Low);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HotspotAnalyzer {
    config: HotspotAnalyzerConfig,
}

impl HotspotAnalyzer {
    /// Construct an analyzer with explicit configuration.
    #[must_use]
    pub const fn with_config(config: HotspotAnalyzerConfig) -> Self {
        Self { config }
    }

    /// Borrow the active configuration.
    #[must_use]
    pub const fn config(&self) -> &HotspotAnalyzerConfig {
        &self.config
    }

    /// Cluster the located incidents into hotspots.
    ///
    /// Records without coordinates are skipped. Clusters with fewer than two
    /// members are discarded as noise.
    #[must_use]
    pub fn analyze(&self, incidents: &[IncidentRecord]) -> Vec<Hotspot> {
        let mut points: Vec<Coord<f64>> = incidents
            .iter()
            .filter_map(IncidentRecord::location)
            .collect();

        if points.len() > self.config.max_incidents {
            log::warn!(
                "clustering the first {} of {} located incidents",
                self.config.max_incidents,
                points.len()
            );
            points.truncate(self.config.max_incidents);
        }

        let hotspots: Vec<Hotspot> = self
            .clusters(&points)
            .into_iter()
            .filter_map(|members| {
                let coords: Vec<Coord<f64>> =
                    members.into_iter().filter_map(|i| points.get(i).copied()).collect();
                Hotspot::from_members(&coords)
            })
            .collect();

        log::debug!(
            "derived {} hotspots from {} located incidents",
            hotspots.len(),
            points.len()
        );
        hotspots
    }

    /// Run DBSCAN and return member indices for each cluster in discovery order.
    fn clusters(&self, points: &[Coord<f64>]) -> Vec<Vec<usize>> {
        let tree: RTree<IndexedPoint> = RTree::bulk_load(
            points
                .iter()
                .enumerate()
                .map(|(i, p)| GeomWithData::new([p.x, p.y], i))
                .collect(),
        );

        let mut visited = vec![false; points.len()];
        let mut assigned = vec![false; points.len()];
        let mut clusters = Vec::new();

        for (id, point) in points.iter().enumerate() {
            if visited[id] {
                continue;
            }
            visited[id] = true;

            let seeds = self.region_query(&tree, *point);
            if seeds.len() < self.config.min_points {
                continue;
            }

            assigned[id] = true;
            let mut members = vec![id];
            let mut queued: HashSet<usize> = seeds.iter().copied().collect();
            let mut queue = seeds;
            let mut cursor = 0;

            while let Some(&other) = queue.get(cursor) {
                cursor += 1;
                if !visited[other] {
                    visited[other] = true;
                    let reach = self.region_query(&tree, points[other]);
                    if reach.len() >= self.config.min_points {
                        for candidate in reach {
                            if queued.insert(candidate) {
                                queue.push(candidate);
                            }
                        }
                    }
                }
                if !assigned[other] {
                    assigned[other] = true;
                    members.push(other);
                }
            }

            clusters.push(members);
        }

        clusters
    }

    /// Indices of all points strictly closer than epsilon, in ascending order.
    fn region_query(&self, tree: &RTree<IndexedPoint>, point: Coord<f64>) -> Vec<usize> {
        let eps = self.config.epsilon_deg;
        let eps_sq = eps * eps;
        let mut neighbours: Vec<usize> = tree
            .locate_within_distance([point.x, point.y], eps_sq)
            .filter(|candidate| {
                let [x, y] = *candidate.geom();
                let (dx, dy) = (x - point.x, y - point.y);
                (dx * dx + dy * dy).sqrt() < eps
            })
            .map(|candidate| candidate.data)
            .collect();
        neighbours.sort_unstable();
        neighbours
    }
}
