//! Fixed-resolution lattice of candidate waypoints.
//!
//! Nodes live in a flat arena indexed row-major by `(row, col)`, where rows
//! advance in latitude and columns in longitude. Predecessor links are arena
//! indices, so path reconstruction never chases references.

use geo::Coord;
use saferoute_core::{Hotspot, RiskField, haversine_km};

use crate::GridSolverConfig;

/// A single lattice waypoint and its search bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct GridNode {
    /// Row in the lattice (latitude axis).
    pub row: u32,
    /// Column in the lattice (longitude axis).
    pub col: u32,
    /// Waypoint position (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Risk reported by the risk field at `location`.
    pub risk_value: f64,
    /// Risk-weighted cost of the best known path from the start.
    pub cost_from_start: f64,
    /// Great-circle distance to the goal.
    pub estimate_to_goal: f64,
    /// `cost_from_start + estimate_to_goal`.
    pub total_cost: f64,
    /// Arena index of the node this one was reached from.
    pub predecessor: Option<usize>,
}

/// Rectangular lattice spanning a source and destination.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_solver_grid::{Grid, GridSolverConfig};
///
/// let grid = Grid::build(
///     Coord { x: 77.2295, y: 28.6129 },
///     Coord { x: 77.2177, y: 28.6304 },
///     &[],
///     &GridSolverConfig::default(),
/// );
/// assert_eq!(grid.len(), 21 * 21);
/// assert!(grid.nodes().iter().all(|node| node.risk_value == 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct Grid {
    resolution: u32,
    nodes: Vec<GridNode>,
}

impl Grid {
    /// Build a `(resolution + 1)²` lattice around both endpoints.
    ///
    /// Bounds are padded by `config.padding_deg` on every side and each node's
    /// risk is evaluated once against `hotspots`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "lattice spacing is derived from floating-point bounds"
    )]
    pub fn build(
        source: Coord<f64>,
        destination: Coord<f64>,
        hotspots: &[Hotspot],
        config: &GridSolverConfig,
    ) -> Self {
        let resolution = config.effective_resolution();
        let padding = config.padding_deg;
        let min_lat = source.y.min(destination.y) - padding;
        let max_lat = source.y.max(destination.y) + padding;
        let min_lng = source.x.min(destination.x) - padding;
        let max_lng = source.x.max(destination.x) + padding;
        let lat_step = (max_lat - min_lat) / f64::from(resolution);
        let lng_step = (max_lng - min_lng) / f64::from(resolution);

        let field = RiskField::new(hotspots);
        let side = resolution as usize + 1;
        let mut nodes = Vec::with_capacity(side * side);
        for row in 0..=resolution {
            for col in 0..=resolution {
                let location = Coord {
                    x: min_lng + f64::from(col) * lng_step,
                    y: min_lat + f64::from(row) * lat_step,
                };
                nodes.push(GridNode {
                    row,
                    col,
                    location,
                    risk_value: field.risk_at(location),
                    cost_from_start: 0.0,
                    estimate_to_goal: 0.0,
                    total_cost: 0.0,
                    predecessor: None,
                });
            }
        }

        log::debug!(
            "built {side}x{side} grid spanning lat {min_lat:.4}..{max_lat:.4}, lng {min_lng:.4}..{max_lng:.4}"
        );

        Self { resolution, nodes }
    }

    /// Number of cells along each axis; the lattice has `resolution + 1`
    /// nodes per side.
    #[must_use]
    pub const fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the lattice holds no nodes. Built grids are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow all nodes in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }

    /// Borrow a node by arena index.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&GridNode> {
        self.nodes.get(index)
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> Option<&mut GridNode> {
        self.nodes.get_mut(index)
    }

    /// Arena index for `(row, col)`, or `None` outside the lattice.
    #[must_use]
    pub fn index_of(&self, row: u32, col: u32) -> Option<usize> {
        if row > self.resolution || col > self.resolution {
            return None;
        }
        let side = self.resolution as usize + 1;
        Some(row as usize * side + col as usize)
    }

    /// Index of the node closest to `point` by great-circle distance.
    ///
    /// Ties resolve to the lowest arena index.
    #[must_use]
    pub fn nearest(&self, point: Coord<f64>) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, node) in self.nodes.iter().enumerate() {
            let distance = haversine_km(point, node.location);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((index, distance)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Chebyshev-adjacent neighbours of `index`, clipped at the edges.
    ///
    /// Neighbours are yielded row by row, then column by column.
    pub fn neighbours(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let (row, col) = self
            .nodes
            .get(index)
            .map_or((0, 0), |node| (node.row, node.col));
        let valid = index < self.nodes.len();
        let last = self.resolution;
        let rows = row.saturating_sub(1)..=row.saturating_add(1).min(last);
        rows.flat_map(move |r| {
            let cols = col.saturating_sub(1)..=col.saturating_add(1).min(last);
            cols.map(move |c| (r, c))
        })
        .filter(move |&(r, c)| valid && (r, c) != (row, col))
        .filter_map(move |(r, c)| self.index_of(r, c))
    }
}
