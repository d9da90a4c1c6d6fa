//! `GridSolver`: the lattice-based `PathSolver`.

use geo::Coord;
use saferoute_core::{Hotspot, PathSolver};

use crate::grid::Grid;
use crate::search::{SearchOutcome, search};

/// Configuration for [`GridSolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridSolverConfig {
    /// Cells per axis; the lattice has `resolution + 1` nodes per side.
    /// Zero is treated as one.
    pub resolution: u32,
    /// Degrees added around the endpoints' bounding box.
    pub padding_deg: f64,
    /// Weight applied to a node's risk when entering it.
    pub risk_penalty: f64,
}

impl Default for GridSolverConfig {
    fn default() -> Self {
        Self {
            resolution: 20,
            padding_deg: 0.01,
            risk_penalty: 0.5,
        }
    }
}

impl GridSolverConfig {
    /// Resolution actually used to build the lattice.
    #[must_use]
    pub const fn effective_resolution(&self) -> u32 {
        if self.resolution == 0 {
            1
        } else {
            self.resolution
        }
    }
}

/// Result of [`GridSolver::plan`], retaining the search grid for inspection.
#[derive(Debug, Clone)]
pub struct GridPlan {
    /// Lattice after the search, with costs and predecessors filled in.
    pub grid: Grid,
    /// Arena index of the node nearest the source.
    pub start: usize,
    /// Arena index of the node nearest the destination.
    pub goal: usize,
    /// Whether and how the goal was reached.
    pub outcome: SearchOutcome,
}

impl GridPlan {
    /// Waypoints of the found path, or `None` when the search was exhausted.
    #[must_use]
    pub fn waypoints(&self) -> Option<Vec<Coord<f64>>> {
        match &self.outcome {
            SearchOutcome::Reached(indices) => indices
                .iter()
                .map(|&index| self.grid.node(index).map(|node| node.location))
                .collect(),
            SearchOutcome::Exhausted => None,
        }
    }
}

/// Risk-aware path finder over a synthesised lattice.
///
/// Each call builds its own grid, so one solver can serve concurrent
/// requests.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::PathSolver;
/// use saferoute_solver_grid::GridSolver;
///
/// let solver = GridSolver::default();
/// let path = solver.solve(
///     Coord { x: 77.2295, y: 28.6129 },
///     Coord { x: 77.2177, y: 28.6304 },
///     &[],
/// );
/// assert!(path.len() >= 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GridSolver {
    config: GridSolverConfig,
}

impl GridSolver {
    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: GridSolverConfig) -> Self {
        Self { config }
    }

    /// Borrow the active configuration.
    #[must_use]
    pub const fn config(&self) -> &GridSolverConfig {
        &self.config
    }

    /// Build the lattice and run the search without applying any fallback.
    #[must_use]
    pub fn plan(
        &self,
        source: Coord<f64>,
        destination: Coord<f64>,
        hotspots: &[Hotspot],
    ) -> GridPlan {
        let mut grid = Grid::build(source, destination, hotspots, &self.config);
        let endpoints = grid.nearest(source).zip(grid.nearest(destination));
        let (start, goal, outcome) = match endpoints {
            Some((start, goal)) => {
                let outcome = search(&mut grid, start, goal, self.config.risk_penalty);
                (start, goal, outcome)
            }
            None => (0, 0, SearchOutcome::Exhausted),
        };
        GridPlan {
            grid,
            start,
            goal,
            outcome,
        }
    }
}

impl PathSolver for GridSolver {
    fn solve(
        &self,
        source: Coord<f64>,
        destination: Coord<f64>,
        hotspots: &[Hotspot],
    ) -> Vec<Coord<f64>> {
        let plan = self.plan(source, destination, hotspots);
        if let Some(path) = plan.waypoints() {
            log::debug!("grid search reached the goal in {} waypoints", path.len());
            return path;
        }
        log::warn!("grid search exhausted; returning the direct line");
        vec![source, destination]
    }
}

#[cfg(test)]
mod tests;
