use geo::Coord;

use crate::Hotspot;

/// Find a low-risk path between two points.
///
/// Implementations never fail: when no path can be found they return the
/// direct line `[source, destination]`. A returned path may contain a single
/// point when both endpoints collapse onto the same waypoint; callers must
/// handle that case.
/// Solvers must be `Send + Sync` to operate safely across threads.
///
/// # Examples
/// ```rust
/// use geo::Coord;
/// use saferoute_core::{Hotspot, PathSolver};
///
/// struct Straight;
///
/// impl PathSolver for Straight {
///     fn solve(&self, source: Coord<f64>, destination: Coord<f64>, _: &[Hotspot]) -> Vec<Coord<f64>> {
///         vec![source, destination]
///     }
/// }
///
/// let path = Straight.solve(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }, &[]);
/// assert_eq!(path.len(), 2);
/// ```
pub trait PathSolver: Send + Sync {
    /// Compute an ordered path from `source` to `destination` avoiding `hotspots`.
    fn solve(
        &self,
        source: Coord<f64>,
        destination: Coord<f64>,
        hotspots: &[Hotspot],
    ) -> Vec<Coord<f64>>;
}

impl<T: PathSolver + ?Sized> PathSolver for &T {
    fn solve(
        &self,
        source: Coord<f64>,
        destination: Coord<f64>,
        hotspots: &[Hotspot],
    ) -> Vec<Coord<f64>> {
        (**self).solve(source, destination, hotspots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::DirectLineSolver;
    use rstest::rstest;

    fn solve_via<S: PathSolver>(solver: S) -> Vec<Coord<f64>> {
        solver.solve(Coord { x: 0.0, y: 0.0 }, Coord { x: 2.0, y: 3.0 }, &[])
    }

    #[rstest]
    fn references_delegate_to_solver() {
        let solver = DirectLineSolver;
        assert_eq!(
            solve_via(&solver),
            vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 2.0, y: 3.0 }]
        );
    }
}
