/// Indicates whether the solver converged or hit the iteration limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Converged according to the configured tolerances.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,
}

/// The result of a bisection solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// Best estimate of the root.
    pub x: f64,

    /// Residual at the reported root estimate.
    pub residual: f64,

    /// Iteration count when the solver finished.
    pub iters: usize,
}

impl Solution {
    pub(super) fn new(point: Point, status: Status, iters: usize) -> Self {
        Self {
            status,
            x: point.x,
            residual: point.residual,
            iters,
        }
    }
}

/// An evaluated point `(x, g(x))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Point {
    pub(super) x: f64,
    pub(super) residual: f64,
}

impl Point {
    /// Returns whichever point has the smaller residual magnitude.
    pub(super) fn better(self, other: Point) -> Point {
        if other.residual.abs() < self.residual.abs() {
            other
        } else {
            self
        }
    }
}
