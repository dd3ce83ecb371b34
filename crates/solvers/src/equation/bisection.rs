//! Bisection for scalar root finding.
//!
//! # Algorithm
//!
//! Given `g` and a bracket `[a, b]` with `g(a)` and `g(b)` of opposite sign,
//! repeatedly evaluate the midpoint and keep the half whose endpoints still
//! differ in sign. The bracket halves every iteration, so convergence to any
//! absolute tolerance is guaranteed for continuous `g`.
//!
//! The event scanner uses this to refine threshold crossings and extrema on a
//! trajectory's dense output.

mod bracket;
mod config;
mod error;
mod solution;

pub use bracket::{BracketError, Sign};
pub use config::{Config, ConfigError};
pub use error::Error;
pub use solution::{Solution, Status};

use std::error::Error as StdError;

use bracket::{Bounds, Bracket};
use solution::Point;

/// Finds a root of `function` within `bracket` using bisection.
///
/// The bracket may be given in either order.
///
/// # Errors
///
/// Returns an error if the bracket or config is invalid, the endpoints do not
/// bracket a sign change, the function fails, or it returns a non-finite value.
pub fn solve<G, E>(mut function: G, bracket: [f64; 2], config: &Config) -> Result<Solution, Error>
where
    G: FnMut(f64) -> Result<f64, E>,
    E: StdError + Send + Sync + 'static,
{
    config.validate()?;
    let bounds = Bounds::new(bracket)?;

    let mut evaluate = |x: f64| -> Result<Point, Error> {
        let residual = function(x).map_err(Error::function)?;
        if residual.is_finite() {
            Ok(Point { x, residual })
        } else {
            Err(Error::NonFiniteResidual { x, residual })
        }
    };

    let left = evaluate(bounds.left())?;
    if left.residual.abs() <= config.residual_tol {
        return Ok(Solution::new(left, Status::Converged, 0));
    }

    let right = evaluate(bounds.right())?;
    if right.residual.abs() <= config.residual_tol {
        return Ok(Solution::new(right, Status::Converged, 0));
    }

    let left_sign = Sign::of(left.residual);
    if left_sign == Sign::of(right.residual) {
        return Err(Error::NoBracket {
            left: left.x,
            right: right.x,
            left_residual: left.residual,
            right_residual: right.residual,
        });
    }

    let mut bracket = Bracket::new(bounds, left_sign);
    let mut best = left.better(right);

    for iter in 1..=config.max_iters {
        let mid = evaluate(bracket.midpoint())?;

        let x_converged = bracket.is_x_converged(config.x_abs_tol, config.x_rel_tol);
        if x_converged || mid.residual.abs() <= config.residual_tol {
            return Ok(Solution::new(mid, Status::Converged, iter));
        }

        best = best.better(mid);
        bracket.shrink(mid.x, Sign::of(mid.residual));
    }

    Ok(Solution::new(best, Status::MaxIters, config.max_iters))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;
    use thiserror::Error;

    /// Residual `x^n - target` for a power function.
    fn power(n: i32, target: f64) -> impl Fn(f64) -> Result<f64, Infallible> {
        move |x| Ok(x.powi(n) - target)
    }

    #[test]
    fn finds_square_root() {
        let solution = solve(power(2, 9.0), [0.0, 10.0], &Config::default())
            .expect("should solve");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn finds_cube_root() {
        let solution = solve(power(3, 27.0), [0.0, 10.0], &Config::default())
            .expect("should solve");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn finds_cosine_root() {
        let solution = solve(
            |t: f64| Ok::<_, Infallible>(t.cos()),
            [0.0, std::f64::consts::PI],
            &Config::default(),
        )
        .expect("should solve");

        assert_relative_eq!(solution.x, std::f64::consts::FRAC_PI_2, epsilon = 1e-11);
    }

    #[test]
    fn normalizes_reversed_bracket() {
        let solution = solve(power(2, 36.0), [10.0, 0.0], &Config::default())
            .expect("should solve with reversed bracket");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, 6.0, epsilon = 1e-10);
    }

    #[test]
    fn endpoint_root_converges_immediately() {
        let solution = solve(power(2, 4.0), [2.0, 10.0], &Config::default())
            .expect("should solve");

        assert_eq!(solution.status, Status::Converged);
        assert_eq!(solution.iters, 0);
        assert_relative_eq!(solution.x, 2.0);
    }

    #[test]
    fn bracket_halves_every_iteration() {
        let mut evaluated = Vec::new();
        solve(
            |x: f64| {
                evaluated.push(x);
                power(2, 2.0)(x)
            },
            [0.0, 4.0],
            &Config::default(),
        )
        .expect("should solve");

        // Skip the two endpoint evaluations; successive midpoints move by a
        // quarter of the current bracket, which halves every iteration.
        let moves: Vec<f64> = evaluated[2..]
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).abs())
            .collect();
        assert_relative_eq!(evaluated[2], 2.0);
        assert_relative_eq!(moves[0], 1.0);
        for pair in moves.windows(2) {
            assert_relative_eq!(pair[1], 0.5 * pair[0]);
        }
    }

    #[test]
    fn errors_on_zero_width_bracket() {
        let result = solve(power(2, 25.0), [5.0, 5.0], &Config::default());
        assert!(matches!(
            result,
            Err(Error::InvalidBracket(BracketError::ZeroWidth))
        ));
    }

    #[test]
    fn errors_on_non_finite_bracket() {
        let result = solve(power(2, 1.0), [f64::NAN, 10.0], &Config::default());
        assert!(matches!(
            result,
            Err(Error::InvalidBracket(BracketError::NonFinite))
        ));
    }

    #[test]
    fn errors_on_no_sign_change() {
        let result = solve(power(2, 9.0), [5.0, 10.0], &Config::default());
        assert!(matches!(result, Err(Error::NoBracket { .. })));
    }

    #[test]
    fn errors_on_invalid_config() {
        let config = Config {
            x_abs_tol: -1.0,
            ..Config::default()
        };
        let result = solve(power(2, 4.0), [0.0, 10.0], &config);
        assert!(matches!(
            result,
            Err(Error::InvalidConfig(ConfigError::XAbs))
        ));
    }

    #[test]
    fn errors_on_non_finite_residual() {
        let result = solve(
            |x: f64| Ok::<_, Infallible>(if x > 4.0 { f64::NAN } else { x - 6.0 }),
            [0.0, 10.0],
            &Config::default(),
        );
        assert!(matches!(result, Err(Error::NonFiniteResidual { .. })));
    }

    #[test]
    fn function_errors_are_boxed_sources() {
        #[derive(Debug, Error)]
        #[error("out of domain")]
        struct Domain;

        let result = solve(
            |x: f64| if x > 1.0 { Err(Domain) } else { Ok(x - 2.0) },
            [0.0, 4.0],
            &Config::default(),
        );

        match result {
            Err(Error::Function(source)) => assert!(source.downcast_ref::<Domain>().is_some()),
            other => panic!("expected function error, got {other:?}"),
        }
    }

    #[test]
    fn zero_iters_returns_best_endpoint() {
        let config = Config {
            max_iters: 0,
            ..Config::default()
        };
        let solution =
            solve(power(2, 9.0), [2.0, 10.0], &config).expect("should return best");

        assert_eq!(solution.status, Status::MaxIters);
        assert_eq!(solution.iters, 0);
        // |4 - 9| = 5 beats |100 - 9| = 91.
        assert_relative_eq!(solution.x, 2.0);
    }
}
