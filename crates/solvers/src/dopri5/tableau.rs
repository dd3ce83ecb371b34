//! Dormand-Prince 5(4) coefficients.
//!
//! The seventh stage is evaluated at the new solution (first same as last),
//! so an accepted step's last stage is the next step's first.

pub(crate) const STAGES: usize = 7;

/// Stage times as fractions of the step.
pub(super) const C: [f64; STAGES] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

/// Stage coupling coefficients (strictly lower triangular).
pub(super) const A: [[f64; STAGES - 1]; STAGES] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
    ],
    [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
    ],
];

/// Fifth-order weights (the propagated solution).
pub(super) const B: [f64; STAGES] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];

/// Fifth-order minus fourth-order weights, for the local error estimate.
pub(super) const E: [f64; STAGES] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

/// Continuous extension: stage `s` contributes `h * k_s * sum_j P[s][j] θ^(j+1)`.
pub(super) const P: [[f64; 4]; STAGES] = [
    [
        1.0,
        -8048581381.0 / 2820520608.0,
        8663915743.0 / 2820520608.0,
        -12715105075.0 / 11282082432.0,
    ],
    [0.0, 0.0, 0.0, 0.0],
    [
        0.0,
        131558114200.0 / 32700410799.0,
        -68118460800.0 / 10900136933.0,
        87487479700.0 / 32700410799.0,
    ],
    [
        0.0,
        -1754552775.0 / 470086768.0,
        14199869525.0 / 1410260304.0,
        -10690763975.0 / 1880347072.0,
    ],
    [
        0.0,
        127303824393.0 / 49829197408.0,
        -318862633887.0 / 49829197408.0,
        701980252875.0 / 199316789632.0,
    ],
    [
        0.0,
        -282668133.0 / 205662961.0,
        2019193451.0 / 616988883.0,
        -1453857185.0 / 822651844.0,
    ],
    [
        0.0,
        40617522.0 / 29380423.0,
        -110615467.0 / 29380423.0,
        69997945.0 / 29380423.0,
    ],
];

/// Exponent of the step-size update, `-1 / (q + 1)` for embedded order `q = 4`.
pub(super) const ERROR_EXPONENT: f64 = -1.0 / 5.0;

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn rows_of_a_sum_to_c() {
        for (row, c) in A.iter().zip(C) {
            assert_relative_eq!(row.iter().sum::<f64>(), c, epsilon = 1e-14);
        }
    }

    #[test]
    fn last_stage_uses_solution_weights() {
        for (a, b) in A[STAGES - 1].iter().zip(B) {
            assert_relative_eq!(*a, b);
        }
    }

    #[test]
    fn weights_are_consistent() {
        assert_relative_eq!(B.iter().sum::<f64>(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(E.iter().sum::<f64>(), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn continuous_extension_ends_at_solution() {
        // At θ = 1 each stage weight equals its fifth-order weight.
        for (row, b) in P.iter().zip(B) {
            assert_relative_eq!(row.iter().sum::<f64>(), b, epsilon = 1e-12);
        }
    }

    #[test]
    fn continuous_extension_slope_ends_at_last_stage() {
        // d/dθ at θ = 1 selects the last stage, so the interpolant is C1.
        for (s, row) in P.iter().enumerate() {
            let slope: f64 = row
                .iter()
                .enumerate()
                .map(|(j, p)| (j + 1) as f64 * p)
                .sum();
            let expected = if s == STAGES - 1 { 1.0 } else { 0.0 };
            assert_relative_eq!(slope, expected, epsilon = 1e-12);
        }
    }
}
