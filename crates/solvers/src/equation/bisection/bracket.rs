use thiserror::Error;

/// Errors that can occur when validating bracket endpoints.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BracketError {
    /// One or both endpoints are non-finite.
    #[error("non-finite endpoint(s)")]
    NonFinite,

    /// Endpoints are equal, giving zero width.
    #[error("zero width")]
    ZeroWidth,
}

/// The sign of a residual for bracket logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Residual is positive (or zero).
    Positive,

    /// Residual is negative.
    Negative,
}

impl Sign {
    /// Returns the sign of a residual value.
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }
}

/// Ordered finite bounds, validated before any function evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Bounds {
    left: f64,
    right: f64,
}

impl Bounds {
    /// Validates and orders the bracket endpoints.
    ///
    /// # Errors
    ///
    /// Returns `BracketError` if endpoints are non-finite or zero width.
    pub(super) fn new(bracket: [f64; 2]) -> Result<Self, BracketError> {
        let [a, b] = bracket;

        if !a.is_finite() || !b.is_finite() {
            return Err(BracketError::NonFinite);
        }

        #[allow(clippy::float_cmp)]
        if a == b {
            return Err(BracketError::ZeroWidth);
        }

        Ok(if a < b {
            Self { left: a, right: b }
        } else {
            Self { left: b, right: a }
        })
    }

    pub(super) fn left(&self) -> f64 {
        self.left
    }

    pub(super) fn right(&self) -> f64 {
        self.right
    }
}

/// A sign-changing interval known to contain a root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Bracket {
    left: f64,
    right: f64,
    left_sign: Sign,
}

impl Bracket {
    /// Creates a bracket whose left endpoint has residual sign `left_sign`.
    ///
    /// The caller guarantees the right endpoint has the opposite sign.
    pub(super) fn new(bounds: Bounds, left_sign: Sign) -> Self {
        Self {
            left: bounds.left,
            right: bounds.right,
            left_sign,
        }
    }

    pub(super) fn midpoint(&self) -> f64 {
        0.5 * (self.left + self.right)
    }

    /// Returns true if the bracket width satisfies the x tolerances.
    pub(super) fn is_x_converged(&self, x_abs_tol: f64, x_rel_tol: f64) -> bool {
        self.right - self.left <= x_abs_tol + x_rel_tol * self.midpoint().abs()
    }

    /// Replaces the endpoint that shares `sign` with `x`.
    pub(super) fn shrink(&mut self, x: f64, sign: Sign) {
        if self.left_sign == sign {
            self.left = x;
        } else {
            self.right = x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn bounds_reorders_endpoints() {
        let bounds = Bounds::new([3.0, 1.0]).expect("valid bracket");
        assert_relative_eq!(bounds.left(), 1.0);
        assert_relative_eq!(bounds.right(), 3.0);
    }

    #[test]
    fn bounds_rejects_non_finite() {
        assert_eq!(Bounds::new([f64::NAN, 1.0]), Err(BracketError::NonFinite));
        assert_eq!(
            Bounds::new([0.0, f64::INFINITY]),
            Err(BracketError::NonFinite)
        );
    }

    #[test]
    fn bounds_rejects_zero_width() {
        assert_eq!(Bounds::new([2.0, 2.0]), Err(BracketError::ZeroWidth));
    }

    #[test]
    fn shrink_replaces_matching_endpoint() {
        let bounds = Bounds::new([0.0, 2.0]).expect("valid bounds");
        let mut bracket = Bracket::new(bounds, Sign::Negative);

        bracket.shrink(1.0, Sign::Negative);
        assert_eq!([bracket.left, bracket.right], [1.0, 2.0]);

        bracket.shrink(1.5, Sign::Positive);
        assert_eq!([bracket.left, bracket.right], [1.0, 1.5]);
        assert_relative_eq!(bracket.midpoint(), 1.25);
    }

    #[test]
    fn convergence_uses_abs_and_rel_tolerance() {
        let bounds = Bounds::new([100.0, 100.5]).expect("valid bounds");
        let bracket = Bracket::new(bounds, Sign::Positive);

        assert!(!bracket.is_x_converged(0.1, 0.0));
        assert!(bracket.is_x_converged(0.5, 0.0));
        assert!(bracket.is_x_converged(0.0, 0.01));
    }

    #[test]
    fn zero_counts_as_positive() {
        assert_eq!(Sign::of(0.0), Sign::Positive);
        assert_eq!(Sign::of(-1e-300), Sign::Negative);
    }
}
