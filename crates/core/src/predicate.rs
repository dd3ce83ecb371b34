use std::{fmt, sync::Arc};

/// A pure boolean condition on `(t, state)`.
///
/// Predicates drive terminal events ("stop when the ball hits the ground") and
/// predicate event queries ("first time the prey population drops below 1").
/// They are cheap to clone and `Send + Sync`, so one predicate can be reused
/// by concurrent runs.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(f64, &[f64]) -> bool + Send + Sync>);

impl Predicate {
    /// Wraps a closure as a predicate.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(f64, &[f64]) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(function))
    }

    /// Evaluates the predicate.
    #[must_use]
    pub fn test(&self, t: f64, state: &[f64]) -> bool {
        (self.0)(t, state)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_closure() {
        let below_ground = Predicate::new(|_, y| y[0] <= 0.0);

        assert!(!below_ground.test(0.0, &[10.0]));
        assert!(below_ground.test(1.5, &[-0.1]));
    }

    #[test]
    fn clones_share_the_closure() {
        let late = Predicate::new(|t, _| t > 2.0);
        let copy = late.clone();

        assert!(copy.test(3.0, &[]));
        assert!(!copy.test(1.0, &[]));
    }
}
