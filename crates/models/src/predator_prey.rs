//! Lotka-Volterra predator-prey dynamics.

use odeflow_core::{ParameterError, Parameters, VectorField};

use crate::Scenario;

/// Predation rate `a`: prey lost per predator encounter.
pub const PREDATION: &str = "a";
/// Conversion rate `b`: predators gained per prey encounter.
pub const CONVERSION: &str = "b";

/// Prey `x` grows and predators `y` decay on their own; encounters move
/// population from prey to predators.
///
/// State: `[x, y]`. `dx/dt = x - a x y`, `dy/dt = -y + b x y`.
///
/// With positive populations the quantity `b x - ln x + a y - ln y` is
/// conserved, so orbits are closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredatorPrey;

impl PredatorPrey {
    #[must_use]
    pub fn parameters(predation: f64, conversion: f64) -> Parameters {
        Parameters::new()
            .with(PREDATION, predation)
            .with(CONVERSION, conversion)
    }

    /// 150 prey and 100 predators over fifty days.
    #[must_use]
    pub fn scenario() -> Scenario<Self> {
        Scenario {
            field: Self,
            params: Self::parameters(0.01, 0.01),
            initial: vec![150.0, 100.0],
            span: [0.0, 50.0],
            samples: 10_000,
        }
    }

    /// Returns the conserved quantity of the orbit through `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if a rate parameter is missing.
    ///
    /// # Panics
    ///
    /// Panics if `state` has fewer than two components.
    pub fn invariant(state: &[f64], params: &Parameters) -> Result<f64, ParameterError> {
        let a = params.get(PREDATION)?;
        let b = params.get(CONVERSION)?;
        let (x, y) = (state[0], state[1]);
        Ok(b * x - x.ln() + a * y - y.ln())
    }
}

impl VectorField for PredatorPrey {
    type Error = ParameterError;

    fn dimension(&self) -> usize {
        2
    }

    fn derivative(
        &self,
        _t: f64,
        y: &[f64],
        params: &Parameters,
    ) -> Result<Vec<f64>, Self::Error> {
        let a = params.get(PREDATION)?;
        let b = params.get(CONVERSION)?;
        let (prey, predators) = (y[0], y[1]);
        Ok(vec![
            prey - a * prey * predators,
            -predators + b * prey * predators,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn equilibrium_is_stationary() {
        let params = PredatorPrey::parameters(0.01, 0.02);
        // x* = 1 / b, y* = 1 / a.
        let dydt = PredatorPrey.derivative(0.0, &[50.0, 100.0], &params).unwrap();

        assert_relative_eq!(dydt[0], 0.0);
        assert_relative_eq!(dydt[1], 0.0);
    }

    #[test]
    fn invariant_is_flat_along_the_field() {
        let params = PredatorPrey::parameters(0.01, 0.01);
        let state = [150.0, 80.0];
        let dydt = PredatorPrey.derivative(0.0, &state, &params).unwrap();

        // dV/dt = (b - 1/x) x' + (a - 1/y) y'.
        let rate = (0.01 - 1.0 / state[0]) * dydt[0] + (0.01 - 1.0 / state[1]) * dydt[1];
        assert_relative_eq!(rate, 0.0, epsilon = 1e-12);
        assert!(PredatorPrey::invariant(&state, &params).is_ok());
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn invariant_needs_both_populations() {
        let params = PredatorPrey::parameters(0.01, 0.01);
        let _ = PredatorPrey::invariant(&[150.0], &params);
    }
}
