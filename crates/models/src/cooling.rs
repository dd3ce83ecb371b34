//! Newton's law of cooling.

use odeflow_core::{ParameterError, Parameters, VectorField};
use odeflow_solvers::events::{EventQuery, Observable};

use crate::Scenario;

/// Cooling rate constant `k` (1/h).
pub const RATE: &str = "k";
/// Ambient temperature `T_a`.
pub const AMBIENT: &str = "ambient";

/// A body exchanging heat with surroundings at a fixed temperature.
///
/// State: `[T]`. `dT/dt = -k (T - T_a)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonCooling;

impl NewtonCooling {
    #[must_use]
    pub fn parameters(rate: f64, ambient: f64) -> Parameters {
        Parameters::new().with(RATE, rate).with(AMBIENT, ambient)
    }

    /// A house at 70 °F cooling toward 30 °F outside over five hours.
    #[must_use]
    pub fn scenario() -> Scenario<Self> {
        Scenario {
            field: Self,
            params: Self::parameters(0.35, 30.0),
            initial: vec![70.0],
            span: [0.0, 5.0],
            samples: 1000,
        }
    }

    /// First time the temperature falls to `target`.
    #[must_use]
    pub fn cooled_to(name: &str, target: f64) -> EventQuery {
        EventQuery::threshold(name, Observable::Component(0), target)
            .falling()
            .first()
    }
}

impl VectorField for NewtonCooling {
    type Error = ParameterError;

    fn dimension(&self) -> usize {
        1
    }

    fn derivative(
        &self,
        _t: f64,
        y: &[f64],
        params: &Parameters,
    ) -> Result<Vec<f64>, Self::Error> {
        let k = params.get(RATE)?;
        let ambient = params.get(AMBIENT)?;
        Ok(vec![-k * (y[0] - ambient)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn rate_is_proportional_to_temperature_difference() {
        let params = NewtonCooling::parameters(0.35, 30.0);
        let dydt = NewtonCooling.derivative(0.0, &[70.0], &params).unwrap();

        assert_relative_eq!(dydt[0], -14.0);
    }

    #[test]
    fn missing_ambient_is_reported() {
        let params = Parameters::new().with(RATE, 0.35);

        assert_eq!(
            NewtonCooling.derivative(0.0, &[70.0], &params),
            Err(ParameterError::Missing(AMBIENT.into()))
        );
    }
}
