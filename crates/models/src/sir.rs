//! The SIR compartmental epidemic model.

use odeflow_core::{ParameterError, Parameters, VectorField};

use crate::Scenario;

/// Transmission rate `β` per susceptible-infected contact.
pub const TRANSMISSION: &str = "beta";
/// Recovery rate `r`.
pub const RECOVERY: &str = "r";

/// Susceptible, infected, and recovered populations.
///
/// State: `[S, I, R]`.
///
/// ```text
/// dS/dt = -β S I
/// dI/dt =  β S I - r I
/// dR/dt =  r I
/// ```
///
/// The total `S + I + R` is conserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sir;

impl Sir {
    #[must_use]
    pub fn parameters(transmission: f64, recovery: f64) -> Parameters {
        Parameters::new()
            .with(TRANSMISSION, transmission)
            .with(RECOVERY, recovery)
    }

    /// One infected among 900 susceptibles over ten days.
    #[must_use]
    pub fn scenario() -> Scenario<Self> {
        Scenario {
            field: Self,
            params: Self::parameters(0.005, 1.0),
            initial: vec![900.0, 1.0, 0.0],
            span: [0.0, 10.0],
            samples: 10_000,
        }
    }
}

impl VectorField for Sir {
    type Error = ParameterError;

    fn dimension(&self) -> usize {
        3
    }

    fn derivative(
        &self,
        _t: f64,
        y: &[f64],
        params: &Parameters,
    ) -> Result<Vec<f64>, Self::Error> {
        let beta = params.get(TRANSMISSION)?;
        let r = params.get(RECOVERY)?;

        let infections = beta * y[0] * y[1];
        let recoveries = r * y[1];
        Ok(vec![-infections, infections - recoveries, recoveries])
    }
}
