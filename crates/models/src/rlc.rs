//! A series RLC circuit driven by a source voltage.

use odeflow_core::{ParameterError, Parameters, VectorField};

use crate::Scenario;

/// Inductance `L` (H).
pub const INDUCTANCE: &str = "L";
/// Resistance `R` (Ω).
pub const RESISTANCE: &str = "R";
/// Capacitance `C` (F).
pub const CAPACITANCE: &str = "C";
/// Source voltage `V(t)` (V), constant or time-varying.
pub const VOLTAGE: &str = "V";

/// Current and capacitor charge in a series RLC loop.
///
/// State: `[i, q]`. `di/dt = (V(t) - q / C - R i) / L`, `dq/dt = i`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RlcCircuit;

impl RlcCircuit {
    /// Circuit constants without a source; add one with
    /// [`Parameters::with`] or [`Parameters::with_forcing`] under [`VOLTAGE`].
    #[must_use]
    pub fn parameters(inductance: f64, resistance: f64, capacitance: f64) -> Parameters {
        Parameters::new()
            .with(INDUCTANCE, inductance)
            .with(RESISTANCE, resistance)
            .with(CAPACITANCE, capacitance)
    }

    /// 1 H, 100 Ω, 100 µF driven by `5 cos t`, starting discharged.
    #[must_use]
    pub fn scenario() -> Scenario<Self> {
        Scenario {
            field: Self,
            params: Self::parameters(1.0, 100.0, 1e-4)
                .with_forcing(VOLTAGE, |t| 5.0 * t.cos()),
            initial: vec![0.0, 0.0],
            span: [0.0, 10.0],
            samples: 2000,
        }
    }
}

impl VectorField for RlcCircuit {
    type Error = ParameterError;

    fn dimension(&self) -> usize {
        2
    }

    fn derivative(
        &self,
        t: f64,
        y: &[f64],
        params: &Parameters,
    ) -> Result<Vec<f64>, Self::Error> {
        let l = params.get(INDUCTANCE)?;
        let r = params.get(RESISTANCE)?;
        let c = params.get(CAPACITANCE)?;
        let v = params.at(VOLTAGE, t)?;

        let (current, charge) = (y[0], y[1]);
        Ok(vec![(v - charge / c - r * current) / l, current])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn forcing_is_evaluated_at_time() {
        let params =
            RlcCircuit::parameters(1.0, 100.0, 1e-4).with_forcing(VOLTAGE, |t| 5.0 * t.cos());

        let at_zero = RlcCircuit.derivative(0.0, &[0.0, 0.0], &params).unwrap();
        let at_pi = RlcCircuit
            .derivative(std::f64::consts::PI, &[0.0, 0.0], &params)
            .unwrap();

        assert_relative_eq!(at_zero[0], 5.0);
        assert_relative_eq!(at_pi[0], -5.0);
    }

    #[test]
    fn constant_source_also_works() {
        let params = RlcCircuit::parameters(2.0, 10.0, 0.5).with(VOLTAGE, 12.0);
        let dydt = RlcCircuit.derivative(0.0, &[1.0, 2.0], &params).unwrap();

        // (12 - 2 / 0.5 - 10 * 1) / 2
        assert_relative_eq!(dydt[0], -1.0);
        assert_relative_eq!(dydt[1], 1.0);
    }

    #[test]
    fn missing_source_is_reported() {
        let params = RlcCircuit::parameters(1.0, 1.0, 1.0);

        assert_eq!(
            RlcCircuit.derivative(0.0, &[0.0, 0.0], &params),
            Err(ParameterError::Missing(VOLTAGE.into()))
        );
    }
}
