//! A ball thrown straight up, with linear air resistance.

use odeflow_core::{ParameterError, Parameters, VectorField};
use odeflow_solvers::events::{Direction, EventQuery, ExtremumKind, Observable};

use crate::Scenario;

/// Mass `m` (kg).
pub const MASS: &str = "mass";
/// Gravitational acceleration `g` (m/s²), positive downward.
pub const GRAVITY: &str = "gravity";
/// Linear damping constant `c` (kg/s).
pub const DAMPING: &str = "damping";

/// Vertical velocity under gravity and linear drag.
///
/// State: `[v]`. `dv/dt = (-c v - m g) / m`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallingBody;

/// [`FallingBody`] with height tracked alongside velocity.
///
/// State: `[v, h]`. `dv/dt = (-c v - m g) / m`, `dh/dt = v`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallingBodyWithPosition;

/// Parameters shared by both falling-body models.
#[must_use]
pub fn parameters(mass: f64, gravity: f64, damping: f64) -> Parameters {
    Parameters::new()
        .with(MASS, mass)
        .with(GRAVITY, gravity)
        .with(DAMPING, damping)
}

fn acceleration(v: f64, params: &Parameters) -> Result<f64, ParameterError> {
    let m = params.get(MASS)?;
    let g = params.get(GRAVITY)?;
    let c = params.get(DAMPING)?;
    Ok((-c * v - m * g) / m)
}

/// The moment the upward velocity reaches zero.
#[must_use]
pub fn apex(name: &str) -> EventQuery {
    EventQuery::threshold(name, Observable::Component(0), 0.0)
        .direction(Direction::Falling)
        .first()
}

impl FallingBody {
    /// A 0.25 kg ball thrown up at 50 m/s without drag, over ten seconds.
    #[must_use]
    pub fn scenario() -> Scenario<Self> {
        Scenario {
            field: Self,
            params: parameters(0.25, 9.8, 0.0),
            initial: vec![50.0],
            span: [0.0, 10.0],
            samples: 1000,
        }
    }
}

impl FallingBodyWithPosition {
    /// A 0.1 kg ball thrown up at 20 m/s with damping 0.5 kg/s, over three
    /// seconds.
    #[must_use]
    pub fn scenario() -> Scenario<Self> {
        Scenario {
            field: Self,
            params: parameters(0.1, 9.8, 0.5),
            initial: vec![20.0, 0.0],
            span: [0.0, 3.0],
            samples: 1000,
        }
    }

    /// The highest point of the flight.
    #[must_use]
    pub fn peak(name: &str) -> EventQuery {
        EventQuery::extremum(name, Observable::Component(1), ExtremumKind::Maximum).first()
    }
}

impl VectorField for FallingBody {
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
        Ok(vec![acceleration(y[0], params)?])
    }
}

impl VectorField for FallingBodyWithPosition {
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
        Ok(vec![acceleration(y[0], params)?, y[0]])
    }
}
