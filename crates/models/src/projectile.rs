//! Planar projectile motion with quadratic air drag.

use odeflow_core::{ParameterError, Parameters, Predicate, VectorField};

use crate::Scenario;

/// Horizontal gravitational acceleration (m/s²).
pub const GRAVITY_X: &str = "gravity_x";
/// Vertical gravitational acceleration (m/s²), negative for downward.
pub const GRAVITY_Y: &str = "gravity_y";
/// Drag coefficient per unit mass (1/m).
pub const DRAG: &str = "drag";

/// Component indices of the projectile state.
pub const VX: usize = 0;
pub const VY: usize = 1;
pub const X: usize = 2;
pub const Y: usize = 3;

/// A point mass under uniform gravity with drag proportional to speed
/// squared, acting against the velocity.
///
/// State: `[vx, vy, x, y]`.
///
/// ```text
/// dvx/dt = gx - drag * vx * |v|
/// dvy/dt = gy - drag * vy * |v|
/// dx/dt  = vx
/// dy/dt  = vy
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Projectile;

impl Projectile {
    #[must_use]
    pub fn parameters(gravity: [f64; 2], drag: f64) -> Parameters {
        Parameters::new()
            .with(GRAVITY_X, gravity[0])
            .with(GRAVITY_Y, gravity[1])
            .with(DRAG, drag)
    }

    /// Launched horizontally at 80 m/s from 10 m up, with drag 0.25.
    #[must_use]
    pub fn scenario() -> Scenario<Self> {
        Scenario {
            field: Self,
            params: Self::parameters([0.0, -9.7536], 0.25),
            initial: vec![80.0, 0.0, 0.0, 10.0],
            span: [0.0, 50.0],
            samples: 10_000,
        }
    }

    /// Holds once the projectile reaches the floor.
    #[must_use]
    pub fn landed() -> Predicate {
        Predicate::new(|_, y| y[Y] <= 0.0)
    }

    /// Speed `|v|` of a state.
    ///
    /// # Panics
    ///
    /// Panics if `state` has fewer than two components.
    #[must_use]
    pub fn speed(state: &[f64]) -> f64 {
        state[VX].hypot(state[VY])
    }
}

impl VectorField for Projectile {
    type Error = ParameterError;

    fn dimension(&self) -> usize {
        4
    }

    fn derivative(
        &self,
        _t: f64,
        y: &[f64],
        params: &Parameters,
    ) -> Result<Vec<f64>, Self::Error> {
        let gx = params.get(GRAVITY_X)?;
        let gy = params.get(GRAVITY_Y)?;
        let drag = params.get(DRAG)?;

        let speed = Self::speed(y);
        Ok(vec![
            gx - y[VX] * drag * speed,
            gy - y[VY] * drag * speed,
            y[VX],
            y[VY],
        ])
    }
}
