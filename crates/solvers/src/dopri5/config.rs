use thiserror::Error;

/// Configuration for the Dormand-Prince integrator.
///
/// The local error of each step is measured per component against
/// `atol + rtol * max(|y_i|, |y_new_i|)` and the step is accepted when the
/// largest ratio is at most one.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Config {
    /// Relative tolerance.
    pub rtol: f64,
    /// Absolute tolerance.
    pub atol: f64,
    /// Initial step size, or `None` to estimate one from the problem.
    pub h0: Option<f64>,
    /// Smallest step size the controller may use.
    pub h_min: f64,
    /// Largest step size the controller may use.
    pub h_max: f64,
    /// Safety factor applied to the optimal step-size ratio.
    pub safety: f64,
    /// Lower bound on the step-size ratio between consecutive attempts.
    pub min_factor: f64,
    /// Upper bound on the step-size ratio between consecutive attempts.
    pub max_factor: f64,
    /// Maximum number of step attempts, accepted and rejected combined.
    pub max_steps: usize,
    /// Time tolerance for locating a terminal event within a step.
    pub event_tol: f64,
    /// Number of pieces each accepted step is split into when checking the
    /// terminal predicate.
    pub event_subdivisions: usize,
}

/// Errors that can occur when validating an integrator config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rtol must be finite and non-negative")]
    Rtol,

    #[error("atol must be finite and positive")]
    Atol,

    #[error("h0 must be finite and positive")]
    InitialStep,

    #[error("step bounds must satisfy 0 < h_min <= h_max")]
    StepBounds,

    #[error("safety must be in (0, 1]")]
    Safety,

    #[error("step factors must satisfy 0 < min_factor <= 1 <= max_factor")]
    Factors,

    #[error("event_tol must be finite and positive")]
    EventTol,

    #[error("event_subdivisions must be at least 1")]
    EventSubdivisions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-9,
            h0: None,
            h_min: 1e-12,
            h_max: f64::INFINITY,
            safety: 0.9,
            min_factor: 0.2,
            max_factor: 10.0,
            max_steps: 100_000,
            event_tol: 1e-10,
            event_subdivisions: 8,
        }
    }
}

impl Config {
    /// Returns the default config with the given tolerances.
    #[must_use]
    pub fn with_tolerances(rtol: f64, atol: f64) -> Self {
        Self {
            rtol,
            atol,
            ..Self::default()
        }
    }

    /// Validates the config.
    ///
    /// # Errors
    ///
    /// Returns the first setting that is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |value: f64| value.is_finite() && value > 0.0;

        if !(self.rtol.is_finite() && self.rtol >= 0.0) {
            return Err(ConfigError::Rtol);
        }
        if !positive(self.atol) {
            return Err(ConfigError::Atol);
        }
        if self.h0.is_some_and(|h0| !positive(h0)) {
            return Err(ConfigError::InitialStep);
        }
        if !positive(self.h_min) || self.h_max.is_nan() || self.h_max < self.h_min {
            return Err(ConfigError::StepBounds);
        }
        if !(self.safety > 0.0 && self.safety <= 1.0) {
            return Err(ConfigError::Safety);
        }
        if !(self.min_factor > 0.0 && self.min_factor <= 1.0)
            || !(self.max_factor >= 1.0 && self.max_factor.is_finite())
        {
            return Err(ConfigError::Factors);
        }
        if !positive(self.event_tol) {
            return Err(ConfigError::EventTol);
        }
        if self.event_subdivisions == 0 {
            return Err(ConfigError::EventSubdivisions);
        }
        Ok(())
    }
}
