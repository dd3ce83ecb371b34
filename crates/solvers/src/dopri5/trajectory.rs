use thiserror::Error;

use super::{Sample, SampleSet, Step};

/// A time that lies outside the span a trajectory covers.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("time {t} is outside the integrated span [{start}, {end}]")]
pub struct OutOfRange {
    pub t: f64,
    pub start: f64,
    pub end: f64,
}

/// The accepted steps of an integration, usable as a continuous solution.
///
/// Steps are contiguous and strictly increasing in time. Any `t` in
/// `[start, end]` can be evaluated, and the knots (the initial time and every
/// step end) reproduce the integrator's states exactly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Trajectory {
    t0: f64,
    y0: Vec<f64>,
    f0: Vec<f64>,
    steps: Vec<Step>,
}

impl Trajectory {
    pub(crate) fn new(t0: f64, y0: Vec<f64>, f0: Vec<f64>) -> Self {
        Self {
            t0,
            y0,
            f0,
            steps: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, step: Step) {
        debug_assert!(step.t_start == self.end(), "steps must be contiguous");
        self.steps.push(step);
    }

    /// Returns the initial time.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.t0
    }

    /// Returns the time of the last accepted state.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.steps.last().map_or(self.t0, |step| step.t_end)
    }

    /// Returns the initial state.
    #[must_use]
    pub fn initial_state(&self) -> &[f64] {
        &self.y0
    }

    /// Returns the last accepted state.
    #[must_use]
    pub fn final_state(&self) -> &[f64] {
        self.steps.last().map_or(&self.y0, |step| &step.y_end)
    }

    /// Returns the number of state components.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.y0.len()
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns the knot times: the initial time followed by each step end.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::once(self.t0).chain(self.steps.iter().map(|step| step.t_end))
    }

    /// Returns `true` if `t` lies in `[start, end]`.
    #[must_use]
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start() && t <= self.end()
    }

    /// Evaluates the state at `t`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if `t` is outside `[start, end]`.
    pub fn interpolate(&self, t: f64) -> Result<Vec<f64>, OutOfRange> {
        Ok(match self.locate(t)? {
            Some(step) => step.interpolate(t),
            None => self.y0.clone(),
        })
    }

    /// Evaluates the time derivative of the dense output at `t`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if `t` is outside `[start, end]`.
    pub fn derivative_at(&self, t: f64) -> Result<Vec<f64>, OutOfRange> {
        Ok(match self.locate(t)? {
            Some(step) => step.derivative_at(t),
            None => self.f0.clone(),
        })
    }

    /// Evaluates the state at each requested time, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] for the first time outside `[start, end]`.
    pub fn sample(&self, times: &[f64]) -> Result<SampleSet, OutOfRange> {
        times
            .iter()
            .map(|&t| {
                Ok(Sample {
                    t,
                    state: self.interpolate(t)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(SampleSet::new)
    }

    /// Finds the step covering `t`, or `None` if there are no steps and `t`
    /// is the initial time.
    fn locate(&self, t: f64) -> Result<Option<&Step>, OutOfRange> {
        if !self.contains(t) {
            return Err(OutOfRange {
                t,
                start: self.start(),
                end: self.end(),
            });
        }
        let index = self.steps.partition_point(|step| step.t_end < t);
        Ok(self.steps.get(index))
    }
}
