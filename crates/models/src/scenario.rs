use odeflow_core::{Parameters, VectorField};
use odeflow_solvers::{Simulation, SimulationBuilder, linspace};

/// A ready-to-run model setup: field, parameters, initial state, and span.
#[derive(Debug, Clone)]
pub struct Scenario<F> {
    pub field: F,
    pub params: Parameters,
    pub initial: Vec<f64>,
    pub span: [f64; 2],
    /// Number of evenly spaced sample times across the span.
    pub samples: usize,
}

impl<F: VectorField> Scenario<F> {
    /// Returns the evenly spaced sample times.
    #[must_use]
    pub fn sample_times(&self) -> Vec<f64> {
        linspace(self.span[0], self.span[1], self.samples)
    }

    /// Returns a simulation builder preloaded with this scenario and its
    /// sample times.
    pub fn builder(&self) -> SimulationBuilder<'_, F> {
        Simulation::builder(&self.field, &self.params, &self.initial, self.span)
            .sample_at(self.sample_times())
    }
}
