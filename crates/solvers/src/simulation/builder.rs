use odeflow_core::{Observer, Parameters, Predicate, VectorField};
use tracing::{debug, instrument, warn};

use crate::{
    dopri5::{self, Action, Config, Event, OutOfRange},
    events::{self, EventQuery, ScanConfig},
};

use super::{Error, Simulation};

/// Collects everything one simulation run needs.
///
/// Created by [`Simulation::builder`]. The builder can be run any number of
/// times; each run is independent.
#[derive(Debug, Clone)]
pub struct SimulationBuilder<'a, F> {
    field: &'a F,
    params: &'a Parameters,
    initial: Vec<f64>,
    span: [f64; 2],
    sample_times: Vec<f64>,
    queries: Vec<EventQuery>,
    terminal: Option<Predicate>,
    config: Config,
    scan_config: ScanConfig,
}

impl<'a, F: VectorField> SimulationBuilder<'a, F> {
    pub(super) fn new(
        field: &'a F,
        params: &'a Parameters,
        initial: &[f64],
        span: [f64; 2],
    ) -> Self {
        Self {
            field,
            params,
            initial: initial.to_vec(),
            span,
            sample_times: Vec::new(),
            queries: Vec::new(),
            terminal: None,
            config: Config::default(),
            scan_config: ScanConfig::default(),
        }
    }

    /// Requests the state at each of `times`, in the order given.
    #[must_use]
    pub fn sample_at(mut self, times: impl IntoIterator<Item = f64>) -> Self {
        self.sample_times.extend(times);
        self
    }

    /// Adds an event query.
    #[must_use]
    pub fn query(mut self, query: EventQuery) -> Self {
        self.queries.push(query);
        self
    }

    /// Stops the run when `predicate` switches from false to true.
    #[must_use]
    pub fn terminal(mut self, predicate: Predicate) -> Self {
        self.terminal = Some(predicate);
        self
    }

    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn scan_config(mut self, scan_config: ScanConfig) -> Self {
        self.scan_config = scan_config;
        self
    }

    /// Runs the simulation.
    ///
    /// # Errors
    ///
    /// See [`run_observed`](Self::run_observed).
    pub fn run(&self) -> Result<Simulation, Error> {
        self.run_observed(())
    }

    /// Runs the simulation, passing integrator events to `observer`.
    ///
    /// Inputs are validated before the vector field is first evaluated. If
    /// the run ends early, samples past the end of the trajectory are dropped
    /// and event windows are clipped to it; the result's status says why.
    ///
    /// # Errors
    ///
    /// Returns an error if any input is invalid or the vector field fails.
    #[instrument(
        skip_all,
        fields(dimension = self.initial.len(), t0 = self.span[0], tf = self.span[1])
    )]
    pub fn run_observed<Obs>(&self, observer: Obs) -> Result<Simulation, Error>
    where
        Obs: for<'e> Observer<Event<'e>, Action>,
    {
        self.validate()?;

        let solution = dopri5::solve(
            self.field,
            self.params,
            &self.initial,
            self.span,
            &self.config,
            self.terminal.as_ref(),
            observer,
        )?;
        let trajectory = solution.trajectory;

        let covered: Vec<f64> = self
            .sample_times
            .iter()
            .copied()
            .filter(|&t| trajectory.contains(t))
            .collect();
        if covered.len() < self.sample_times.len() {
            warn!(
                dropped = self.sample_times.len() - covered.len(),
                t_end = trajectory.end(),
                "samples past the end of the trajectory were dropped"
            );
        }
        let samples = trajectory.sample(&covered)?;

        let mut found = Vec::new();
        for query in &self.queries {
            let [start, end] = query.window().unwrap_or(self.span);
            if start > trajectory.end() {
                continue;
            }
            let clipped = query.clone().within(start, end.min(trajectory.end()));
            found.extend(events::scan(&trajectory, &clipped, &self.scan_config)?);
        }
        found.sort_by(|a, b| a.time.total_cmp(&b.time));

        debug!(
            status = ?solution.status,
            samples = samples.len(),
            events = found.len(),
            "simulation finished"
        );

        Ok(Simulation {
            status: solution.status,
            trajectory,
            samples,
            events: found,
            stats: solution.stats,
        })
    }

    /// Checks every input against the requested span.
    fn validate(&self) -> Result<(), Error> {
        dopri5::validate(self.field, &self.initial, self.span, &self.config)?;
        self.scan_config
            .validate()
            .map_err(events::Error::InvalidConfig)?;

        let [t0, tf] = self.span;
        let out_of_range = |t: f64| OutOfRange { t, start: t0, end: tf };
        let in_span = |t: f64| t >= t0 && t <= tf;

        if let Some(&t) = self.sample_times.iter().find(|&&t| !in_span(t)) {
            return Err(out_of_range(t).into());
        }

        let dimension = self.initial.len();
        for query in &self.queries {
            if let Some([start, end]) = query.window() {
                if !(start.is_finite() && end.is_finite() && start <= end) {
                    return Err(events::Error::InvalidWindow { start, end }.into());
                }
                if let Some(t) = [start, end].into_iter().find(|&t| !in_span(t)) {
                    return Err(events::Error::OutOfRange(out_of_range(t)).into());
                }
            }
            if let Some(index) = query.component().filter(|&index| index >= dimension) {
                return Err(events::Error::InvalidComponent { index, dimension }.into());
            }
        }
        Ok(())
    }
}
