//! Single-run orchestration: integrate, sample, and scan for events.
//!
//! [`Simulation::builder`] is the entry point for models. It validates the
//! whole request up front, runs the integrator once, evaluates the requested
//! sample times on the dense output, and runs every event query against the
//! resulting trajectory.
//!
//! ```
//! use std::convert::Infallible;
//!
//! use odeflow_core::{Parameters, field_fn};
//! use odeflow_solvers::{
//!     events::{EventQuery, Observable},
//!     simulation::{Simulation, linspace},
//! };
//!
//! let cooling = field_fn(1, |_t, y: &[f64], _p: &Parameters| {
//!     Ok::<_, Infallible>(vec![-0.35 * (y[0] - 30.0)])
//! });
//! let params = Parameters::new();
//!
//! let result = Simulation::builder(&cooling, &params, &[70.0], [0.0, 5.0])
//!     .sample_at(linspace(0.0, 5.0, 51))
//!     .query(EventQuery::threshold("cooled", Observable::Component(0), 40.0))
//!     .run()
//!     .unwrap();
//!
//! assert!(result.is_complete());
//! assert_eq!(result.samples.len(), 51);
//! let cooled = result.first_event("cooled").unwrap();
//! assert!((cooled.time - 4.0_f64.ln() / 0.35).abs() < 1e-6);
//! ```

mod builder;
mod error;

pub use builder::SimulationBuilder;
pub use error::Error;

use odeflow_core::{Parameters, VectorField};

use crate::{
    dopri5::{NumericalFailure, SampleSet, Stats, Status, Trajectory},
    events::Event,
};

/// The result of one simulation run.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Simulation {
    pub status: Status,
    pub trajectory: Trajectory,
    /// States at the requested times that the trajectory covers.
    pub samples: SampleSet,
    /// Events from every query, in time order.
    pub events: Vec<Event>,
    pub stats: Stats,
}

impl Simulation {
    /// Starts describing a run of `field` from `initial` over `span`.
    pub fn builder<'a, F: VectorField>(
        field: &'a F,
        params: &'a Parameters,
        initial: &[f64],
        span: [f64; 2],
    ) -> SimulationBuilder<'a, F> {
        SimulationBuilder::new(field, params, initial, span)
    }

    /// Returns `true` if the run covered the whole span.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    #[must_use]
    pub fn failure(&self) -> Option<&NumericalFailure> {
        self.status.failure()
    }

    /// Returns the events found by the query called `name`.
    pub fn events_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |event| event.name == name)
    }

    /// Returns the earliest event found by the query called `name`.
    #[must_use]
    pub fn first_event(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.name == name)
    }
}

/// Returns `n` evenly spaced times from `start` to `end`, both included.
///
/// The last value is exactly `end`.
#[must_use]
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = n - 1;
            let step = (end - start) / last as f64;
            (0..n)
                .map(|i| if i == last { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{
        convert::Infallible,
        sync::atomic::{AtomicUsize, Ordering},
        thread,
    };

    use approx::assert_relative_eq;
    use odeflow_core::{ParameterError, Predicate, field_fn};

    use crate::{
        dopri5::{self, Action, Config, OutOfRange},
        events::{self, Direction, EventKind, EventQuery, Observable},
    };

    /// `dy/dt = -k (y - ambient)`.
    fn cooling() -> impl VectorField<Error = ParameterError> + Sync {
        field_fn(1, |_t, y: &[f64], p: &Parameters| {
            Ok(vec![-p.get("k")? * (y[0] - p.get("ambient")?)])
        })
    }

    fn cooling_params() -> Parameters {
        Parameters::new().with("k", 0.35).with("ambient", 30.0)
    }

    fn exact(t: f64) -> f64 {
        30.0 + 40.0 * (-0.35 * t).exp()
    }

    #[test]
    fn cooling_crosses_forty_degrees_at_analytic_time() {
        let field = cooling();
        let params = cooling_params();

        let result = Simulation::builder(&field, &params, &[70.0], [0.0, 5.0])
            .query(EventQuery::threshold("cooled", Observable::Component(0), 40.0))
            .run()
            .unwrap();

        let events: Vec<_> = result.events_named("cooled").collect();
        assert_eq!(events.len(), 1);
        assert_relative_eq!(events[0].time, 4.0_f64.ln() / 0.35, epsilon = 1e-6);
        assert_relative_eq!(events[0].state[0], 40.0, epsilon = 1e-5);
        assert_eq!(events[0].kind, EventKind::Threshold(Direction::Falling));
    }

    #[test]
    fn samples_follow_requested_times() {
        let field = cooling();
        let params = cooling_params();
        let times = linspace(0.0, 5.0, 11);

        let result = Simulation::builder(&field, &params, &[70.0], [0.0, 5.0])
            .sample_at(times.clone())
            .run()
            .unwrap();

        assert!(result.is_complete());
        assert_eq!(result.samples.times(), times);
        assert_eq!(result.trajectory.end(), 5.0);
        for sample in &result.samples {
            assert_relative_eq!(sample.state[0], exact(sample.t), max_relative = 1e-5);
        }
    }

    #[test]
    fn error_shrinks_as_tolerances_tighten() {
        let field = cooling();
        let params = cooling_params();
        let times = linspace(0.0, 5.0, 101);

        let max_error = |rtol: f64| {
            let result = Simulation::builder(&field, &params, &[70.0], [0.0, 5.0])
                .sample_at(times.iter().copied())
                .config(Config::with_tolerances(rtol, rtol * 1e-3))
                .run()
                .unwrap();
            result
                .samples
                .iter()
                .map(|sample| (sample.state[0] - exact(sample.t)).abs())
                .fold(0.0, f64::max)
        };

        let coarse = max_error(1e-3);
        let medium = max_error(1e-6);
        let fine = max_error(1e-9);

        assert!(medium < coarse);
        assert!(fine < medium);
        assert!(fine < 1e-6);
    }

    #[test]
    fn invalid_requests_fail_before_any_evaluation() {
        let calls = AtomicUsize::new(0);
        let field = field_fn(2, |_t, y: &[f64], _p: &Parameters| {
            calls.fetch_add(1, Ordering::Relaxed);
            Ok::<_, Infallible>(vec![y[1], -y[0]])
        });
        let params = Parameters::new();

        let wrong_dimension = Simulation::builder(&field, &params, &[1.0], [0.0, 1.0]).run();
        assert!(matches!(
            wrong_dimension,
            Err(Error::Integration(dopri5::Error::DimensionMismatch {
                expected: 2,
                actual: 1
            }))
        ));

        let late_sample = Simulation::builder(&field, &params, &[1.0, 0.0], [0.0, 1.0])
            .sample_at([0.5, 1.5])
            .run();
        assert!(matches!(late_sample, Err(Error::Sample(OutOfRange { t, .. })) if t == 1.5));

        let late_window = Simulation::builder(&field, &params, &[1.0, 0.0], [0.0, 1.0])
            .query(EventQuery::threshold("x", Observable::Component(0), 0.0).within(0.5, 2.0))
            .run();
        assert!(matches!(
            late_window,
            Err(Error::Events(events::Error::OutOfRange(_)))
        ));

        let bad_component = Simulation::builder(&field, &params, &[1.0, 0.0], [0.0, 1.0])
            .query(EventQuery::threshold("x", Observable::Component(2), 0.0))
            .run();
        assert!(matches!(
            bad_component,
            Err(Error::Events(events::Error::InvalidComponent { index: 2, .. }))
        ));

        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn field_errors_reach_the_caller() {
        let field = cooling();
        let params = Parameters::new().with("k", 0.35);

        let error = Simulation::builder(&field, &params, &[70.0], [0.0, 5.0])
            .run()
            .unwrap_err();

        let source = error.field_error().expect("should be a field error");
        assert_eq!(
            source.downcast_ref::<ParameterError>(),
            Some(&ParameterError::Missing("ambient".into()))
        );
    }

    #[test]
    fn early_stop_drops_uncovered_samples_and_clips_windows() {
        // Free fall from 10 m with y = [height, velocity].
        let field = field_fn(2, |_t, y: &[f64], _p: &Parameters| {
            Ok::<_, Infallible>(vec![y[1], -9.8])
        });
        let params = Parameters::new();
        let landing = (20.0_f64 / 9.8).sqrt();

        let result = Simulation::builder(&field, &params, &[10.0, 0.0], [0.0, 5.0])
            .terminal(Predicate::new(|_, y| y[0] <= 0.0))
            .sample_at(linspace(0.0, 5.0, 6))
            .query(EventQuery::threshold("half", Observable::Component(0), 5.0).within(0.0, 5.0))
            .run()
            .unwrap();

        let Status::Terminated { t } = result.status else {
            panic!("expected termination, got {:?}", result.status);
        };
        assert_relative_eq!(t, landing, epsilon = 1e-9);
        assert_eq!(result.samples.times(), vec![0.0, 1.0]);
        assert_eq!(result.events.len(), 1);
        assert_relative_eq!(result.events[0].time, (10.0_f64 / 9.8).sqrt(), epsilon = 1e-8);
    }

    #[test]
    fn observer_can_stop_a_run() {
        let field = cooling();
        let params = cooling_params();

        let result = Simulation::builder(&field, &params, &[70.0], [0.0, 5.0])
            .sample_at([0.0, 5.0])
            .run_observed(|event: &dopri5::Event<'_>| match event {
                dopri5::Event::Accepted { step, .. } if step.t_end > 1.0 => {
                    Some(Action::StopEarly)
                }
                _ => None,
            })
            .unwrap();

        assert_eq!(result.status, Status::StoppedByObserver);
        assert!(result.trajectory.end() > 1.0);
        assert_eq!(result.samples.times(), vec![0.0]);
    }

    #[test]
    fn independent_runs_share_field_across_threads() {
        let field = cooling();
        let rates = [0.1, 0.2, 0.35, 0.5];

        let crossings: Vec<f64> = thread::scope(|scope| {
            let handles: Vec<_> = rates
                .iter()
                .map(|&k| {
                    let field = &field;
                    scope.spawn(move || {
                        let params = Parameters::new().with("k", k).with("ambient", 30.0);
                        Simulation::builder(field, &params, &[70.0], [0.0, 30.0])
                            .query(EventQuery::threshold("cooled", Observable::Component(0), 40.0))
                            .run()
                            .unwrap()
                            .first_event("cooled")
                            .map(|event| event.time)
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (k, t) in rates.iter().zip(crossings) {
            assert_relative_eq!(t, 4.0_f64.ln() / k, epsilon = 1e-6);
        }
    }

    #[test]
    fn linspace_includes_both_ends() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);

        let grid = linspace(0.0, 1.0, 5);
        assert_eq!(grid, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }
}
