//! Adaptive Dormand-Prince 5(4) integration with dense output.
//!
//! Each step evaluates seven stages, propagates the fifth-order solution, and
//! uses the embedded fourth-order solution to estimate the local error. The
//! step size adapts so the scaled error stays at or below one:
//!
//! ```text
//! err = max_i |e_i| / (atol + rtol * max(|y_i|, |y_new_i|))
//! h_next = h * clamp(safety * err^(-1/5), min_factor, max_factor)
//! ```
//!
//! Accepted steps keep their stages, so the returned [`Trajectory`] can be
//! evaluated at any time in the integrated span.
//!
//! # Terminal events
//!
//! An optional [`Predicate`] stops the run the first time it switches from
//! false to true within an accepted step. Each step is checked at
//! `event_subdivisions` points of its dense output, the switch is located to
//! within `event_tol`, the final step is truncated there, and the
//! run ends with [`Status::Terminated`]. A predicate that already holds at the
//! initial state does not fire until it has been false.
//!
//! # Example
//!
//! ```
//! use std::convert::Infallible;
//!
//! use odeflow_core::{Parameters, field_fn};
//! use odeflow_solvers::dopri5::{self, Config};
//!
//! let decay = field_fn(1, |_t, y: &[f64], _p: &Parameters| Ok::<_, Infallible>(vec![-y[0]]));
//!
//! let solution = dopri5::solve_unobserved(
//!     &decay,
//!     &Parameters::new(),
//!     &[1.0],
//!     [0.0, 1.0],
//!     &Config::default(),
//!     None,
//! )
//! .unwrap();
//!
//! let y = solution.trajectory.interpolate(0.5).unwrap();
//! assert!((y[0] - (-0.5_f64).exp()).abs() < 1e-6);
//! ```

mod action;
mod config;
mod controller;
mod error;
mod event;
mod sample;
mod solution;
mod step;
mod tableau;
mod trajectory;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use controller::StepController;
pub use error::Error;
pub use event::Event;
pub use sample::{Sample, SampleSet};
pub use solution::{NumericalFailure, Solution, Stats, Status};
pub use step::Step;
pub use trajectory::{OutOfRange, Trajectory};

use std::convert::Infallible;

use odeflow_core::{Observer, Parameters, Predicate, VectorField};
use tracing::{debug, instrument, trace, warn};

use crate::equation::transition;

use controller::evaluate;
use tableau::STAGES;

/// Halvings allowed when locating a terminal event inside a step.
const MAX_EVENT_ITERS: usize = 200;

/// Integrates `field` from `initial` over `span = [t0, tf]`.
///
/// # Algorithm
///
/// 1. Validate the inputs and evaluate `f(t0, y0)`.
/// 2. Pick the first step size from `config.h0` or estimate one.
/// 3. Until `tf` is reached:
///    - Attempt a step, clipped so it does not pass `tf`.
///    - On rejection, shrink the step and retry. Fail if it would drop
///      below `h_min`.
///    - On acceptance, check the terminal predicate, append the step, and
///      notify the observer.
///    - Grow or shrink the next step by the controller's factor. A step that
///      follows a rejection may not grow.
///
/// # Observer
///
/// The observer receives an [`Event`] for every attempt, accepted or not, and
/// may return [`Action::StopEarly`] to end the run with
/// [`Status::StoppedByObserver`].
///
/// # Errors
///
/// Returns an error if the inputs are invalid or the field fails. Numerical
/// failures are reported through [`Status`] instead.
#[instrument(skip_all, fields(dimension = initial.len(), t0 = span[0], tf = span[1]))]
pub fn solve<F, Obs>(
    field: &F,
    params: &Parameters,
    initial: &[f64],
    span: [f64; 2],
    config: &Config,
    terminal: Option<&Predicate>,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    F: VectorField,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    validate(field, initial, span, config)?;
    let [t0, tf] = span;
    let controller = StepController::new(config);

    let mut stats = Stats::default();
    let mut t = t0;
    let mut y = initial.to_vec();
    let mut f = evaluate(field, params, t, &y)?;
    stats.evaluations += 1;

    let mut h = match config.h0 {
        Some(h0) => h0,
        None => {
            stats.evaluations += 1;
            controller.initial_step(field, params, t0, &y, &f, tf - t0)?
        }
    };
    h = if h.is_finite() && h > 0.0 {
        h.clamp(config.h_min, config.h_max)
    } else {
        config.h_min
    };
    debug!(h, "integration started");

    let mut trajectory = Trajectory::new(t0, y.clone(), f.clone());
    let mut was_true = terminal.is_some_and(|predicate| predicate.test(t0, &y));
    let mut after_rejection = false;

    let status = loop {
        if stats.accepted + stats.rejected >= config.max_steps {
            warn!(t, max_steps = config.max_steps, "step budget exhausted");
            break Status::MaxSteps;
        }

        let last = t + h >= tf;
        if last {
            h = tf - t;
        }
        if t + h <= t {
            warn!(t, h, "step size too small to advance time");
            break Status::NumericalFailure(NumericalFailure { t, y, h });
        }

        let mut step = controller.attempt(field, params, t, &y, &f, h)?;
        stats.evaluations += STAGES - 1;

        if !step.accepted {
            stats.rejected += 1;
            let next_h = h * controller.factor(step.error_norm);
            trace!(t, h, error_norm = step.error_norm, "step rejected");

            let action = observer.observe(&Event::Rejected {
                step: &step,
                next_h,
            });
            if next_h.is_nan() || next_h < config.h_min {
                warn!(t, h = next_h, h_min = config.h_min, "step size underflow");
                break Status::NumericalFailure(NumericalFailure { t, y, h: next_h });
            }
            if let Some(Action::StopEarly) = action {
                break Status::StoppedByObserver;
            }

            h = next_h;
            after_rejection = true;
            continue;
        }

        if last {
            step.t_end = tf;
        }
        stats.accepted += 1;

        let mut factor = controller.factor(step.error_norm);
        if after_rejection {
            factor = factor.min(1.0);
        }
        after_rejection = false;

        let mut terminated = None;
        if let Some(predicate) = terminal {
            let (hit, is_true) = terminal_switch(predicate, &step, was_true, config);
            if let Some(t_event) = hit {
                step.truncate(t_event);
                debug!(t = t_event, "terminal event");
                terminated = Some(Status::Terminated { t: t_event });
            }
            was_true = is_true;
        }

        trace!(t = step.t_end, h, error_norm = step.error_norm, "step accepted");
        t = step.t_end;
        y.clone_from(&step.y_end);
        f.clone_from(&step.stages[STAGES - 1]);
        trajectory.push(step);

        let index = trajectory.steps().len() - 1;
        let action = observer.observe(&Event::Accepted {
            index,
            step: &trajectory.steps()[index],
        });

        if let Some(status) = terminated {
            break status;
        }
        if last {
            break Status::Complete;
        }
        if let Some(Action::StopEarly) = action {
            break Status::StoppedByObserver;
        }

        h = (h * factor).clamp(config.h_min, config.h_max);
    };

    debug!(
        t_end = trajectory.end(),
        accepted = stats.accepted,
        rejected = stats.rejected,
        evaluations = stats.evaluations,
        ?status,
        "integration finished"
    );

    Ok(Solution {
        status,
        trajectory,
        stats,
    })
}

/// Checks the terminal predicate across an accepted step.
///
/// The step is split into `config.event_subdivisions` pieces so a predicate
/// that switches on and back off inside one step is still caught. Returns the
/// located switch time, if any, and whether the predicate holds at the last
/// point checked.
fn terminal_switch(
    predicate: &Predicate,
    step: &Step,
    mut was_true: bool,
    config: &Config,
) -> (Option<f64>, bool) {
    let pieces = config.event_subdivisions;
    let width = step.t_end - step.t_start;
    let mut previous = step.t_start;

    for k in 1..=pieces {
        let t = if k == pieces {
            step.t_end
        } else {
            step.t_start + width * k as f64 / pieces as f64
        };
        let is_true = predicate.test(t, &step.interpolate(t));
        if is_true && !was_true {
            let hit = transition::locate(
                |s| Ok(predicate.test(s, &step.interpolate(s))),
                previous,
                t,
                config.event_tol,
                MAX_EVENT_ITERS,
            )
            .unwrap_or_else(|never: Infallible| match never {});
            return (Some(hit), true);
        }
        was_true = is_true;
        previous = t;
    }

    (None, was_true)
}

/// Integrates without observation.
///
/// # Errors
///
/// Returns an error under the same conditions as [`solve`].
pub fn solve_unobserved<F: VectorField>(
    field: &F,
    params: &Parameters,
    initial: &[f64],
    span: [f64; 2],
    config: &Config,
    terminal: Option<&Predicate>,
) -> Result<Solution, Error> {
    solve(field, params, initial, span, config, terminal, ())
}

/// Checks everything that can be checked before the first field evaluation.
///
/// # Errors
///
/// Returns the first invalid input found.
pub fn validate<F: VectorField>(
    field: &F,
    initial: &[f64],
    span: [f64; 2],
    config: &Config,
) -> Result<(), Error> {
    let expected = field.dimension();
    if initial.len() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            actual: initial.len(),
        });
    }

    let [t0, tf] = span;
    if !(t0.is_finite() && tf.is_finite() && t0 < tf) {
        return Err(Error::InvalidSpan { t0, tf });
    }

    if let Some(index) = initial.iter().position(|y| !y.is_finite()) {
        return Err(Error::NonFiniteState { index });
    }

    config.validate()?;
    Ok(())
}
