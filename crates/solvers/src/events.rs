//! Locating threshold crossings, extrema, and predicate transitions on a
//! trajectory's dense output.
//!
//! # Algorithm
//!
//! Every accepted step overlapping the query window is split into
//! [`ScanConfig::subdivisions`] sub-intervals. The scan evaluates the query's
//! scalar function at each grid point and looks for sign changes (or, for
//! predicates, false-to-true switches) between neighbours. Each detection is
//! then refined on the dense output to [`ScanConfig::time_tol`], so reported
//! times are true crossing times rather than the nearest grid point.
//!
//! - Thresholds bisect `observable - target`.
//! - Extrema bisect the observable's time derivative. A component observable
//!   uses the derivative of the dense output; a custom observable uses a
//!   central difference.
//! - Predicates bisect on the truth value.
//!
//! Finding nothing is not an error: the scan returns an empty list.

mod config;
mod error;
mod event;
mod observable;
mod query;

pub use config::{ScanConfig, ScanConfigError};
pub use error::Error;
pub use event::{Event, EventKind};
pub use observable::Observable;
pub use query::{Condition, Direction, EventQuery, ExtremumKind, Occurrence};

use odeflow_core::Predicate;
use tracing::debug;

use crate::{
    dopri5::{OutOfRange, Trajectory},
    equation::{bisection, transition},
};

/// Runs one query against a trajectory.
///
/// Events are returned in time order.
///
/// # Errors
///
/// Returns an error if the config or window is invalid, the window is not
/// covered by the trajectory, or the query reads a component the state does
/// not have.
pub fn scan(
    trajectory: &Trajectory,
    query: &EventQuery,
    config: &ScanConfig,
) -> Result<Vec<Event>, Error> {
    config.validate()?;
    let window = resolve_window(trajectory, query.window())?;
    if let Some(index) = query.component() {
        let dimension = trajectory.dimension();
        if index >= dimension {
            return Err(Error::InvalidComponent { index, dimension });
        }
    }

    let grid = grid(trajectory, window, config.subdivisions);

    let hits: Vec<(f64, EventKind)> = match query.condition() {
        Condition::Threshold {
            observable,
            target,
            direction,
        } => {
            let offset = |t: f64| -> Result<f64, OutOfRange> {
                Ok(observable.evaluate(t, &trajectory.interpolate(t)?) - target)
            };
            sign_changes(&grid, offset, config)?
                .into_iter()
                .filter_map(|(t, actual)| {
                    direction
                        .accepts(actual)
                        .then_some((t, EventKind::Threshold(actual)))
                })
                .collect()
        }
        Condition::Extremum { observable, kind } => {
            let derivative = |t: f64| slope(trajectory, observable, t);
            sign_changes(&grid, derivative, config)?
                .into_iter()
                .filter_map(|(t, slope_direction)| {
                    let actual = match slope_direction {
                        Direction::Rising => ExtremumKind::Minimum,
                        _ => ExtremumKind::Maximum,
                    };
                    kind.accepts(actual)
                        .then_some((t, EventKind::Extremum(actual)))
                })
                .collect()
        }
        Condition::Predicate(predicate) => transitions(trajectory, &grid, predicate, config)?
            .into_iter()
            .map(|t| (t, EventKind::Predicate))
            .collect(),
    };

    let events = select(hits, query.occurrence_mode())
        .into_iter()
        .map(|(time, kind)| {
            Ok(Event {
                name: query.name().to_owned(),
                time,
                state: trajectory.interpolate(time)?,
                kind,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    debug!(
        query = query.name(),
        window_start = window[0],
        window_end = window[1],
        found = events.len(),
        "event scan finished"
    );
    Ok(events)
}

/// Runs several queries and merges their events in time order.
///
/// # Errors
///
/// Returns the first error any query produces.
pub fn scan_all(
    trajectory: &Trajectory,
    queries: &[EventQuery],
    config: &ScanConfig,
) -> Result<Vec<Event>, Error> {
    let mut events = Vec::new();
    for query in queries {
        events.extend(scan(trajectory, query, config)?);
    }
    events.sort_by(|a, b| a.time.total_cmp(&b.time));
    Ok(events)
}

fn resolve_window(trajectory: &Trajectory, window: Option<[f64; 2]>) -> Result<[f64; 2], Error> {
    let Some([start, end]) = window else {
        return Ok([trajectory.start(), trajectory.end()]);
    };
    if !(start.is_finite() && end.is_finite() && start <= end) {
        return Err(Error::InvalidWindow { start, end });
    }
    for t in [start, end] {
        if !trajectory.contains(t) {
            return Err(OutOfRange {
                t,
                start: trajectory.start(),
                end: trajectory.end(),
            }
            .into());
        }
    }
    Ok([start, end])
}

/// Builds a strictly increasing grid over `[start, end]` that includes every
/// step end inside the window and `subdivisions` points per step.
fn grid(trajectory: &Trajectory, [start, end]: [f64; 2], subdivisions: usize) -> Vec<f64> {
    let mut times = vec![start];
    let mut push = |t: f64| {
        if t > start && t < end && times.last().is_some_and(|&last| t > last) {
            times.push(t);
        }
    };

    for step in trajectory.steps() {
        if step.t_end <= start {
            continue;
        }
        if step.t_start >= end {
            break;
        }
        let width = step.t_end - step.t_start;
        for k in 1..subdivisions {
            push(step.t_start + width * k as f64 / subdivisions as f64);
        }
        push(step.t_end);
    }

    if end > start {
        times.push(end);
    }
    times
}

/// Finds and refines the sign changes of `function` over `grid`.
///
/// Each change is reported with the direction `function` moves through zero.
/// A grid point where `function` is exactly zero counts as a crossing only if
/// the sign on either side of it differs, or if it is the last point.
fn sign_changes<G>(
    grid: &[f64],
    mut function: G,
    config: &ScanConfig,
) -> Result<Vec<(f64, Direction)>, Error>
where
    G: FnMut(f64) -> Result<f64, OutOfRange>,
{
    let values = grid
        .iter()
        .map(|&t| function(t))
        .collect::<Result<Vec<_>, _>>()?;

    let refine = bisection::Config {
        max_iters: config.max_iters,
        x_abs_tol: config.time_tol,
        x_rel_tol: 0.0,
        residual_tol: 0.0,
    };
    let direction = |before: f64| {
        if before < 0.0 {
            Direction::Rising
        } else {
            Direction::Falling
        }
    };

    let mut found = Vec::new();
    for i in 1..grid.len() {
        let (before, after) = (values[i - 1], values[i]);
        if before == 0.0 || !before.is_finite() || !after.is_finite() {
            continue;
        }

        if after == 0.0 {
            let next = values[i + 1..].iter().find(|value| **value != 0.0);
            if next.is_none_or(|value| value.signum() != before.signum()) {
                found.push((grid[i], direction(before)));
            }
            continue;
        }

        if before.signum() != after.signum() {
            let bracket = [grid[i - 1], grid[i]];
            let solution = bisection::solve(&mut function, bracket, &refine)?;
            found.push((solution.x, direction(before)));
        }
    }
    Ok(found)
}

/// Time derivative of an observable along the trajectory.
fn slope(trajectory: &Trajectory, observable: &Observable, t: f64) -> Result<f64, OutOfRange> {
    match observable {
        Observable::Component(_) => Ok(observable.evaluate(t, &trajectory.derivative_at(t)?)),
        Observable::Custom(_) => {
            let value = |s: f64| -> Result<f64, OutOfRange> {
                Ok(observable.evaluate(s, &trajectory.interpolate(s)?))
            };
            let delta = f64::EPSILON.cbrt() * t.abs().max(1.0);
            let lo = (t - delta).max(trajectory.start());
            let hi = (t + delta).min(trajectory.end());
            Ok((value(hi)? - value(lo)?) / (hi - lo))
        }
    }
}

/// Finds the false-to-true switches of `predicate` over `grid`.
fn transitions(
    trajectory: &Trajectory,
    grid: &[f64],
    predicate: &Predicate,
    config: &ScanConfig,
) -> Result<Vec<f64>, Error> {
    let holds = |t: f64| -> Result<bool, OutOfRange> {
        Ok(predicate.test(t, &trajectory.interpolate(t)?))
    };

    let mut found = Vec::new();
    let Some(&start) = grid.first() else {
        return Ok(found);
    };

    let mut previous = holds(start)?;
    if previous {
        found.push(start);
    }
    for pair in grid.windows(2) {
        let current = holds(pair[1])?;
        if current && !previous {
            found.push(transition::locate(
                holds,
                pair[0],
                pair[1],
                config.time_tol,
                config.max_iters,
            )?);
        }
        previous = current;
    }
    Ok(found)
}

fn select<T>(mut hits: Vec<T>, occurrence: Occurrence) -> Vec<T> {
    match occurrence {
        Occurrence::All => hits,
        Occurrence::First => {
            hits.truncate(1);
            hits
        }
        Occurrence::Last => hits.pop().into_iter().collect(),
    }
}
