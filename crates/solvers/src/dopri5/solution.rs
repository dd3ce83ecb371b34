use super::Trajectory;

/// How an integration ended.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Status {
    /// The trajectory reaches the end of the requested span.
    Complete,
    /// A terminal predicate became true at `t`; the trajectory ends there.
    Terminated { t: f64 },
    /// An observer requested an early stop.
    StoppedByObserver,
    /// The step budget ran out before the end of the span.
    MaxSteps,
    /// The controller could not find a step size that meets the tolerances.
    NumericalFailure(NumericalFailure),
}

impl Status {
    /// Returns `true` if the integration covered the whole span.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Status::Complete)
    }

    /// Returns the failure details, if the integration failed numerically.
    #[must_use]
    pub fn failure(&self) -> Option<&NumericalFailure> {
        match self {
            Status::NumericalFailure(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Where and why the step-size controller gave up.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NumericalFailure {
    /// Time of the last accepted state.
    pub t: f64,
    /// Last accepted state.
    pub y: Vec<f64>,
    /// Step size the controller wanted to try next.
    pub h: f64,
}

/// Work counters for one integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Stats {
    pub accepted: usize,
    pub rejected: usize,
    /// Number of vector field evaluations.
    pub evaluations: usize,
}

/// The result of an integration.
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: Status,
    pub trajectory: Trajectory,
    pub stats: Stats,
}
