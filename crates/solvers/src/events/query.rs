use odeflow_core::Predicate;

use super::Observable;

/// Which sign changes a threshold query reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Direction {
    /// The observable goes from below the target to above it.
    Rising,
    /// The observable goes from above the target to below it.
    Falling,
    #[default]
    Either,
}

impl Direction {
    pub(super) fn accepts(self, actual: Direction) -> bool {
        self == Direction::Either || self == actual
    }
}

/// Which extrema an extremum query reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ExtremumKind {
    Maximum,
    Minimum,
    #[default]
    Any,
}

impl ExtremumKind {
    pub(super) fn accepts(self, actual: ExtremumKind) -> bool {
        self == ExtremumKind::Any || self == actual
    }
}

/// Which of a query's matches to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Occurrence {
    First,
    Last,
    #[default]
    All,
}

/// What an [`EventQuery`] looks for.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Times where `observable - target` changes sign.
    Threshold {
        observable: Observable,
        target: f64,
        direction: Direction,
    },
    /// Times where the observable's time derivative changes sign.
    Extremum {
        observable: Observable,
        kind: ExtremumKind,
    },
    /// Times where the predicate switches from false to true.
    Predicate(Predicate),
}

/// A named question to ask of a trajectory.
///
/// Queries search the whole trajectory unless restricted with
/// [`within`](Self::within), and report every match unless narrowed with
/// [`first`](Self::first) or [`last`](Self::last).
///
/// ```
/// use odeflow_solvers::events::{EventQuery, Observable};
///
/// let cooled = EventQuery::threshold("cooled", Observable::Component(0), 40.0)
///     .falling()
///     .first();
/// assert_eq!(cooled.name(), "cooled");
/// ```
#[derive(Debug, Clone)]
pub struct EventQuery {
    name: String,
    condition: Condition,
    window: Option<[f64; 2]>,
    occurrence: Occurrence,
}

impl EventQuery {
    fn new(name: impl Into<String>, condition: Condition) -> Self {
        Self {
            name: name.into(),
            condition,
            window: None,
            occurrence: Occurrence::All,
        }
    }

    /// Looks for crossings of `target` in either direction.
    pub fn threshold(name: impl Into<String>, observable: Observable, target: f64) -> Self {
        Self::new(
            name,
            Condition::Threshold {
                observable,
                target,
                direction: Direction::Either,
            },
        )
    }

    /// Looks for local maxima and minima.
    pub fn extremum(name: impl Into<String>, observable: Observable, kind: ExtremumKind) -> Self {
        Self::new(name, Condition::Extremum { observable, kind })
    }

    /// Looks for false-to-true transitions of `predicate`.
    ///
    /// A predicate that already holds at the start of the window reports the
    /// window start.
    pub fn predicate(name: impl Into<String>, predicate: Predicate) -> Self {
        Self::new(name, Condition::Predicate(predicate))
    }

    /// Restricts a threshold query to one crossing direction.
    ///
    /// Has no effect on other query kinds.
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        if let Condition::Threshold {
            direction: current, ..
        } = &mut self.condition
        {
            *current = direction;
        }
        self
    }

    #[must_use]
    pub fn rising(self) -> Self {
        self.direction(Direction::Rising)
    }

    #[must_use]
    pub fn falling(self) -> Self {
        self.direction(Direction::Falling)
    }

    /// Restricts the search to `[start, end]`.
    #[must_use]
    pub fn within(mut self, start: f64, end: f64) -> Self {
        self.window = Some([start, end]);
        self
    }

    #[must_use]
    pub fn occurrence(mut self, occurrence: Occurrence) -> Self {
        self.occurrence = occurrence;
        self
    }

    /// Keeps only the earliest match.
    #[must_use]
    pub fn first(self) -> Self {
        self.occurrence(Occurrence::First)
    }

    /// Keeps only the latest match.
    #[must_use]
    pub fn last(self) -> Self {
        self.occurrence(Occurrence::Last)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    #[must_use]
    pub fn window(&self) -> Option<[f64; 2]> {
        self.window
    }

    #[must_use]
    pub fn occurrence_mode(&self) -> Occurrence {
        self.occurrence
    }

    /// Returns the observable's component index, if it reads one directly.
    pub(crate) fn component(&self) -> Option<usize> {
        match &self.condition {
            Condition::Threshold {
                observable: Observable::Component(index),
                ..
            }
            | Condition::Extremum {
                observable: Observable::Component(index),
                ..
            } => Some(*index),
            _ => None,
        }
    }
}
