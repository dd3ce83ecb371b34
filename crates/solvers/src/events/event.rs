use super::{Direction, ExtremumKind};

/// What kind of match an [`Event`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum EventKind {
    /// A threshold crossing, either [`Direction::Rising`] or [`Direction::Falling`].
    Threshold(Direction),
    /// A local extremum, either [`ExtremumKind::Maximum`] or [`ExtremumKind::Minimum`].
    Extremum(ExtremumKind),
    Predicate,
}

/// A located event.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Event {
    /// Name of the query that found this event.
    pub name: String,
    pub time: f64,
    /// Interpolated state at `time`.
    pub state: Vec<f64>,
    pub kind: EventKind,
}
