/// Actions an observer can request during integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current step and return the trajectory so far.
    StopEarly,
}
