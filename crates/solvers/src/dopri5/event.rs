use super::Step;

/// Events emitted by the integrator, one per step attempt.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// A step passed the error test and was appended to the trajectory.
    ///
    /// `index` is the step's position in the trajectory.
    Accepted { index: usize, step: &'a Step },

    /// A step failed the error test and will be retried with `next_h`.
    Rejected { step: &'a Step, next_h: f64 },
}

impl<'a> Event<'a> {
    /// Returns the attempted step.
    #[must_use]
    pub fn step(&self) -> &'a Step {
        match *self {
            Event::Accepted { step, .. } | Event::Rejected { step, .. } => step,
        }
    }
}
