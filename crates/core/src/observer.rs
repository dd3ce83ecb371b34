/// Watches a running solver and may steer it.
///
/// Integrators and root finders call `observe` with a solver-specific event
/// (an accepted step, a rejected step, a bisection iterate). Returning
/// `Some(action)` asks the solver to act, for example to stop early and return
/// what it has so far. Returning `None` lets it carry on.
///
/// Any `FnMut(&Event) -> Option<Action>` closure is an observer, and `()` is
/// the observer that never intervenes.
pub trait Observer<Event, Action> {
    /// Inspects one solver event.
    fn observe(&mut self, event: &Event) -> Option<Action>;
}

impl<Event, Action, F> Observer<Event, Action> for F
where
    F: FnMut(&Event) -> Option<Action>,
{
    fn observe(&mut self, event: &Event) -> Option<Action> {
        self(event)
    }
}

impl<Event, Action> Observer<Event, Action> for () {
    fn observe(&mut self, _event: &Event) -> Option<Action> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Stop {
        Now,
    }

    fn drive<Obs: Observer<usize, Stop>>(mut observer: Obs, events: usize) -> Option<usize> {
        (0..events).find(|event| observer.observe(event).is_some())
    }

    #[test]
    fn unit_never_intervenes() {
        assert_eq!(drive((), 10), None);
    }

    #[test]
    fn closure_can_request_action() {
        let mut seen = Vec::new();
        let stopped_at = drive(
            |event: &usize| {
                seen.push(*event);
                (*event == 3).then_some(Stop::Now)
            },
            10,
        );

        assert_eq!(stopped_at, Some(3));
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
