use std::{fmt, sync::Arc};

/// A scalar quantity derived from `(t, state)`.
#[derive(Clone)]
pub enum Observable {
    /// One state component.
    Component(usize),
    /// An arbitrary function of time and state.
    Custom(Arc<dyn Fn(f64, &[f64]) -> f64 + Send + Sync>),
}

impl Observable {
    /// Wraps a closure as an observable.
    pub fn custom<F>(function: F) -> Self
    where
        F: Fn(f64, &[f64]) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(function))
    }

    pub(super) fn evaluate(&self, t: f64, state: &[f64]) -> f64 {
        match self {
            Observable::Component(index) => state.get(*index).copied().unwrap_or(f64::NAN),
            Observable::Custom(function) => function(t, state),
        }
    }
}

impl fmt::Debug for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observable::Component(index) => f.debug_tuple("Component").field(index).finish(),
            Observable::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
