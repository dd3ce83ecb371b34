use std::error::Error as StdError;

use thiserror::Error;

use super::ConfigError;

/// Errors that prevent an integration from running.
///
/// Numerical trouble during a run (step-size underflow, non-finite states) is
/// not an error. It ends the run with
/// [`Status::NumericalFailure`](super::Status::NumericalFailure) and keeps the
/// trajectory computed so far.
#[derive(Debug, Error)]
pub enum Error {
    #[error("expected {expected} state components, found {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid time span [{t0}, {tf}]: both ends must be finite with t0 < tf")]
    InvalidSpan { t0: f64, tf: f64 },

    #[error("initial state component {index} is not finite")]
    NonFiniteState { index: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("vector field error: {0}")]
    Field(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn field<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Field(Box::new(err))
    }
}
