use thiserror::Error;

use crate::{dopri5, dopri5::OutOfRange, events};

/// Errors that prevent a simulation from producing a result.
///
/// Everything except [`Error::Integration`] with a field error is detected
/// before the vector field is evaluated.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Integration(#[from] dopri5::Error),

    #[error("sample {0}")]
    Sample(#[from] OutOfRange),

    #[error(transparent)]
    Events(#[from] events::Error),
}

impl Error {
    /// Returns the vector field's own error, if that is what went wrong.
    #[must_use]
    pub fn field_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::Integration(dopri5::Error::Field(source)) => Some(source.as_ref()),
            _ => None,
        }
    }
}
