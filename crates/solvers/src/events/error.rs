use thiserror::Error;

use crate::{dopri5::OutOfRange, equation::bisection};

use super::ScanConfigError;

/// Errors that can occur while scanning a trajectory for events.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),

    #[error("invalid window [{start}, {end}]")]
    InvalidWindow { start: f64, end: f64 },

    #[error("component {index} is out of bounds for a {dimension}-dimensional state")]
    InvalidComponent { index: usize, dimension: usize },

    #[error("invalid scan config: {0}")]
    InvalidConfig(#[from] ScanConfigError),

    #[error("event refinement failed: {0}")]
    Refinement(#[from] bisection::Error),
}
