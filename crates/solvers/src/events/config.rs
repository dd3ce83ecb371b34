use thiserror::Error;

/// Configuration for event scanning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ScanConfig {
    /// Time tolerance for refined event times.
    pub time_tol: f64,
    /// Number of sub-intervals each accepted step is split into while
    /// searching for sign changes.
    pub subdivisions: usize,
    /// Iteration limit for each refinement.
    pub max_iters: usize,
}

/// Errors that can occur when validating a scan config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScanConfigError {
    #[error("time_tol must be finite and positive")]
    TimeTol,

    #[error("subdivisions must be at least 1")]
    Subdivisions,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            time_tol: 1e-10,
            subdivisions: 8,
            max_iters: 200,
        }
    }
}

impl ScanConfig {
    /// Validates the config.
    ///
    /// # Errors
    ///
    /// Returns the first setting that is out of range.
    pub fn validate(&self) -> Result<(), ScanConfigError> {
        if !(self.time_tol.is_finite() && self.time_tol > 0.0) {
            return Err(ScanConfigError::TimeTol);
        }
        if self.subdivisions == 0 {
            return Err(ScanConfigError::Subdivisions);
        }
        Ok(())
    }
}
