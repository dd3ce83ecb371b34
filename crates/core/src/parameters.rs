use std::{collections::BTreeMap, fmt, sync::Arc};

use thiserror::Error;

/// A time-varying forcing term, such as an applied voltage `V(t)`.
pub type Forcing = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// A single named model parameter.
#[derive(Clone)]
pub enum Parameter {
    /// A constant real value.
    Constant(f64),

    /// A pure function of time.
    Forcing(Forcing),
}

impl Parameter {
    /// Returns the parameter value at time `t`.
    #[must_use]
    pub fn at(&self, t: f64) -> f64 {
        match self {
            Self::Constant(value) => *value,
            Self::Forcing(function) => function(t),
        }
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Forcing(_) => f.write_str("Forcing(..)"),
        }
    }
}

/// Errors that can occur when looking up a parameter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("missing parameter `{0}`")]
    Missing(String),

    #[error("parameter `{0}` is time-varying and must be evaluated at a time")]
    TimeVarying(String),
}

/// An immutable set of named model parameters.
///
/// Parameters are assembled once with the builder methods and then passed by
/// shared reference, unchanged, to every vector field evaluation of a run.
/// Forcing functions are `Send + Sync`, so one `Parameters` value can be shared
/// by runs on different threads.
///
/// # Example
///
/// ```
/// use odeflow_core::Parameters;
///
/// let params = Parameters::new()
///     .with("R", 100.0)
///     .with_forcing("V", |t| 5.0 * t.cos());
///
/// assert_eq!(params.get("R"), Ok(100.0));
/// assert_eq!(params.at("V", 0.0), Ok(5.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    values: BTreeMap<String, Parameter>,
}

impl Parameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a constant parameter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), Parameter::Constant(value));
        self
    }

    /// Adds (or replaces) a time-varying parameter.
    #[must_use]
    pub fn with_forcing<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.values
            .insert(name.into(), Parameter::Forcing(Arc::new(function)));
        self
    }

    /// Returns the value of a constant parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Missing`] if no parameter has this name, or
    /// [`ParameterError::TimeVarying`] if it is a forcing function.
    pub fn get(&self, name: &str) -> Result<f64, ParameterError> {
        match self.lookup(name)? {
            Parameter::Constant(value) => Ok(*value),
            Parameter::Forcing(_) => Err(ParameterError::TimeVarying(name.to_owned())),
        }
    }

    /// Returns the value of a parameter at time `t`.
    ///
    /// Constants ignore `t`.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Missing`] if no parameter has this name.
    pub fn at(&self, name: &str, t: f64) -> Result<f64, ParameterError> {
        self.lookup(name).map(|parameter| parameter.at(t))
    }

    /// Returns the parameter with this name, if any.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.values.get(name)
    }

    /// Iterates over parameter names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn lookup(&self, name: &str) -> Result<&Parameter, ParameterError> {
        self.values
            .get(name)
            .ok_or_else(|| ParameterError::Missing(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn constants_round_trip() {
        let params = Parameters::new().with("k", 0.35).with("Ta", 30.0);

        assert_eq!(params.len(), 2);
        assert_relative_eq!(params.get("k").unwrap(), 0.35);
        assert_relative_eq!(params.get("Ta").unwrap(), 30.0);
        assert_eq!(params.names().collect::<Vec<_>>(), vec!["Ta", "k"]);
    }

    #[test]
    fn later_values_replace_earlier_ones() {
        let params = Parameters::new().with("k", 0.5).with("k", 0.25);

        assert_eq!(params.len(), 1);
        assert_relative_eq!(params.get("k").unwrap(), 0.25);
    }

    #[test]
    fn missing_parameter_is_an_error() {
        let params = Parameters::new();

        assert!(params.is_empty());
        assert_eq!(
            params.get("beta"),
            Err(ParameterError::Missing("beta".into()))
        );
        assert_eq!(
            params.at("beta", 1.0),
            Err(ParameterError::Missing("beta".into()))
        );
    }

    #[test]
    fn forcing_is_evaluated_at_time() {
        let params = Parameters::new().with_forcing("V", |t| 5.0 * t.cos());

        assert_relative_eq!(params.at("V", 0.0).unwrap(), 5.0);
        assert_relative_eq!(
            params.at("V", std::f64::consts::PI).unwrap(),
            -5.0,
            epsilon = 1e-12
        );
        assert_eq!(
            params.get("V"),
            Err(ParameterError::TimeVarying("V".into()))
        );
    }

    #[test]
    fn constants_ignore_time() {
        let params = Parameters::new().with("L", 1.0);
        assert_relative_eq!(params.at("L", 123.0).unwrap(), 1.0);
    }

    #[test]
    fn debug_hides_forcing_closure() {
        let params = Parameters::new().with_forcing("V", |_| 1000.0);
        let text = format!("{:?}", params.parameter("V").unwrap());
        assert_eq!(text, "Forcing(..)");
    }

    #[test]
    fn parameters_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Parameters>();
    }
}
