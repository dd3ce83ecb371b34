use std::marker::PhantomData;

use crate::Parameters;

/// The right-hand side of a first-order ODE system, `dy/dt = f(t, y, params)`.
///
/// Implementations must be pure: the same `(t, y, params)` always produces the
/// same derivative, with no side effects and no dependence on call order.
/// Adaptive solvers re-evaluate the field at the same point when a step is
/// rejected and retried, so a field that keeps hidden mutable state produces
/// undefined results. The engine does not detect violations.
///
/// The returned derivative must have exactly [`dimension`](Self::dimension)
/// components, the same as the state `y`.
pub trait VectorField {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Number of state components this field operates on.
    fn dimension(&self) -> usize;

    /// Evaluates the state derivative at time `t` and state `y`.
    ///
    /// # Errors
    ///
    /// Each field defines its own `Error` type for model-level failures, such
    /// as a missing parameter or an input outside the model's domain.
    fn derivative(&self, t: f64, y: &[f64], params: &Parameters)
    -> Result<Vec<f64>, Self::Error>;
}

impl<F: VectorField + ?Sized> VectorField for &F {
    type Error = F::Error;

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn derivative(
        &self,
        t: f64,
        y: &[f64],
        params: &Parameters,
    ) -> Result<Vec<f64>, Self::Error> {
        (**self).derivative(t, y, params)
    }
}

/// A wrapper that allows using closures as vector fields.
///
/// Construct with [`field_fn`].
pub struct FnField<F, E> {
    dimension: usize,
    function: F,
    _marker: PhantomData<fn() -> E>,
}

/// Creates a [`VectorField`] of the given dimension from a closure.
///
/// Parameters are passed explicitly on every call rather than captured, so the
/// closure itself should capture nothing mutable.
///
/// # Example
///
/// ```
/// use odeflow_core::{Parameters, ParameterError, VectorField, field_fn};
///
/// let decay = field_fn(1, |_t, y: &[f64], p: &Parameters| {
///     Ok::<_, ParameterError>(vec![-p.get("k")? * y[0]])
/// });
///
/// let params = Parameters::new().with("k", 2.0);
/// assert_eq!(decay.derivative(0.0, &[3.0], &params).unwrap(), vec![-6.0]);
/// ```
pub fn field_fn<F, E>(dimension: usize, function: F) -> FnField<F, E>
where
    F: Fn(f64, &[f64], &Parameters) -> Result<Vec<f64>, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    FnField {
        dimension,
        function,
        _marker: PhantomData,
    }
}

impl<F, E> VectorField for FnField<F, E>
where
    F: Fn(f64, &[f64], &Parameters) -> Result<Vec<f64>, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn derivative(
        &self,
        t: f64,
        y: &[f64],
        params: &Parameters,
    ) -> Result<Vec<f64>, Self::Error> {
        (self.function)(t, y, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    use crate::ParameterError;

    /// Harmonic oscillator with unit mass: `x'' = -k x`.
    struct Oscillator;

    impl VectorField for Oscillator {
        type Error = ParameterError;

        fn dimension(&self) -> usize {
            2
        }

        fn derivative(
            &self,
            _t: f64,
            y: &[f64],
            params: &Parameters,
        ) -> Result<Vec<f64>, Self::Error> {
            let k = params.get("k")?;
            Ok(vec![y[1], -k * y[0]])
        }
    }

    #[test]
    fn struct_field_evaluates() {
        let params = Parameters::new().with("k", 4.0);
        let dydt = Oscillator.derivative(0.0, &[2.0, 1.0], &params).unwrap();

        assert_eq!(dydt.len(), Oscillator.dimension());
        assert_relative_eq!(dydt[0], 1.0);
        assert_relative_eq!(dydt[1], -8.0);
    }

    #[test]
    fn struct_field_reports_missing_parameter() {
        let result = Oscillator.derivative(0.0, &[2.0, 1.0], &Parameters::new());
        assert!(matches!(result, Err(ParameterError::Missing(name)) if name == "k"));
    }

    #[test]
    fn closure_field_evaluates() {
        let field = field_fn(1, |t, y: &[f64], _: &Parameters| {
            Ok::<_, Infallible>(vec![t * y[0]])
        });

        assert_eq!(field.dimension(), 1);
        let dydt = field.derivative(2.0, &[3.0], &Parameters::new()).unwrap();
        assert_relative_eq!(dydt[0], 6.0);
    }

    #[test]
    fn reference_forwards_to_field() {
        let params = Parameters::new().with("k", 1.0);
        let by_ref: &dyn VectorField<Error = ParameterError> = &Oscillator;

        assert_eq!(by_ref.dimension(), 2);
        assert_eq!(
            (&by_ref).derivative(0.0, &[1.0, 0.0], &params).unwrap(),
            vec![0.0, -1.0]
        );
    }
}
