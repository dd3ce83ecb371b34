use odeflow_core::{Parameters, VectorField};

use super::{
    Config, Error, Step,
    tableau::{A, B, C, E, ERROR_EXPONENT, STAGES},
};

/// Computes Dormand-Prince steps and decides their fate.
///
/// The controller is stateless between attempts: it takes a state, its
/// derivative, and a step size, and returns the candidate step with its
/// scaled error norm. The integration loop owns the bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepController {
    rtol: f64,
    atol: f64,
    safety: f64,
    min_factor: f64,
    max_factor: f64,
}

impl StepController {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            rtol: config.rtol,
            atol: config.atol,
            safety: config.safety,
            min_factor: config.min_factor,
            max_factor: config.max_factor,
        }
    }

    /// Attempts one step of size `h` from `(t, y)`, where `f0 = f(t, y)`.
    ///
    /// Performs six field evaluations. The returned step is marked accepted
    /// when its error norm is at most one; a non-finite norm always rejects.
    ///
    /// # Errors
    ///
    /// Returns an error if the field fails or returns the wrong dimension.
    pub fn attempt<F: VectorField>(
        &self,
        field: &F,
        params: &Parameters,
        t: f64,
        y: &[f64],
        f0: &[f64],
        h: f64,
    ) -> Result<Step, Error> {
        let mut stages: [Vec<f64>; STAGES] = std::array::from_fn(|_| Vec::new());
        stages[0] = f0.to_vec();

        for s in 1..STAGES - 1 {
            let y_stage = stage_state(y, h, &A[s][..s], &stages[..s]);
            stages[s] = evaluate(field, params, t + C[s] * h, &y_stage)?;
        }

        // The last stage point is the fifth-order solution.
        let last = STAGES - 1;
        let y_end = stage_state(y, h, &B[..last], &stages[..last]);
        stages[last] = evaluate(field, params, t + h, &y_end)?;

        let error: Vec<f64> = (0..y.len())
            .map(|i| h * E.iter().zip(&stages).map(|(e, k)| e * k[i]).sum::<f64>())
            .collect();
        let error_norm = self.error_norm(y, &y_end, &error);

        Ok(Step {
            t_start: t,
            t_end: t + h,
            h,
            y_start: y.to_vec(),
            y_end,
            stages,
            error_norm,
            accepted: error_norm <= 1.0,
        })
    }

    /// Returns `max_i |error_i| / (atol + rtol * max(|y_i|, |y_new_i|))`.
    ///
    /// Any non-finite ratio yields infinity.
    #[must_use]
    pub fn error_norm(&self, y: &[f64], y_new: &[f64], error: &[f64]) -> f64 {
        let mut norm = 0.0_f64;
        for ((y, y_new), error) in y.iter().zip(y_new).zip(error) {
            let scale = self.atol + self.rtol * y.abs().max(y_new.abs());
            let ratio = (error / scale).abs();
            if !ratio.is_finite() {
                return f64::INFINITY;
            }
            norm = norm.max(ratio);
        }
        norm
    }

    /// Returns the ratio between the next step size and the current one.
    #[must_use]
    pub fn factor(&self, error_norm: f64) -> f64 {
        if error_norm == 0.0 {
            self.max_factor
        } else if !error_norm.is_finite() {
            self.min_factor
        } else {
            (self.safety * error_norm.powf(ERROR_EXPONENT)).clamp(self.min_factor, self.max_factor)
        }
    }

    /// Estimates a starting step size (Hairer, Nørsett and Wanner, II.4).
    ///
    /// Costs one field evaluation. The result never exceeds `span`.
    ///
    /// # Errors
    ///
    /// Returns an error if the field fails or returns the wrong dimension.
    pub fn initial_step<F: VectorField>(
        &self,
        field: &F,
        params: &Parameters,
        t0: f64,
        y0: &[f64],
        f0: &[f64],
        span: f64,
    ) -> Result<f64, Error> {
        let scale: Vec<f64> = y0.iter().map(|y| self.atol + self.rtol * y.abs()).collect();

        let d0 = rms_norm(y0, &scale);
        let d1 = rms_norm(f0, &scale);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        }
        .min(span);

        let y1: Vec<f64> = y0.iter().zip(f0).map(|(y, f)| y + h0 * f).collect();
        let f1 = evaluate(field, params, t0 + h0, &y1)?;
        let df: Vec<f64> = f1.iter().zip(f0).map(|(a, b)| a - b).collect();
        let d2 = rms_norm(&df, &scale) / h0;

        let d = d1.max(d2);
        let h1 = if d <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d).powf(-ERROR_EXPONENT)
        };

        Ok((100.0 * h0).min(h1).min(span))
    }
}

/// Evaluates the field and checks the derivative's dimension.
pub(super) fn evaluate<F: VectorField>(
    field: &F,
    params: &Parameters,
    t: f64,
    y: &[f64],
) -> Result<Vec<f64>, Error> {
    let dydt = field.derivative(t, y, params).map_err(Error::field)?;
    if dydt.len() == y.len() {
        Ok(dydt)
    } else {
        Err(Error::DimensionMismatch {
            expected: y.len(),
            actual: dydt.len(),
        })
    }
}

/// Returns `y + h * sum_j a_j k_j`.
fn stage_state(y: &[f64], h: f64, a: &[f64], k: &[Vec<f64>]) -> Vec<f64> {
    y.iter()
        .enumerate()
        .map(|(i, y)| y + h * a.iter().zip(k).map(|(a, k)| a * k[i]).sum::<f64>())
        .collect()
}

fn rms_norm(values: &[f64], scale: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values
        .iter()
        .zip(scale)
        .map(|(v, s)| (v / s).powi(2))
        .sum();
    (sum / values.len() as f64).sqrt()
}
