use super::tableau::{P, STAGES};

/// One attempted integration step together with its dense output.
///
/// The seven stage derivatives are kept so the step can be evaluated anywhere
/// in `[t_start, t_end]` with the fourth-order continuous extension.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Step {
    pub t_start: f64,
    pub t_end: f64,
    /// Step size the stages were computed with.
    ///
    /// Equals `t_end - t_start` except after [`truncate`](Self::truncate).
    pub h: f64,
    pub y_start: Vec<f64>,
    pub y_end: Vec<f64>,
    pub stages: [Vec<f64>; STAGES],
    /// Scaled local error estimate; the step is accepted when it is at most 1.
    pub error_norm: f64,
    pub accepted: bool,
}

impl Step {
    /// Evaluates the continuous extension at `t`.
    ///
    /// The endpoints return the stored states exactly. Times outside the step
    /// extrapolate the polynomial, which callers should avoid.
    #[must_use]
    pub fn interpolate(&self, t: f64) -> Vec<f64> {
        if t == self.t_start {
            return self.y_start.clone();
        }
        if t == self.t_end {
            return self.y_end.clone();
        }

        let theta = (t - self.t_start) / self.h;
        let weights: [f64; STAGES] = std::array::from_fn(|s| {
            let p = &P[s];
            theta * (p[0] + theta * (p[1] + theta * (p[2] + theta * p[3])))
        });

        self.combine(&self.y_start, self.h, &weights)
    }

    /// Evaluates the time derivative of the continuous extension at `t`.
    #[must_use]
    pub fn derivative_at(&self, t: f64) -> Vec<f64> {
        if t == self.t_start {
            return self.stages[0].clone();
        }

        let theta = (t - self.t_start) / self.h;
        let weights: [f64; STAGES] = std::array::from_fn(|s| {
            let p = &P[s];
            p[0] + theta * (2.0 * p[1] + theta * (3.0 * p[2] + theta * 4.0 * p[3]))
        });

        let zero = vec![0.0; self.y_start.len()];
        self.combine(&zero, 1.0, &weights)
    }

    /// Shortens the step so it ends at `t`, which must lie inside it.
    pub(crate) fn truncate(&mut self, t: f64) {
        self.y_end = self.interpolate(t);
        self.t_end = t;
    }

    /// Returns `base + scale * sum_s weights[s] * k_s`.
    fn combine(&self, base: &[f64], scale: f64, weights: &[f64; STAGES]) -> Vec<f64> {
        base.iter()
            .enumerate()
            .map(|(i, b)| {
                let sum: f64 = weights
                    .iter()
                    .zip(&self.stages)
                    .map(|(w, k)| w * k[i])
                    .sum();
                b + scale * sum
            })
            .collect()
    }
}
