//! Locating the switch-on point of a boolean condition.
//!
//! Predicates have no residual to bisect on, only a truth value. Given an
//! interval where the condition is false at the left end and true at the right
//! end, [`locate`] halves the interval while keeping that invariant, and
//! returns the earliest point known to satisfy the condition.

/// Returns a point within `tol` of where `condition` switches from false to
/// true on `[off, on]`.
///
/// The caller guarantees `condition(off)` is false and `condition(on)` is true.
/// The returned point always satisfies the condition. Iteration stops after
/// `max_iters` halvings even if the tolerance has not been reached.
///
/// # Errors
///
/// Propagates any error returned by `condition`.
pub fn locate<C, E>(
    mut condition: C,
    mut off: f64,
    mut on: f64,
    tol: f64,
    max_iters: usize,
) -> Result<f64, E>
where
    C: FnMut(f64) -> Result<bool, E>,
{
    for _ in 0..max_iters {
        if (on - off).abs() <= tol {
            break;
        }
        let mid = 0.5 * (off + on);
        if condition(mid)? {
            on = mid;
        } else {
            off = mid;
        }
    }

    Ok(on)
}
