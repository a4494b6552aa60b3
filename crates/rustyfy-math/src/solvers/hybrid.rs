//! Hybrid root-finding algorithm and bracket search.
//!
//! Combines Newton-Raphson with Brent's method for robust convergence.

use crate::error::{MathError, MathResult};
use crate::solvers::{brent, SolverConfig, SolverResult};

/// Newton iterations allowed before falling back to Brent.
const NEWTON_BUDGET: u32 = 20;

/// Consecutive divergent Newton steps tolerated.
const MAX_DIVERGENCE: u32 = 3;

/// Hybrid root-finding algorithm.
///
/// Starts with Newton-Raphson and falls back to Brent's method if Newton
/// diverges, meets a flat derivative, or leaves the finite range.
///
/// # Strategy
///
/// 1. Try Newton-Raphson with a limited number of iterations
/// 2. On failure, run Brent on `bounds` (or on a bracket found by
///    [`expand_bracket`] around the initial guess when no bounds are given)
///
/// # Example
///
/// ```rust
/// use rustyfy_math::solvers::{hybrid, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let df = |x: f64| 3.0 * x * x - 1.0;
///
/// let result = hybrid(f, df, 1.5, Some((1.0, 2.0)), &SolverConfig::default()).unwrap();
/// assert!((f(result.root)).abs() < 1e-10);
/// ```
pub fn hybrid<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    match newton_with_monitoring(&f, &df, initial_guess, config) {
        Ok(result) => Ok(result),
        Err(newton_err) => {
            log::warn!(
                "Newton-Raphson failed from x0 = {initial_guess}: {newton_err}; falling back to Brent"
            );
            let (a, b) = match bounds {
                Some(bracket) => bracket,
                None => expand_bracket(&f, initial_guess, 0.1, 50)?,
            };
            brent(&f, a, b, config)
        }
    }
}

/// Newton-Raphson with divergence detection.
fn newton_with_monitoring<F, DF>(
    f: &F,
    df: &DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;
    let mut prev_residual = f64::MAX;
    let mut divergence_count = 0;
    let max_iter = config.max_iterations.min(NEWTON_BUDGET);

    for iteration in 0..max_iter {
        let fx = f(x);
        let residual = fx.abs();

        if residual < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        if residual > prev_residual * 2.0 {
            divergence_count += 1;
            if divergence_count >= MAX_DIVERGENCE {
                return Err(MathError::convergence_failed(iteration, residual));
            }
        } else {
            divergence_count = 0;
        }
        prev_residual = residual;

        let dfx = df(x);
        if dfx.abs() < 1e-15 {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let step = fx / dfx;
        x -= step;

        if !x.is_finite() {
            return Err(MathError::convergence_failed(iteration + 1, f64::INFINITY));
        }

        if step.abs() < config.tolerance {
            let final_fx = f(x);
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: final_fx,
            });
        }
    }

    Err(MathError::convergence_failed(max_iter, f(x).abs()))
}

/// Searches for a sign-changing bracket `[a, b]` around `center`.
///
/// Starts from `[center - half_width, center + half_width]` and doubles the
/// half-width up to `max_expansions` times.
///
/// # Errors
///
/// Returns [`MathError::InvalidParameter`] for a non-finite centre or a
/// non-positive width, and [`MathError::InvalidBracket`] (carrying the widest
/// interval tried) when no sign change is found.
///
/// # Example
///
/// ```rust
/// use rustyfy_math::solvers::expand_bracket;
///
/// let (a, b) = expand_bracket(|x: f64| x - 3.0, 0.0, 0.5, 10).unwrap();
/// assert!(a <= 3.0 && b >= 3.0);
/// ```
pub fn expand_bracket<F>(
    f: F,
    center: f64,
    half_width: f64,
    max_expansions: u32,
) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    if !center.is_finite() {
        return Err(MathError::invalid_parameter(format!(
            "bracket centre must be finite, got {center}"
        )));
    }
    if !(half_width > 0.0 && half_width.is_finite()) {
        return Err(MathError::invalid_parameter(format!(
            "bracket half-width must be positive, got {half_width}"
        )));
    }

    let mut width = half_width;
    let mut a = center - width;
    let mut b = center + width;
    let mut fa = f(a);
    let mut fb = f(b);

    for _ in 0..max_expansions {
        if fa * fb <= 0.0 {
            return Ok((a, b));
        }
        width *= 2.0;
        a = center - width;
        b = center + width;
        fa = f(a);
        fb = f(b);
    }

    if fa * fb <= 0.0 {
        Ok((a, b))
    } else {
        Err(MathError::InvalidBracket { a, b, fa, fb })
    }
}

/// Searches for a sign-changing bracket of a monotone function, starting at
/// `start` and walking only towards the root.
///
/// The direction is taken from whichever of `f(start)` and
/// `f(start + step)` is smaller in magnitude; the step then doubles up to
/// `max_expansions` times. Unlike [`expand_bracket`], the far side of the
/// root is never evaluated, so `f` only needs to be finite between `start`
/// and the root.
///
/// # Errors
///
/// Returns [`MathError::InvalidParameter`] for a non-finite start or a
/// non-positive step, and [`MathError::InvalidBracket`] when no sign change
/// is found.
///
/// # Example
///
/// ```rust
/// use rustyfy_math::solvers::expand_bracket_monotone;
///
/// let f = |r: f64| (-r).exp() - 0.5;
/// let (a, b) = expand_bracket_monotone(f, 0.0, 0.05, 20).unwrap();
/// assert!(a <= 2.0_f64.ln() && b >= 2.0_f64.ln());
/// ```
pub fn expand_bracket_monotone<F>(
    f: F,
    start: f64,
    step: f64,
    max_expansions: u32,
) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    if !start.is_finite() {
        return Err(MathError::invalid_parameter(format!(
            "bracket start must be finite, got {start}"
        )));
    }
    if !(step > 0.0 && step.is_finite()) {
        return Err(MathError::invalid_parameter(format!(
            "bracket step must be positive, got {step}"
        )));
    }

    let f_start = f(start);
    if f_start == 0.0 {
        return Ok((start, start));
    }

    let f_up = f(start + step);
    if f_start * f_up <= 0.0 {
        return Ok((start, start + step));
    }
    let direction = if f_up.abs() < f_start.abs() { 1.0 } else { -1.0 };

    let mut near = start;
    let mut width = step;
    let mut far = start + direction * width;
    let mut f_far = if direction > 0.0 { f_up } else { f(far) };

    for _ in 0..max_expansions {
        if f_start * f_far <= 0.0 {
            break;
        }
        near = far;
        width *= 2.0;
        far = start + direction * width;
        f_far = f(far);
    }

    if f_start * f_far <= 0.0 {
        Ok((near.min(far), near.max(far)))
    } else {
        let (a, fa, b, fb) = if direction > 0.0 {
            (start, f_start, far, f_far)
        } else {
            (far, f_far, start, f_start)
        };
        Err(MathError::InvalidBracket { a, b, fa, fb })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;
        let df = |x: f64| 2.0 * x;

        let result = hybrid(f, df, 1.5, Some((1.0, 2.0)), &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_fallback_to_brent() {
        // A flat derivative stops Newton on the first step
        let f = |x: f64| x * x * x - 2.0 * x - 5.0;
        let df = |_x: f64| 0.0;

        let result = hybrid(f, df, 0.0, Some((1.0, 3.0)), &SolverConfig::default()).unwrap();

        assert!(f(result.root).abs() < 1e-10);
    }

    #[test]
    fn test_auto_bracket_when_no_bounds() {
        let f = |x: f64| x * x - 2.0;
        let df = |_x: f64| 0.0;

        let result = hybrid(f, df, 1.0, None, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn test_expand_bracket_monotone_discount() {
        // Decreasing in r, root far from the centre
        let f = |r: f64| (-r).exp() - 0.5;

        let (a, b) = expand_bracket(f, 0.0, 0.05, 20).unwrap();

        let root = 2.0_f64.ln();
        assert!(a <= root && root <= b);
    }

    #[test]
    fn test_expand_bracket_no_sign_change() {
        let f = |x: f64| x * x + 1.0;

        let result = expand_bracket(f, 0.0, 1.0, 5);

        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_monotone_bracket_walks_one_way() {
        // Overflows to NaN below -700, so a symmetric search would fail
        let f = |x: f64| {
            assert!(x > -700.0, "evaluated far side at {x}");
            (-x).exp() - (-600.0_f64).exp()
        };

        let (a, b) = expand_bracket_monotone(f, 0.0, 0.5, 20).unwrap();

        assert!(a <= 600.0 && 600.0 <= b);
        assert!(f(a) * f(b) <= 0.0);
    }

    #[test]
    fn test_monotone_bracket_downward() {
        let f = |x: f64| 2.0 - x;

        let (a, b) = expand_bracket_monotone(f, 10.0, 0.5, 10).unwrap();

        assert!(a <= 2.0 && 2.0 <= b);
        assert!(b <= 10.0);
    }

    #[test]
    fn test_monotone_bracket_exhausted() {
        let f = |x: f64| 100.0 - x;

        let result = expand_bracket_monotone(f, 0.0, 1.0, 3);

        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
        assert!(expand_bracket_monotone(f, 0.0, -1.0, 3).is_err());
    }

    #[test]
    fn test_expand_bracket_rejects_bad_width() {
        assert!(expand_bracket(|x: f64| x, 0.0, 0.0, 5).is_err());
        assert!(expand_bracket(|x: f64| x, f64::NAN, 1.0, 5).is_err());
    }
}
