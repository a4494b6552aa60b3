//! Interpolation methods for rate curve construction.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: Piecewise-linear interpolation
//! - [`CubicSpline`]: Natural cubic spline interpolation
//!
//! # Extrapolation
//!
//! Behaviour outside `[min_x, max_x]` is always explicit and chosen with
//! [`ExtrapolationMethod`]. The default is [`ExtrapolationMethod::Flat`],
//! which holds the nearest boundary value.
//!
//! | Method | Smoothness | Outside the knots |
//! |--------|------------|-------------------|
//! | Linear | C0 | Flat / Linear / Error |
//! | Cubic Spline | C2 | Flat / Linear / Error |

mod cubic_spline;
mod linear;

pub use cubic_spline::CubicSpline;
pub use linear::LinearInterpolator;

use crate::error::{MathError, MathResult};

/// Policy for query points outside the knot range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExtrapolationMethod {
    /// Reject out-of-range queries with [`MathError::ExtrapolationNotAllowed`].
    None,
    /// Hold the value at the nearest boundary knot.
    #[default]
    Flat,
    /// Extend the boundary slope.
    Linear,
}

/// Trait for interpolation methods.
///
/// All interpolation methods implement this trait, providing a unified
/// build-then-evaluate interface.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns the extrapolation policy in force.
    fn extrapolation(&self) -> ExtrapolationMethod;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }

    /// Evaluates the interpolant at every query point, in order.
    ///
    /// Fails on the first query that cannot be evaluated.
    fn evaluate(&self, xs: &[f64]) -> MathResult<Vec<f64>> {
        xs.iter().map(|&x| self.interpolate(x)).collect()
    }
}

/// Validates knot vectors shared by all interpolators.
pub(crate) fn validate_knots(xs: &[f64], ys: &[f64], min_points: usize) -> MathResult<()> {
    if xs.len() != ys.len() {
        return Err(MathError::invalid_parameter(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < min_points {
        return Err(MathError::insufficient_data(min_points, xs.len()));
    }
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_parameter("knots must be finite"));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MathError::invalid_parameter(
            "x values must be strictly increasing",
        ));
    }
    Ok(())
}

/// Finds the index i such that xs[i] <= x < xs[i+1], clamped to a valid segment.
pub(crate) fn find_segment(xs: &[f64], x: f64) -> usize {
    let last = xs.len() - 2;
    match xs.binary_search_by(|probe| probe.total_cmp(&x)) {
        Ok(i) => i.min(last),
        Err(i) => i.saturating_sub(1).min(last),
    }
}

/// Rejects NaN query points.
pub(crate) fn check_query(x: f64) -> MathResult<()> {
    if x.is_nan() {
        return Err(MathError::invalid_parameter("query point is NaN"));
    }
    Ok(())
}
