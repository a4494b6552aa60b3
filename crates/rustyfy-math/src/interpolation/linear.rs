//! Linear interpolation.

use crate::error::{MathError, MathResult};
use crate::interpolation::{check_query, find_segment, validate_knots, ExtrapolationMethod, Interpolator};

/// Piecewise-linear interpolation between data points.
///
/// Consecutive knots are joined by straight lines. Queries outside the knot
/// range follow the configured [`ExtrapolationMethod`] (flat by default).
///
/// # Example
///
/// ```rust
/// use rustyfy_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0, 5.0, 10.0];
/// let ys = vec![0.00, 0.01, 0.005, 0.03, 0.04, 0.10];
///
/// let spline = LinearInterpolator::new(xs, ys).unwrap();
/// let values = spline.evaluate(&[0.5, 4.0, 12.0]).unwrap();
///
/// assert!((values[0] - 0.005).abs() < 1e-12);
/// assert!((values[1] - 0.035).abs() < 1e-12);
/// assert!((values[2] - 0.10).abs() < 1e-12); // flat beyond the last knot
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    extrapolation: ExtrapolationMethod,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator with flat extrapolation.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, if lengths differ,
    /// if any knot is non-finite or if `xs` is not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_knots(&xs, &ys, 2)?;

        Ok(Self {
            xs,
            ys,
            extrapolation: ExtrapolationMethod::default(),
        })
    }

    /// Sets the extrapolation policy.
    #[must_use]
    pub fn with_extrapolation(mut self, method: ExtrapolationMethod) -> Self {
        self.extrapolation = method;
        self
    }

    /// Returns the knot abscissae.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Returns the knot ordinates.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    fn slope(&self, i: usize) -> f64 {
        (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
    }

    fn out_of_range(&self, x: f64) -> MathError {
        MathError::ExtrapolationNotAllowed {
            x,
            min: self.min_x(),
            max: self.max_x(),
        }
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_query(x)?;
        let last = self.xs.len() - 1;

        if !self.in_range(x) {
            match self.extrapolation {
                ExtrapolationMethod::None => return Err(self.out_of_range(x)),
                ExtrapolationMethod::Flat => {
                    return Ok(if x < self.xs[0] { self.ys[0] } else { self.ys[last] });
                }
                ExtrapolationMethod::Linear => {}
            }
        }

        let i = find_segment(&self.xs, x);
        Ok(self.ys[i] + (x - self.xs[i]) * self.slope(i))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_query(x)?;

        if !self.in_range(x) {
            match self.extrapolation {
                ExtrapolationMethod::None => return Err(self.out_of_range(x)),
                ExtrapolationMethod::Flat => return Ok(0.0),
                ExtrapolationMethod::Linear => {}
            }
        }

        Ok(self.slope(find_segment(&self.xs, x)))
    }

    fn extrapolation(&self) -> ExtrapolationMethod {
        self.extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> LinearInterpolator {
        LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 4.0]).unwrap()
    }

    #[test]
    fn test_linear_interpolation() {
        let interp = sample();

        assert_relative_eq!(interp.interpolate(0.0).unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(1.0).unwrap(), 2.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(2.0).unwrap(), 4.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(1.5).unwrap(), 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_flat_extrapolation_is_default() {
        let interp = sample();

        assert_eq!(interp.extrapolation(), ExtrapolationMethod::Flat);
        assert_relative_eq!(interp.interpolate(-0.5).unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(2.5).unwrap(), 4.0, epsilon = 1e-10);
        assert_relative_eq!(interp.derivative(2.5).unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_extrapolation_disabled() {
        let interp = sample().with_extrapolation(ExtrapolationMethod::None);

        assert!(matches!(
            interp.interpolate(-0.5),
            Err(MathError::ExtrapolationNotAllowed { .. })
        ));
        assert!(interp.interpolate(2.5).is_err());
        assert!(interp.evaluate(&[0.5, 3.0]).is_err());
    }

    #[test]
    fn test_linear_extrapolation() {
        let interp = sample().with_extrapolation(ExtrapolationMethod::Linear);

        assert_relative_eq!(interp.interpolate(-1.0).unwrap(), -2.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(3.0).unwrap(), 6.0, epsilon = 1e-10);
        assert_relative_eq!(interp.derivative(3.0).unwrap(), 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_nan_query_rejected() {
        assert!(sample().interpolate(f64::NAN).is_err());
    }

    #[test]
    fn test_insufficient_points() {
        assert!(LinearInterpolator::new(vec![0.0], vec![1.0]).is_err());
    }

    #[test]
    fn test_unsorted_error() {
        let result = LinearInterpolator::new(vec![1.0, 0.0, 2.0], vec![1.0, 0.0, 2.0]);
        assert!(matches!(result, Err(MathError::InvalidParameter { .. })));
    }

    #[test]
    fn test_length_mismatch_error() {
        let result = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![1.0, 0.0]);
        assert!(matches!(result, Err(MathError::InvalidParameter { .. })));
    }
}
