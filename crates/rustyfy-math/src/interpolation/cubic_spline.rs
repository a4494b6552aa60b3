//! Natural cubic spline interpolation.

use crate::error::{MathError, MathResult};
use crate::interpolation::{check_query, find_segment, validate_knots, ExtrapolationMethod, Interpolator};

/// Natural cubic spline interpolation.
///
/// Piecewise cubic polynomials with continuous first and second derivatives;
/// "natural" means the second derivative is zero at both end knots.
///
/// # Example
///
/// ```rust
/// use rustyfy_math::interpolation::{CubicSpline, Interpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let spline = CubicSpline::new(xs, ys).unwrap();
/// let y = spline.interpolate(1.5).unwrap();
/// assert!(y > 1.0 && y < 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at each knot
    y2s: Vec<f64>,
    extrapolation: ExtrapolationMethod,
}

impl CubicSpline {
    /// Creates a natural cubic spline with flat extrapolation.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 3 points, if lengths differ,
    /// if any knot is non-finite or if `xs` is not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_knots(&xs, &ys, 3)?;
        let y2s = second_derivatives(&xs, &ys);

        Ok(Self {
            xs,
            ys,
            y2s,
            extrapolation: ExtrapolationMethod::default(),
        })
    }

    /// Sets the extrapolation policy.
    #[must_use]
    pub fn with_extrapolation(mut self, method: ExtrapolationMethod) -> Self {
        self.extrapolation = method;
        self
    }

    fn value_in_segment(&self, i: usize, x: f64) -> f64 {
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;

        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.y2s[i] + (b * b * b - b) * self.y2s[i + 1]) * (h * h) / 6.0
    }

    fn slope_in_segment(&self, i: usize, x: f64) -> f64 {
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;

        (self.ys[i + 1] - self.ys[i]) / h - (3.0 * a * a - 1.0) / 6.0 * h * self.y2s[i]
            + (3.0 * b * b - 1.0) / 6.0 * h * self.y2s[i + 1]
    }

    /// Boundary knot and its segment for an out-of-range query.
    fn boundary(&self, x: f64) -> (f64, usize) {
        if x < self.xs[0] {
            (self.xs[0], 0)
        } else {
            (self.xs[self.xs.len() - 1], self.xs.len() - 2)
        }
    }

    fn out_of_range(&self, x: f64) -> MathError {
        MathError::ExtrapolationNotAllowed {
            x,
            min: self.min_x(),
            max: self.max_x(),
        }
    }
}

impl Interpolator for CubicSpline {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_query(x)?;

        if !self.in_range(x) {
            let (edge, i) = self.boundary(x);
            return match self.extrapolation {
                ExtrapolationMethod::None => Err(self.out_of_range(x)),
                ExtrapolationMethod::Flat => Ok(self.value_in_segment(i, edge)),
                ExtrapolationMethod::Linear => {
                    Ok(self.value_in_segment(i, edge) + (x - edge) * self.slope_in_segment(i, edge))
                }
            };
        }

        Ok(self.value_in_segment(find_segment(&self.xs, x), x))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_query(x)?;

        if !self.in_range(x) {
            let (edge, i) = self.boundary(x);
            return match self.extrapolation {
                ExtrapolationMethod::None => Err(self.out_of_range(x)),
                ExtrapolationMethod::Flat => Ok(0.0),
                ExtrapolationMethod::Linear => Ok(self.slope_in_segment(i, edge)),
            };
        }

        Ok(self.slope_in_segment(find_segment(&self.xs, x), x))
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

/// Solves the tridiagonal system for the natural spline's knot curvatures.
fn second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut y2s = vec![0.0; n];
    let mut u = vec![0.0; n - 1];

    // Decomposition
    for i in 1..n - 1 {
        let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
        let p = sig * y2s[i - 1] + 2.0;
        y2s[i] = (sig - 1.0) / p;
        let d = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]) - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        u[i] = (6.0 * d / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
    }

    // Back-substitution, y2s[n-1] stays zero
    for i in (0..n - 1).rev() {
        y2s[i] = y2s[i] * y2s[i + 1] + u[i];
    }

    y2s
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn squares() -> CubicSpline {
        CubicSpline::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 4.0, 9.0]).unwrap()
    }

    #[test]
    fn test_cubic_spline_through_points() {
        let spline = squares();

        for (x, y) in [(0.0, 0.0), (1.0, 1.0), (2.0, 4.0), (3.0, 9.0)] {
            assert_relative_eq!(spline.interpolate(x).unwrap(), y, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_natural_boundary_conditions() {
        let spline = squares();

        assert_relative_eq!(spline.y2s[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(spline.y2s[3], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reproduces_straight_line() {
        let spline = CubicSpline::new(vec![0.0, 1.0, 3.0, 4.0], vec![1.0, 3.0, 7.0, 9.0]).unwrap();

        assert_relative_eq!(spline.interpolate(2.0).unwrap(), 5.0, epsilon = 1e-10);
        assert_relative_eq!(spline.derivative(0.5).unwrap(), 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_extrapolation_policies() {
        let flat = squares();
        assert_relative_eq!(flat.interpolate(-0.5).unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(flat.interpolate(3.5).unwrap(), 9.0, epsilon = 1e-10);

        let strict = squares().with_extrapolation(ExtrapolationMethod::None);
        assert!(strict.interpolate(-0.5).is_err());
        assert!(strict.interpolate(3.5).is_err());

        let linear = squares().with_extrapolation(ExtrapolationMethod::Linear);
        let slope = linear.derivative(3.0).unwrap();
        assert_relative_eq!(linear.interpolate(3.5).unwrap(), 9.0 + 0.5 * slope, epsilon = 1e-10);
    }

    #[test]
    fn test_insufficient_points() {
        // Cubic spline needs at least 3 points
        assert!(CubicSpline::new(vec![0.0, 1.0], vec![0.0, 1.0]).is_err());
    }
}
