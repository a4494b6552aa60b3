//! Per-period forward rates.

use rustyfy_math::interpolation::Interpolator;
use serde::{Deserialize, Serialize};

use crate::error::{BondError, BondResult};

/// Continuously-compounded one-period forward rates.
///
/// Entry `k` is the rate from the start of period `k` to its end, so the
/// discount factor to the end of period `k` is `exp(-dt * (F[0] + ... + F[k]))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ForwardCurve {
    rates: Vec<f64>,
}

impl ForwardCurve {
    /// Creates a forward curve from per-period rates.
    ///
    /// # Errors
    ///
    /// Returns an error if `rates` is empty or holds a non-finite value.
    pub fn new(rates: Vec<f64>) -> BondResult<Self> {
        if rates.is_empty() {
            return Err(BondError::invalid_parameter(
                "forward_curve",
                "must contain at least one rate",
            ));
        }
        if let Some((k, r)) = rates.iter().enumerate().find(|(_, r)| !r.is_finite()) {
            return Err(BondError::invalid_parameter(
                "forward_curve",
                format!("rate {k} must be finite, got {r}"),
            ));
        }
        Ok(Self { rates })
    }

    /// Samples an interpolated forward curve at period mid-points.
    ///
    /// Period `k` takes the value at `(k + 0.5) * dt`.
    ///
    /// ```rust
    /// use rustyfy_bonds::types::ForwardCurve;
    /// use rustyfy_math::interpolation::LinearInterpolator;
    ///
    /// let interp = LinearInterpolator::new(vec![0.0, 4.0], vec![0.01, 0.05]).unwrap();
    /// let curve = ForwardCurve::from_interpolator(&interp, 4, 1.0).unwrap();
    /// assert!((curve.rate(0) - 0.015).abs() < 1e-12);
    /// assert!((curve.rate(3) - 0.045).abs() < 1e-12);
    /// ```
    pub fn from_interpolator(
        interpolator: &dyn Interpolator,
        n_periods: usize,
        dt: f64,
    ) -> BondResult<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(BondError::invalid_parameter(
                "dt",
                format!("must be positive and finite, got {dt}"),
            ));
        }
        let times: Vec<f64> = (0..n_periods).map(|k| (k as f64 + 0.5) * dt).collect();
        let rates = interpolator.evaluate(&times)?;
        Self::new(rates)
    }

    /// Number of periods covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Always false; a curve holds at least one rate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Returns the rates.
    #[must_use]
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Forward rate for period `k`, extended flat past the last period.
    #[must_use]
    pub fn rate(&self, k: usize) -> f64 {
        self.rates[k.min(self.rates.len() - 1)]
    }

    /// Discount factor from time 0 to the end of `periods` periods.
    ///
    /// Periods beyond the curve use the last rate.
    #[must_use]
    pub fn discount_factor(&self, periods: usize, dt: f64) -> f64 {
        let integral: f64 = (0..periods).map(|k| self.rate(k)).sum();
        (-dt * integral).exp()
    }
}

impl TryFrom<Vec<f64>> for ForwardCurve {
    type Error = BondError;

    fn try_from(rates: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(rates)
    }
}

impl From<ForwardCurve> for Vec<f64> {
    fn from(curve: ForwardCurve) -> Self {
        curve.rates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rustyfy_math::interpolation::{ExtrapolationMethod, LinearInterpolator};

    #[test]
    fn test_discount_factors() {
        let curve = ForwardCurve::new(vec![0.01, 0.02, 0.03]).unwrap();

        assert_relative_eq!(curve.discount_factor(0, 1.0), 1.0);
        assert_relative_eq!(curve.discount_factor(1, 1.0), (-0.01_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(curve.discount_factor(3, 1.0), (-0.06_f64).exp(), epsilon = 1e-15);
        // Flat extension past the curve
        assert_relative_eq!(curve.discount_factor(4, 1.0), (-0.09_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(curve.discount_factor(2, 0.5), (-0.015_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_rejects_invalid_rates() {
        assert!(matches!(
            ForwardCurve::new(vec![]),
            Err(BondError::InvalidParameter { name: "forward_curve", .. })
        ));
        assert!(ForwardCurve::new(vec![0.01, f64::NAN]).is_err());
        assert!(ForwardCurve::new(vec![0.01, f64::INFINITY]).is_err());
        // Negative forwards are valid
        assert!(ForwardCurve::new(vec![-0.005, 0.01]).is_ok());
    }

    #[test]
    fn test_from_interpolator_errors_propagate() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0], vec![0.01, 0.02])
            .unwrap()
            .with_extrapolation(ExtrapolationMethod::None);

        assert!(matches!(
            ForwardCurve::from_interpolator(&interp, 3, 1.0),
            Err(BondError::Math(_))
        ));
        assert!(ForwardCurve::from_interpolator(&interp, 0, 1.0).is_err());
        assert!(ForwardCurve::from_interpolator(&interp, 1, 0.0).is_err());
    }

    #[test]
    fn test_serde_as_plain_array() {
        let curve: ForwardCurve = serde_json::from_str("[0.01, 0.02]").unwrap();
        assert_eq!(curve.len(), 2);
        assert!(serde_json::from_str::<ForwardCurve>("[]").is_err());
    }
}
