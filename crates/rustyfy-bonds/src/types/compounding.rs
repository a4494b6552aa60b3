//! Compounding conventions for flat-rate discounting.

use serde::{Deserialize, Serialize};

use crate::error::{BondError, BondResult};

/// How a quoted annual rate compounds when discounting a cash flow.
///
/// # Example
///
/// ```rust
/// use rustyfy_bonds::types::Compounding;
///
/// let annual = Compounding::Periodic { frequency: 1 };
/// assert!((annual.discount_factor(0.05, 1.0) - 1.0 / 1.05).abs() < 1e-15);
///
/// let continuous = Compounding::Continuous;
/// assert!((continuous.discount_factor(0.05, 1.0) - (-0.05_f64).exp()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compounding {
    /// Periodic compounding: (1 + r/m)^(-m*t)
    Periodic {
        /// Compounding periods per year
        frequency: u32,
    },

    /// Continuous compounding: exp(-r*t)
    Continuous,
}

impl Compounding {
    /// Creates an annual periodic convention.
    #[must_use]
    pub const fn annual() -> Self {
        Self::Periodic { frequency: 1 }
    }

    /// Creates a semi-annual periodic convention.
    #[must_use]
    pub const fn semi_annual() -> Self {
        Self::Periodic { frequency: 2 }
    }

    /// Returns the compounding frequency, if periodic.
    #[must_use]
    pub const fn frequency(&self) -> Option<u32> {
        match self {
            Self::Periodic { frequency } => Some(*frequency),
            Self::Continuous => None,
        }
    }

    /// Checks the convention can discount at `rate`.
    ///
    /// Periodic conventions need at least one period a year and a per-period
    /// growth factor `1 + r/m` above zero.
    pub fn validate_rate(&self, rate: f64) -> BondResult<()> {
        if !rate.is_finite() {
            return Err(BondError::invalid_parameter(
                "interest_rate",
                format!("must be finite, got {rate}"),
            ));
        }
        match self {
            Self::Periodic { frequency: 0 } => Err(BondError::invalid_parameter(
                "compounding",
                "periodic frequency must be at least 1",
            )),
            Self::Periodic { frequency } if 1.0 + rate / f64::from(*frequency) <= 0.0 => {
                Err(BondError::invalid_parameter(
                    "interest_rate",
                    format!("rate {rate} leaves no positive growth at frequency {frequency}"),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Discount factor for `rate` over `time` years.
    #[must_use]
    pub fn discount_factor(&self, rate: f64, time: f64) -> f64 {
        match self {
            Self::Periodic { frequency } => {
                let m = f64::from(*frequency);
                (1.0 + rate / m).powf(-m * time)
            }
            Self::Continuous => (-rate * time).exp(),
        }
    }

    /// First derivative of the discount factor with respect to the rate.
    #[must_use]
    pub fn discount_factor_derivative(&self, rate: f64, time: f64) -> f64 {
        let df = self.discount_factor(rate, time);
        match self {
            Self::Periodic { frequency } => {
                let m = f64::from(*frequency);
                -time * df / (1.0 + rate / m)
            }
            Self::Continuous => -time * df,
        }
    }

    /// Second derivative of the discount factor with respect to the rate.
    #[must_use]
    pub fn discount_factor_second_derivative(&self, rate: f64, time: f64) -> f64 {
        let df = self.discount_factor(rate, time);
        match self {
            Self::Periodic { frequency } => {
                let m = f64::from(*frequency);
                let growth = 1.0 + rate / m;
                time * (time + 1.0 / m) * df / (growth * growth)
            }
            Self::Continuous => time * time * df,
        }
    }
}

impl Default for Compounding {
    fn default() -> Self {
        Self::annual()
    }
}
