//! Notional and coupon schedule.

use serde::Serialize;

use crate::error::{ensure_finite, BondError, BondResult};

/// Notional, per-period coupons and coupon frequency.
///
/// # Example
///
/// ```rust
/// use rustyfy_bonds::cashflows::CashFlowSchedule;
///
/// // Five annual coupons of 20 on a 1000 notional
/// let schedule = CashFlowSchedule::level(1000.0, 5, 20.0, 1).unwrap();
/// assert_eq!(schedule.n_periods(), 5);
/// assert_eq!(schedule.cash_flow(4), 1020.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowSchedule {
    notional: f64,
    coupons: Vec<f64>,
    frequency: u32,
}

impl CashFlowSchedule {
    /// Creates a schedule of `n_periods` coupons.
    ///
    /// Omitted coupons default to zero (a zero-coupon bond).
    ///
    /// # Errors
    ///
    /// Returns an error if the notional is not positive and finite, if
    /// `n_periods` or `frequency` is zero, if the supplied coupons do not
    /// number `n_periods`, or if any coupon is negative or non-finite.
    pub fn new(
        notional: f64,
        n_periods: usize,
        coupons: Option<Vec<f64>>,
        frequency: u32,
    ) -> BondResult<Self> {
        ensure_finite("notional", notional)?;
        if notional <= 0.0 {
            return Err(BondError::invalid_parameter(
                "notional",
                format!("must be positive, got {notional}"),
            ));
        }
        if n_periods == 0 {
            return Err(BondError::invalid_parameter(
                "n_periods",
                "must be at least 1",
            ));
        }
        if frequency == 0 {
            return Err(BondError::invalid_parameter(
                "coupon_freq",
                "must be at least 1",
            ));
        }

        let coupons = coupons.unwrap_or_else(|| vec![0.0; n_periods]);
        if coupons.len() != n_periods {
            return Err(BondError::invalid_parameter(
                "coupons",
                format!(
                    "expected {n_periods} coupons, got {}",
                    coupons.len()
                ),
            ));
        }
        for &c in &coupons {
            ensure_finite("coupons", c)?;
            if c < 0.0 {
                return Err(BondError::invalid_parameter(
                    "coupons",
                    format!("must be non-negative, got {c}"),
                ));
            }
        }

        Ok(Self {
            notional,
            coupons,
            frequency,
        })
    }

    /// Creates a schedule paying the same coupon every period.
    pub fn level(notional: f64, n_coupons: usize, coupon: f64, frequency: u32) -> BondResult<Self> {
        Self::new(notional, n_coupons, Some(vec![coupon; n_coupons]), frequency)
    }

    /// Creates an annual zero-coupon schedule.
    pub fn zero_coupon(notional: f64, n_periods: usize) -> BondResult<Self> {
        Self::new(notional, n_periods, None, 1)
    }

    /// Returns the notional repaid at maturity.
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Returns the coupon amounts.
    #[must_use]
    pub fn coupons(&self) -> &[f64] {
        &self.coupons
    }

    /// Coupon paid at the end of period `k`.
    #[must_use]
    pub fn coupon(&self, k: usize) -> f64 {
        self.coupons[k]
    }

    /// Number of coupon periods.
    #[must_use]
    pub fn n_periods(&self) -> usize {
        self.coupons.len()
    }

    /// Coupons per year.
    #[must_use]
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// True when every coupon is zero.
    #[must_use]
    pub fn is_zero_coupon(&self) -> bool {
        self.coupons.iter().all(|&c| c == 0.0)
    }

    /// Total payment at the end of period `k`, including the notional at maturity.
    #[must_use]
    pub fn cash_flow(&self, k: usize) -> f64 {
        if k + 1 == self.coupons.len() {
            self.coupons[k] + self.notional
        } else {
            self.coupons[k]
        }
    }

    /// Payment time of period `k` in years.
    #[must_use]
    pub fn time(&self, k: usize) -> f64 {
        (k + 1) as f64 / f64::from(self.frequency)
    }

    /// Iterates `(time, amount)` for every payment.
    pub fn flows(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        (0..self.coupons.len()).map(|k| (self.time(k), self.cash_flow(k)))
    }
}
