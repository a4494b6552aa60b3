//! Straight bond priced at a flat rate.

use rustyfy_math::solvers::{hybrid, SolverConfig};

use crate::cashflows::CashFlowSchedule;
use crate::error::{ensure_finite, BondError, BondResult};
use crate::types::Compounding;

/// One basis point.
const BP: f64 = 0.0001;

/// Spacing of the default price-yield grid.
const GRID_STEP: f64 = 0.001;

/// Largest default price-yield grid.
pub const MAX_GRID_POINTS: usize = 100_000;

/// Bounds searched when solving for a yield.
const YIELD_BOUNDS: (f64, f64) = (-0.99, 10.0);

/// A level-coupon bond discounted at one flat rate.
///
/// Price, durations and convexity are computed once at construction.
///
/// # Compounding
///
/// By default the rate compounds at the coupon frequency `f`, with
/// `j = r / f` per period:
///
/// - Price = `sum CF_k / (1 + j)^k`
/// - Macaulay duration = `sum (k / f) * PV_k / P`
/// - Modified duration = Macaulay / `(1 + j)`
/// - Convexity = `sum PV_k * k * (k + 1) / (f^2 * (1 + j)^2 * P)`
///
/// Under [`Compounding::Continuous`] modified duration equals Macaulay.
///
/// # Example
///
/// ```rust
/// use rustyfy_bonds::instruments::SimpleBond;
///
/// // 1000 notional, 5 years, coupon 20 paid annually, 5% rate
/// let bond = SimpleBond::new(1000.0, 5, 20.0, 1, 0.05).unwrap();
///
/// assert!(bond.price() < 1000.0);
/// assert!(bond.mac_duration() < 5.0);
///
/// let (yields, prices) = bond.price_range(0.0, 0.10, 11).unwrap();
/// assert_eq!(yields.len(), 11);
/// assert!(prices.windows(2).all(|w| w[1] <= w[0]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleBond {
    schedule: CashFlowSchedule,
    interest_rate: f64,
    compounding: Compounding,
    price: f64,
    mac_duration: f64,
    mod_duration: f64,
    convexity: f64,
}

/// Price and rate sensitivities at one rate.
#[derive(Debug, Clone, Copy)]
struct Analytics {
    price: f64,
    mac_duration: f64,
    mod_duration: f64,
    convexity: f64,
}

impl SimpleBond {
    /// Creates a bond paying `coupon_amount` `coupon_freq` times a year for
    /// `n_periods` years, compounded at the coupon frequency.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_periods` or `coupon_freq` is zero, the notional
    /// is not positive, the coupon is negative, or the rate is `<= -1` or
    /// non-finite.
    pub fn new(
        notional: f64,
        n_periods: u32,
        coupon_amount: f64,
        coupon_freq: u32,
        interest_rate: f64,
    ) -> BondResult<Self> {
        if n_periods == 0 {
            return Err(BondError::invalid_parameter("n_periods", "must be at least 1"));
        }
        if coupon_freq == 0 {
            return Err(BondError::invalid_parameter("coupon_freq", "must be at least 1"));
        }
        let n_coupons = n_periods as usize * coupon_freq as usize;
        let schedule = CashFlowSchedule::level(notional, n_coupons, coupon_amount, coupon_freq)?;

        Self::from_schedule(
            schedule,
            interest_rate,
            Compounding::Periodic {
                frequency: coupon_freq,
            },
        )
    }

    /// Creates a bond from an existing schedule.
    pub fn from_schedule(
        schedule: CashFlowSchedule,
        interest_rate: f64,
        compounding: Compounding,
    ) -> BondResult<Self> {
        check_rate(interest_rate, compounding)?;
        let analytics = analyze(&schedule, interest_rate, compounding);

        Ok(Self {
            schedule,
            interest_rate,
            compounding,
            price: analytics.price,
            mac_duration: analytics.mac_duration,
            mod_duration: analytics.mod_duration,
            convexity: analytics.convexity,
        })
    }

    /// Returns the same bond under another compounding convention.
    pub fn with_compounding(&self, compounding: Compounding) -> BondResult<Self> {
        Self::from_schedule(self.schedule.clone(), self.interest_rate, compounding)
    }

    /// Returns the cash flow schedule.
    #[must_use]
    pub fn schedule(&self) -> &CashFlowSchedule {
        &self.schedule
    }

    /// Returns the flat discount rate.
    #[must_use]
    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    /// Returns the compounding convention.
    #[must_use]
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// Present value of all cash flows.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Macaulay duration in years.
    #[must_use]
    pub fn mac_duration(&self) -> f64 {
        self.mac_duration
    }

    /// Modified duration.
    #[must_use]
    pub fn mod_duration(&self) -> f64 {
        self.mod_duration
    }

    /// Convexity.
    #[must_use]
    pub fn convexity(&self) -> f64 {
        self.convexity
    }

    /// Price at another flat rate.
    pub fn price_at(&self, rate: f64) -> BondResult<f64> {
        check_rate(rate, self.compounding)?;
        Ok(analyze(&self.schedule, rate, self.compounding).price)
    }

    /// Prices at `steps` evenly spaced rates from `low` to `high` inclusive.
    ///
    /// Returns `(yields, prices)`. A single step yields `[low]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `steps` is zero, `low > high`, or any bound is
    /// non-finite or `<= -1`.
    pub fn price_range(
        &self,
        low: f64,
        high: f64,
        steps: usize,
    ) -> BondResult<(Vec<f64>, Vec<f64>)> {
        if steps == 0 {
            return Err(BondError::invalid_parameter("steps", "must be at least 1"));
        }
        ensure_finite("low", low)?;
        ensure_finite("high", high)?;
        if low > high {
            return Err(BondError::invalid_parameter(
                "low",
                format!("must not exceed high ({low} > {high})"),
            ));
        }
        // Rates are monotone between the bounds
        check_rate(low, self.compounding)?;

        let yields: Vec<f64> = if steps == 1 {
            vec![low]
        } else {
            let last = (steps - 1) as f64;
            (0..steps)
                .map(|i| low + (high - low) * i as f64 / last)
                .collect()
        };
        let prices = yields
            .iter()
            .map(|&y| analyze(&self.schedule, y, self.compounding).price)
            .collect();

        Ok((yields, prices))
    }

    /// Prices on the grid `0, 0.001, ...` up to twice the bond's rate.
    ///
    /// A non-positive rate gives the single point 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid would exceed [`MAX_GRID_POINTS`], that
    /// is for rates above 50.
    pub fn default_price_range(&self) -> BondResult<(Vec<f64>, Vec<f64>)> {
        let steps = (2.0 * self.interest_rate / GRID_STEP).round().max(0.0);
        if steps >= MAX_GRID_POINTS as f64 {
            return Err(BondError::invalid_parameter(
                "interest_rate",
                format!(
                    "grid up to {} needs more than {MAX_GRID_POINTS} points",
                    2.0 * self.interest_rate
                ),
            ));
        }
        let n = steps as usize;
        let yields: Vec<f64> = (0..=n).map(|i| i as f64 * GRID_STEP).collect();
        let prices = yields
            .iter()
            .map(|&y| analyze(&self.schedule, y, self.compounding).price)
            .collect();
        Ok((yields, prices))
    }

    /// Price change for a one basis point fall in the rate.
    pub fn dv01(&self) -> BondResult<f64> {
        let price_up = self.price_at(self.interest_rate + BP)?;
        let price_down = self.price_at(self.interest_rate - BP)?;

        // DV01 = (P_down - P_up) / 2
        Ok((price_down - price_up) / 2.0)
    }

    /// Estimates the price change for a rate move `dy`.
    ///
    /// ΔP ≈ -D * P * Δy + 0.5 * C * P * (Δy)²
    #[must_use]
    pub fn estimate_price_change(&self, dy: f64) -> f64 {
        let duration_effect = -self.mod_duration * self.price * dy;
        let convexity_effect = self.convexity * self.price * dy * dy / 2.0;
        duration_effect + convexity_effect
    }

    /// Flat rate at which the bond is worth `price`.
    ///
    /// # Errors
    ///
    /// Returns an error if `price` is not positive and finite, or if no rate
    /// in `(-0.99, 10.0)` reproduces it.
    pub fn yield_from_price(&self, price: f64) -> BondResult<f64> {
        ensure_finite("price", price)?;
        if price <= 0.0 {
            return Err(BondError::invalid_parameter(
                "price",
                format!("must be positive, got {price}"),
            ));
        }

        let f = |r: f64| analyze(&self.schedule, r, self.compounding).price - price;
        let df = |r: f64| {
            let a = analyze(&self.schedule, r, self.compounding);
            -a.mod_duration * a.price
        };

        let result = hybrid(f, df, self.interest_rate, Some(YIELD_BOUNDS), &SolverConfig::default())?;
        check_rate(result.root, self.compounding)?;
        Ok(result.root)
    }
}

fn check_rate(rate: f64, compounding: Compounding) -> BondResult<()> {
    ensure_finite("interest_rate", rate)?;
    if rate <= -1.0 {
        return Err(BondError::invalid_parameter(
            "interest_rate",
            format!("must be greater than -1, got {rate}"),
        ));
    }
    compounding.validate_rate(rate)
}

fn analyze(schedule: &CashFlowSchedule, rate: f64, compounding: Compounding) -> Analytics {
    let mut price = 0.0;
    let mut weighted_time = 0.0;
    let mut slope = 0.0;
    let mut curvature = 0.0;

    for (t, cf) in schedule.flows() {
        let pv = cf * compounding.discount_factor(rate, t);
        price += pv;
        weighted_time += t * pv;
        slope += cf * compounding.discount_factor_derivative(rate, t);
        curvature += cf * compounding.discount_factor_second_derivative(rate, t);
    }

    Analytics {
        price,
        mac_duration: weighted_time / price,
        mod_duration: -slope / price,
        convexity: curvature / price,
    }
}
