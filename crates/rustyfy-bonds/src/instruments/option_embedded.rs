//! Callable and puttable bonds priced on a short-rate lattice.

use crate::cashflows::CashFlowSchedule;
use crate::config::LatticeConfig;
use crate::error::BondResult;
use crate::lattice::{PriceLattice, RateLattice, TreeLevel};
use crate::types::{ExerciseRule, ForwardCurve, OptionKind};

/// A bond with an embedded call or put, priced by backward induction.
///
/// The short-rate lattice is calibrated to the forward curve, then the
/// schedule is rolled back from maturity. At every node before maturity the
/// exercise rule caps (call) or floors (put) the continuation value. All
/// pricing happens at construction.
///
/// # Example
///
/// ```rust
/// use rustyfy_bonds::instruments::OptionEmbeddedBond;
/// use rustyfy_bonds::types::ExerciseRule;
///
/// let rule = ExerciseRule::call(100.0).unwrap();
/// let bond = OptionEmbeddedBond::new(
///     100.0,
///     rule,
///     vec![0.01, 0.02, 0.03],
///     0.0,
///     None,
/// )
/// .unwrap();
///
/// assert!((bond.price() - 100.0 * (-0.06_f64).exp()).abs() < 1e-10);
/// assert_eq!(bond.binomial_tree().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptionEmbeddedBond {
    schedule: CashFlowSchedule,
    rule: ExerciseRule,
    rates: RateLattice,
    prices: PriceLattice,
    straight_price: f64,
}

impl OptionEmbeddedBond {
    /// Creates and prices a bond on annual lattice periods.
    ///
    /// `forward_curve` holds one forward rate per period and fixes the
    /// number of periods. Omitted coupons are zero.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid inputs or if calibration fails.
    pub fn new(
        notional: f64,
        rule: ExerciseRule,
        forward_curve: Vec<f64>,
        interest_vol: f64,
        coupons: Option<Vec<f64>>,
    ) -> BondResult<Self> {
        Self::with_config(
            notional,
            rule,
            forward_curve,
            interest_vol,
            coupons,
            &LatticeConfig::default(),
        )
    }

    /// Creates and prices a bond with explicit lattice settings.
    pub fn with_config(
        notional: f64,
        rule: ExerciseRule,
        forward_curve: Vec<f64>,
        interest_vol: f64,
        coupons: Option<Vec<f64>>,
        config: &LatticeConfig,
    ) -> BondResult<Self> {
        let curve = ForwardCurve::new(forward_curve)?;
        let schedule = CashFlowSchedule::new(notional, curve.len(), coupons, 1)?;
        let lattice = RateLattice::build_with_config(&curve, interest_vol, config)?;
        Self::from_parts(lattice, schedule, rule)
    }

    /// Creates and prices a bond from an option type name, `"call"` or `"put"`.
    ///
    /// ```rust
    /// use rustyfy_bonds::instruments::OptionEmbeddedBond;
    ///
    /// let bond = OptionEmbeddedBond::from_kind(
    ///     1000.0, "put", 990.0, vec![0.01, 0.02, 0.03], 0.3, Some(vec![20.0, 20.0, 20.0]),
    /// )
    /// .unwrap();
    /// assert!(bond.price() >= bond.straight_price());
    ///
    /// assert!(OptionEmbeddedBond::from_kind(1000.0, "swap", 990.0, vec![0.01], 0.3, None).is_err());
    /// ```
    pub fn from_kind(
        notional: f64,
        option_type: &str,
        option_price: f64,
        forward_curve: Vec<f64>,
        interest_vol: f64,
        coupons: Option<Vec<f64>>,
    ) -> BondResult<Self> {
        let kind: OptionKind = option_type.parse()?;
        let rule = ExerciseRule::new(kind, option_price)?;
        Self::new(notional, rule, forward_curve, interest_vol, coupons)
    }

    /// Prices a schedule on an already calibrated lattice.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule and lattice cover different numbers
    /// of periods.
    pub fn from_parts(
        lattice: RateLattice,
        schedule: CashFlowSchedule,
        rule: ExerciseRule,
    ) -> BondResult<Self> {
        let prices = PriceLattice::induce(&lattice, &schedule, Some(&rule))?;
        let straight_price = PriceLattice::induce(&lattice, &schedule, None)?.price();

        log::debug!(
            "priced {} bond over {} periods: price {:.6}, straight {:.6}, {} exercise nodes",
            rule.kind(),
            lattice.n_periods(),
            prices.price(),
            straight_price,
            prices.exercise_nodes().len()
        );

        Ok(Self {
            schedule,
            rule,
            rates: lattice,
            prices,
            straight_price,
        })
    }

    /// Current price.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.prices.price()
    }

    /// Price of the same schedule on the same lattice without the option.
    #[must_use]
    pub fn straight_price(&self) -> f64 {
        self.straight_price
    }

    /// Value of the embedded option to its owner.
    ///
    /// The issuer owns a call, so its value is `straight - price`; the
    /// holder owns a put, worth `price - straight`.
    #[must_use]
    pub fn option_value(&self) -> f64 {
        match self.rule.kind() {
            OptionKind::Call => self.straight_price - self.price(),
            OptionKind::Put => self.price() - self.straight_price,
        }
    }

    /// Nodes `(level, index)` where exercise is optimal.
    #[must_use]
    pub fn exercise_nodes(&self) -> &[(usize, usize)] {
        self.prices.exercise_nodes()
    }

    /// Rates and prices for every level, root first.
    #[must_use]
    pub fn binomial_tree(&self) -> Vec<TreeLevel<'_>> {
        self.rates
            .levels()
            .iter()
            .zip(self.prices.levels())
            .enumerate()
            .map(|(k, (rates, prices))| TreeLevel::new(k, rates, prices))
            .collect()
    }

    /// Returns the calibrated rate lattice.
    #[must_use]
    pub fn rate_lattice(&self) -> &RateLattice {
        &self.rates
    }

    /// Returns the induced price lattice.
    #[must_use]
    pub fn price_lattice(&self) -> &PriceLattice {
        &self.prices
    }

    /// Returns the cash flow schedule.
    #[must_use]
    pub fn schedule(&self) -> &CashFlowSchedule {
        &self.schedule
    }

    /// Returns the exercise rule.
    #[must_use]
    pub fn exercise_rule(&self) -> ExerciseRule {
        self.rule
    }

    /// Returns the notional.
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.schedule.notional()
    }

    /// Returns the short-rate volatility.
    #[must_use]
    pub fn interest_vol(&self) -> f64 {
        self.rates.volatility()
    }

    /// Returns the forward curve.
    #[must_use]
    pub fn forward_curve(&self) -> &ForwardCurve {
        self.rates.forward_curve()
    }

    /// Number of lattice periods.
    #[must_use]
    pub fn n_periods(&self) -> usize {
        self.rates.n_periods()
    }
}
