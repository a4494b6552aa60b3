//! Short-rate lattice calibrated by forward induction.

use rustyfy_math::solvers::{expand_bracket_monotone, hybrid, SolverResult};
use rustyfy_math::MathError;

use crate::config::{LatticeConfig, Validate};
use crate::error::{BondError, BondResult};
use crate::types::ForwardCurve;

/// Log-normal recombining short-rate lattice.
///
/// Node rates follow `r(k, i) = m_k * exp(sigma * sqrt(dt) * (2i - k))`, so
/// neighbouring nodes in a level differ by the constant ratio
/// `exp(2 * sigma * sqrt(dt))`. Each level's median `m_k` is chosen so the
/// lattice reprices the forward curve's discount factors.
///
/// # Calibration
///
/// Arrow-Debreu state prices `Q(k, i)` start from `Q(0, 0) = 1`. At level
/// `k` the median solves
///
/// ```text
/// sum_i Q(k, i) * exp(-r(k, i) * dt) = P(0, k + 1)
/// ```
///
/// after which `Q(k + 1, .)` is propagated with probability one half per
/// branch. The final level uses the last forward rate extended flat.
///
/// # Example
///
/// ```rust
/// use rustyfy_bonds::lattice::RateLattice;
/// use rustyfy_bonds::types::ForwardCurve;
///
/// let curve = ForwardCurve::new(vec![0.01, 0.02, 0.03]).unwrap();
/// let lattice = RateLattice::build(&curve, 0.3).unwrap();
///
/// assert_eq!(lattice.n_periods(), 3);
/// assert_eq!(lattice.level(2).len(), 3);
/// assert!((lattice.zero_coupon_price(3) - (-0.06_f64).exp()).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RateLattice {
    curve: ForwardCurve,
    volatility: f64,
    dt: f64,
    rates: Vec<Vec<f64>>,
    medians: Vec<f64>,
    state_prices: Vec<Vec<f64>>,
}

impl RateLattice {
    /// Builds a lattice with the default configuration (annual periods).
    pub fn build(curve: &ForwardCurve, interest_vol: f64) -> BondResult<Self> {
        Self::build_with_config(curve, interest_vol, &LatticeConfig::default())
    }

    /// Builds and calibrates a lattice.
    ///
    /// # Errors
    ///
    /// Returns [`BondError::Config`] for an invalid configuration,
    /// [`BondError::InvalidParameter`] for a negative or non-finite
    /// volatility, and [`BondError::CalibrationFailure`] when a level's
    /// median cannot be solved.
    pub fn build_with_config(
        curve: &ForwardCurve,
        interest_vol: f64,
        config: &LatticeConfig,
    ) -> BondResult<Self> {
        config.validate_or_error()?;
        if !(interest_vol.is_finite() && interest_vol >= 0.0) {
            return Err(BondError::invalid_parameter(
                "interest_vol",
                format!("must be finite and non-negative, got {interest_vol}"),
            ));
        }

        let n = curve.len();
        let dt = config.dt;
        let spread = interest_vol * dt.sqrt();

        let mut rates = Vec::with_capacity(n + 1);
        let mut medians = Vec::with_capacity(n + 1);
        let mut state_prices = Vec::with_capacity(n + 1);

        let mut q = vec![1.0];
        let mut forward_sum = 0.0;

        for k in 0..=n {
            let forward = curve.rate(k);
            forward_sum += forward;
            let log_target = -dt * forward_sum;

            let shape: Vec<f64> = (0..=k)
                .map(|i| (spread * (2.0 * i as f64 - k as f64)).exp())
                .collect();

            let median = if interest_vol == 0.0 {
                log::debug!("level {k}: median {forward:.8} (closed form)");
                forward
            } else {
                let result = solve_median(k, &q, &shape, log_target, forward, dt, config)?;
                log::debug!(
                    "level {k}: median {:.8}, iterations {}, residual {:.2e}",
                    result.root,
                    result.iterations,
                    result.residual
                );
                result.root
            };

            let level: Vec<f64> = shape.iter().map(|s| median * s).collect();
            let next = (k < n).then(|| propagate(&q, &level, dt));

            rates.push(level);
            medians.push(median);
            state_prices.push(q);

            match next {
                Some(next) => q = next,
                None => break,
            }
        }

        Ok(Self {
            curve: curve.clone(),
            volatility: interest_vol,
            dt,
            rates,
            medians,
            state_prices,
        })
    }

    /// Number of periods `N`; the lattice has `N + 1` levels.
    #[must_use]
    pub fn n_periods(&self) -> usize {
        self.rates.len() - 1
    }

    /// Number of levels, `N + 1`.
    #[must_use]
    pub fn n_levels(&self) -> usize {
        self.rates.len()
    }

    /// Period length in years.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Short-rate volatility.
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Forward curve the lattice was calibrated to.
    #[must_use]
    pub fn forward_curve(&self) -> &ForwardCurve {
        &self.curve
    }

    /// Short rates at level `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k > n_periods()`.
    #[must_use]
    pub fn level(&self, k: usize) -> &[f64] {
        &self.rates[k]
    }

    /// All levels, root first.
    #[must_use]
    pub fn levels(&self) -> &[Vec<f64>] {
        &self.rates
    }

    /// Short rate at node `(k, i)`.
    #[must_use]
    pub fn rate(&self, k: usize, i: usize) -> f64 {
        self.rates[k][i]
    }

    /// Calibrated median rate `m_k`.
    #[must_use]
    pub fn median_rate(&self, k: usize) -> f64 {
        self.medians[k]
    }

    /// Arrow-Debreu state prices at level `k`.
    #[must_use]
    pub fn state_prices(&self, k: usize) -> &[f64] {
        &self.state_prices[k]
    }

    /// One-period discount factor at node `(k, i)`.
    #[must_use]
    pub fn discount_factor(&self, k: usize, i: usize) -> f64 {
        (-self.rates[k][i] * self.dt).exp()
    }

    /// Lattice-implied price at time 0 of one unit paid at level `k`.
    #[must_use]
    pub fn zero_coupon_price(&self, k: usize) -> f64 {
        self.state_prices[k].iter().sum()
    }

    /// Ratio between adjacent node rates in a level.
    #[must_use]
    pub fn spread_ratio(&self) -> f64 {
        (2.0 * self.volatility * self.dt.sqrt()).exp()
    }
}

/// Solves for the median rate matching one level's target discount factor.
///
/// The residual is `ln(sum_i Q_i * exp(-m * s_i * dt)) - ln P`, evaluated as
/// a log-sum-exp so it stays finite for any finite `m`. It is convex and
/// strictly decreasing in `m`, so the bracket is searched on one side of the
/// forward only.
fn solve_median(
    level: usize,
    q: &[f64],
    shape: &[f64],
    log_target: f64,
    guess: f64,
    dt: f64,
    config: &LatticeConfig,
) -> BondResult<SolverResult> {
    // Nodes no path reaches carry no weight
    let weighted: Vec<(f64, f64)> = q
        .iter()
        .zip(shape)
        .filter(|(q, _)| **q > 0.0)
        .map(|(q, s)| (q.ln(), s * dt))
        .collect();
    if weighted.is_empty() {
        return Err(BondError::calibration_failure(level, "all state prices are zero"));
    }
    let nodes = weighted.as_slice();

    let exponents = move |m: f64| nodes.iter().map(move |&(log_q, c)| log_q - m * c);
    let peak = move |m: f64| exponents(m).fold(f64::NEG_INFINITY, f64::max);

    let residual = |m: f64| {
        let top = peak(m);
        let sum: f64 = exponents(m).map(|a| (a - top).exp()).sum();
        top + sum.ln() - log_target
    };
    // Minus the state-price-weighted mean of s * dt
    let slope = |m: f64| {
        let top = peak(m);
        let (total, moment) = nodes.iter().fold((0.0, 0.0), |(w, wc), &(log_q, c)| {
            let e = (log_q - m * c - top).exp();
            (w + e, wc + e * c)
        });
        -moment / total
    };

    let bracket = expand_bracket_monotone(
        &residual,
        guess,
        config.bracket_half_width,
        config.max_bracket_expansions,
    )
    .map_err(|e| classify(level, format!("no bracket around {guess}"), e))?;

    let result = hybrid(&residual, &slope, guess, Some(bracket), &config.solver_config())
        .map_err(|e| classify(level, "root search failed".to_string(), e))?;

    // The solvers also stop on a small step in m, which is not a small
    // residual when the node spread is extreme
    let result = if result.residual.abs() <= config.solver_tolerance {
        result
    } else {
        polish(&residual, &slope, result, bracket, config)
    };

    if !result.root.is_finite() {
        return Err(BondError::calibration_failure(
            level,
            format!("median is not finite: {}", result.root),
        ));
    }
    if result.residual.abs() > config.solver_tolerance {
        return Err(BondError::calibration_failure(
            level,
            format!(
                "residual {:.2e} above tolerance after {} iterations",
                result.residual, result.iterations
            ),
        ));
    }
    Ok(result)
}

/// Newton on a decreasing residual, kept inside `[lo, hi]` by bisection.
fn polish<F, DF>(
    residual: F,
    slope: DF,
    start: SolverResult,
    (mut lo, mut hi): (f64, f64),
    config: &LatticeConfig,
) -> SolverResult
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut m = start.root;
    let mut f = residual(m);
    let mut iterations = start.iterations;

    for _ in 0..config.max_iterations {
        if f.abs() <= config.solver_tolerance {
            break;
        }
        if f > 0.0 {
            lo = lo.max(m);
        } else {
            hi = hi.min(m);
        }
        let step = m - f / slope(m);
        m = if step > lo && step < hi {
            step
        } else {
            0.5 * (lo + hi)
        };
        f = residual(m);
        iterations += 1;
    }

    SolverResult {
        root: m,
        iterations,
        residual: f,
    }
}

/// Solver failures are calibration failures; anything else is passed through.
fn classify(level: usize, context: String, err: MathError) -> BondError {
    if err.is_solver_failure() {
        BondError::calibration_failure(level, format!("{context}: {err}"))
    } else {
        BondError::Math(err)
    }
}

/// Rolls state prices forward one level.
fn propagate(q: &[f64], rates: &[f64], dt: f64) -> Vec<f64> {
    let mut next = vec![0.0; q.len() + 1];
    for (i, (&qi, &r)) in q.iter().zip(rates).enumerate() {
        let half = 0.5 * qi * (-r * dt).exp();
        next[i] += half;
        next[i + 1] += half;
    }
    next
}
