//! Backward induction over a calibrated rate lattice.

use crate::cashflows::CashFlowSchedule;
use crate::error::{BondError, BondResult};
use crate::lattice::RateLattice;
use crate::types::ExerciseRule;

/// Levels narrower than this are valued sequentially.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 256;

/// Node values produced by backward induction.
///
/// Same shape as the [`RateLattice`] it was induced on. Values at level
/// `k >= 1` include the coupon paid on that date; the root is the bond's
/// current price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceLattice {
    values: Vec<Vec<f64>>,
    exercise_nodes: Vec<(usize, usize)>,
}

impl PriceLattice {
    /// Values a schedule on the lattice, with an optional exercise overlay.
    ///
    /// 1. Level `N` is seeded with `notional + coupon[N-1]`
    /// 2. Each node at level `k < N` takes the discounted mean of its two
    ///    children
    /// 3. The rule, if any, caps (call) or floors (put) that continuation
    /// 4. The coupon paid at time `k` is added for `k >= 1`
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule and lattice cover different numbers
    /// of periods.
    pub fn induce(
        lattice: &RateLattice,
        schedule: &CashFlowSchedule,
        rule: Option<&ExerciseRule>,
    ) -> BondResult<Self> {
        let n = lattice.n_periods();
        if schedule.n_periods() != n {
            return Err(BondError::invalid_parameter(
                "coupons",
                format!(
                    "schedule has {} periods but the lattice has {n}",
                    schedule.n_periods()
                ),
            ));
        }

        let mut values = vec![Vec::new(); n + 1];
        values[n] = vec![schedule.cash_flow(n - 1); n + 1];
        let mut exercise_nodes = Vec::new();

        for k in (0..n).rev() {
            let nodes = induce_level(lattice, &values[k + 1], k, rule);
            let coupon = if k == 0 { 0.0 } else { schedule.coupon(k - 1) };

            let mut level = Vec::with_capacity(k + 1);
            for (i, (value, exercised)) in nodes.into_iter().enumerate() {
                if exercised {
                    exercise_nodes.push((k, i));
                }
                level.push(value + coupon);
            }
            values[k] = level;
        }
        exercise_nodes.sort_unstable();

        Ok(Self {
            values,
            exercise_nodes,
        })
    }

    /// Current price, the value at the root.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.values[0][0]
    }

    /// Values at level `k`.
    #[must_use]
    pub fn level(&self, k: usize) -> &[f64] {
        &self.values[k]
    }

    /// All levels, root first.
    #[must_use]
    pub fn levels(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Number of levels.
    #[must_use]
    pub fn n_levels(&self) -> usize {
        self.values.len()
    }

    /// Nodes `(level, index)` where exercise beat continuation, in order.
    #[must_use]
    pub fn exercise_nodes(&self) -> &[(usize, usize)] {
        &self.exercise_nodes
    }
}

/// Ex-coupon value at `(k, i)` and whether the rule bound there.
fn node_value(
    lattice: &RateLattice,
    next: &[f64],
    k: usize,
    i: usize,
    rule: Option<&ExerciseRule>,
) -> (f64, bool) {
    let continuation = lattice.discount_factor(k, i) * 0.5 * (next[i] + next[i + 1]);
    match rule {
        Some(rule) => (rule.apply(continuation), rule.binds(continuation)),
        None => (continuation, false),
    }
}

fn induce_level(
    lattice: &RateLattice,
    next: &[f64],
    k: usize,
    rule: Option<&ExerciseRule>,
) -> Vec<(f64, bool)> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if k + 1 >= PARALLEL_THRESHOLD {
            return (0..k + 1)
                .into_par_iter()
                .map(|i| node_value(lattice, next, k, i, rule))
                .collect();
        }
    }

    (0..=k)
        .map(|i| node_value(lattice, next, k, i, rule))
        .collect()
}
