//! Recombining binomial short-rate lattice.
//!
//! Level `k` holds `k + 1` nodes indexed by up-move count `i`. Node `(k, i)`
//! branches to `(k + 1, i)` (down) and `(k + 1, i + 1)` (up), each with
//! probability one half.
//!
//! ```text
//!                  (2,2)
//!                 /
//!            (1,1)
//!           /     \
//!      (0,0)       (2,1)
//!           \     /
//!            (1,0)
//!                 \
//!                  (2,0)
//! ```
//!
//! - [`RateLattice`]: short rates calibrated to a forward curve
//! - [`PriceLattice`]: node values from backward induction
//! - [`TreeLevel`]: paired view of one level's rates and prices

mod induction;
mod rate_lattice;

pub use induction::PriceLattice;
pub use rate_lattice::RateLattice;

/// Rates and prices of one lattice level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeLevel<'a> {
    level: usize,
    rates: &'a [f64],
    prices: &'a [f64],
}

impl<'a> TreeLevel<'a> {
    pub(crate) fn new(level: usize, rates: &'a [f64], prices: &'a [f64]) -> Self {
        Self {
            level,
            rates,
            prices,
        }
    }

    /// Level index, also the number of elapsed periods.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Short rates at the level's nodes.
    #[must_use]
    pub fn rates(&self) -> &'a [f64] {
        self.rates
    }

    /// Cum-coupon values at the level's nodes.
    #[must_use]
    pub fn prices(&self) -> &'a [f64] {
        self.prices
    }

    /// Number of nodes, always `level + 1`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Always false; every level has a node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
