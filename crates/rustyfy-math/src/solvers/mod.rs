//! Root-finding algorithms.
//!
//! This module provides the one-dimensional solvers used for lattice
//! calibration and yield solving:
//!
//! - [`newton_raphson`]: Fast quadratic convergence when derivative is available
//! - [`brent`]: Robust method combining bisection, secant, and inverse quadratic
//! - [`hybrid`]: Newton-Raphson with Brent fallback for robust convergence
//! - [`expand_bracket`]: Geometric bracket search around an initial guess
//! - [`expand_bracket_monotone`]: One-sided bracket search for monotone functions
//!
//! # Choosing a Solver
//!
//! | Solver | Speed | Reliability | Requires |
//! |--------|-------|-------------|----------|
//! | Newton-Raphson | Fastest (quadratic) | May diverge | Derivative |
//! | Brent | Fast (superlinear) | Guaranteed | Bracket |
//! | Hybrid | Fast | Guaranteed* | Derivative + bracket |
//!
//! *When a bracket is supplied.
//!
//! # Example: calibrating a one-period rate
//!
//! ```rust
//! use rustyfy_math::solvers::{hybrid, SolverConfig};
//!
//! // Find the continuously-compounded rate that discounts 1.0 to 0.97
//! let f = |r: f64| (-r).exp() - 0.97;
//! let df = |r: f64| -(-r).exp();
//!
//! let result = hybrid(f, df, 0.01, Some((-0.5, 0.5)), &SolverConfig::default()).unwrap();
//! assert!((result.root - (-(0.97_f64).ln())).abs() < 1e-10);
//! ```

mod brent;
mod hybrid;
mod newton;

pub use brent::brent;
pub use hybrid::{expand_bracket, expand_bracket_monotone, hybrid};
pub use newton::newton_raphson;

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = SolverConfig::default()
            .with_tolerance(1e-12)
            .with_max_iterations(50);

        assert_eq!(config.max_iterations, 50);
        assert!((config.tolerance - 1e-12).abs() < f64::EPSILON);
        assert_eq!(config, SolverConfig::new(1e-12, 50));
    }

    #[test]
    fn test_solvers_agree_on_discount_root() {
        // Two-period discount factor target with a 1% first-period rate.
        let target = (-0.01_f64 - 0.025).exp();
        let f = |r: f64| (-0.01 - r).exp() - target;
        let df = |r: f64| -(-0.01 - r).exp();
        let config = SolverConfig::default();

        let n = newton_raphson(f, df, 0.0, &config).unwrap();
        let b = brent(f, -0.1, 0.1, &config).unwrap();
        let h = hybrid(f, df, 0.0, Some((-0.1, 0.1)), &config).unwrap();

        for root in [n.root, b.root, h.root] {
            assert!((root - 0.025).abs() < 1e-9, "root {}", root);
        }
    }
}
