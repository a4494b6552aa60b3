//! Lattice configuration.
//!
//! [`LatticeConfig`] carries the period length and the calibration solver
//! settings. It deserializes from partial documents, with every missing
//! field taking its default:
//!
//! ```rust
//! use rustyfy_bonds::config::LatticeConfig;
//!
//! let config = LatticeConfig::from_toml_str("dt = 0.5").unwrap();
//! assert_eq!(config.dt, 0.5);
//! assert_eq!(config.max_iterations, 100);
//! ```

use std::fmt;

use rustyfy_math::solvers::SolverConfig;
use serde::{Deserialize, Serialize};

use crate::error::{BondError, BondResult};

/// A single validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation.
    pub field: String,
    /// Validation error message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Trait for validatable configurations.
pub trait Validate {
    /// Returns a list of validation errors, or an empty vector if valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validates and returns an error if invalid.
    fn validate_or_error(&self) -> BondResult<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BondError::Config(errors))
        }
    }
}

/// Settings for building and calibrating a rate lattice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeConfig {
    /// Length of one lattice period in years.
    #[serde(default = "default_dt")]
    pub dt: f64,

    /// Absolute tolerance on the calibration residual.
    #[serde(default = "default_solver_tolerance")]
    pub solver_tolerance: f64,

    /// Maximum solver iterations per level.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Half-width of the first bracket tried around each forward rate.
    #[serde(default = "default_bracket_half_width")]
    pub bracket_half_width: f64,

    /// Number of times the bracket may double before calibration gives up.
    #[serde(default = "default_max_bracket_expansions")]
    pub max_bracket_expansions: u32,
}

fn default_dt() -> f64 {
    1.0
}

fn default_solver_tolerance() -> f64 {
    1e-12
}

fn default_max_iterations() -> u32 {
    100
}

fn default_bracket_half_width() -> f64 {
    0.5
}

fn default_max_bracket_expansions() -> u32 {
    40
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            solver_tolerance: default_solver_tolerance(),
            max_iterations: default_max_iterations(),
            bracket_half_width: default_bracket_half_width(),
            max_bracket_expansions: default_max_bracket_expansions(),
        }
    }
}

impl LatticeConfig {
    /// Sets the period length.
    #[must_use]
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Sets the solver tolerance.
    #[must_use]
    pub fn with_solver_tolerance(mut self, tolerance: f64) -> Self {
        self.solver_tolerance = tolerance;
        self
    }

    /// Sets the maximum solver iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> BondResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| BondError::Config(vec![ValidationError::new("document", e.to_string())]))?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Solver settings used for per-level calibration.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.solver_tolerance, self.max_iterations)
    }
}

impl Validate for LatticeConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.dt.is_finite() && self.dt > 0.0) {
            errors.push(ValidationError::new(
                "dt",
                format!("must be positive and finite, got {}", self.dt),
            ));
        }
        if !(self.solver_tolerance.is_finite() && self.solver_tolerance > 0.0) {
            errors.push(ValidationError::new(
                "solver_tolerance",
                format!("must be positive and finite, got {}", self.solver_tolerance),
            ));
        }
        if self.max_iterations == 0 {
            errors.push(ValidationError::new("max_iterations", "must be at least 1"));
        }
        if !(self.bracket_half_width.is_finite() && self.bracket_half_width > 0.0) {
            errors.push(ValidationError::new(
                "bracket_half_width",
                format!(
                    "must be positive and finite, got {}",
                    self.bracket_half_width
                ),
            ));
        }

        errors
    }
}
