//! Error types for bond operations.

use rustyfy_math::MathError;
use thiserror::Error;

use crate::config::ValidationError;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors that can occur during bond construction and pricing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    /// An input failed validation.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Name of the offending input.
        name: &'static str,
        /// Description of what's invalid.
        reason: String,
    },

    /// Lattice calibration could not match the forward curve.
    #[error("Calibration failed at level {level}: {reason}")]
    CalibrationFailure {
        /// Lattice level being calibrated.
        level: usize,
        /// Description of the failure.
        reason: String,
    },

    /// Lattice configuration is invalid.
    #[error("Invalid configuration: {}", describe(.0))]
    Config(Vec<ValidationError>),

    /// Math library error.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl BondError {
    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Creates a calibration failure error.
    #[must_use]
    pub fn calibration_failure(level: usize, reason: impl Into<String>) -> Self {
        Self::CalibrationFailure {
            level,
            reason: reason.into(),
        }
    }
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Rejects NaN and infinite inputs.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> BondResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BondError::invalid_parameter(
            name,
            format!("must be finite, got {value}"),
        ))
    }
}
