//! Embedded option provisions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BondError, BondResult};

/// Side of an embedded option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Issuer may redeem early at the strike.
    Call,
    /// Holder may sell back early at the strike.
    Put,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionKind {
    type Err = BondError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            other => Err(BondError::invalid_parameter(
                "option_type",
                format!("expected \"call\" or \"put\", got {other:?}"),
            )),
        }
    }
}

/// Exercise rule applied at every lattice node before maturity.
///
/// # Example
///
/// ```rust
/// use rustyfy_bonds::types::ExerciseRule;
///
/// let call = ExerciseRule::call(100.0).unwrap();
/// assert_eq!(call.apply(103.0), 100.0); // issuer redeems
/// assert_eq!(call.apply(97.0), 97.0);
///
/// let put = ExerciseRule::put(100.0).unwrap();
/// assert_eq!(put.apply(97.0), 100.0); // holder puts
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", try_from = "RawExerciseRule")]
pub enum ExerciseRule {
    /// Callable at `strike`: node value is capped.
    Call {
        /// Redemption price paid by the issuer.
        strike: f64,
    },
    /// Puttable at `strike`: node value is floored.
    Put {
        /// Price received by the holder.
        strike: f64,
    },
}

/// Unchecked wire form of [`ExerciseRule`].
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RawExerciseRule {
    Call { strike: f64 },
    Put { strike: f64 },
}

impl TryFrom<RawExerciseRule> for ExerciseRule {
    type Error = BondError;

    fn try_from(raw: RawExerciseRule) -> BondResult<Self> {
        match raw {
            RawExerciseRule::Call { strike } => Self::call(strike),
            RawExerciseRule::Put { strike } => Self::put(strike),
        }
    }
}

impl ExerciseRule {
    /// Creates a rule of the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the strike is negative or non-finite.
    pub fn new(kind: OptionKind, strike: f64) -> BondResult<Self> {
        if !(strike.is_finite() && strike >= 0.0) {
            return Err(BondError::invalid_parameter(
                "option_price",
                format!("must be finite and non-negative, got {strike}"),
            ));
        }
        Ok(match kind {
            OptionKind::Call => Self::Call { strike },
            OptionKind::Put => Self::Put { strike },
        })
    }

    /// Creates a call rule.
    pub fn call(strike: f64) -> BondResult<Self> {
        Self::new(OptionKind::Call, strike)
    }

    /// Creates a put rule.
    pub fn put(strike: f64) -> BondResult<Self> {
        Self::new(OptionKind::Put, strike)
    }

    /// Returns the option side.
    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        match self {
            Self::Call { .. } => OptionKind::Call,
            Self::Put { .. } => OptionKind::Put,
        }
    }

    /// Returns the exercise price.
    #[must_use]
    pub const fn strike(&self) -> f64 {
        match self {
            Self::Call { strike } | Self::Put { strike } => *strike,
        }
    }

    /// Node value after optimal exercise against the continuation value.
    #[must_use]
    pub fn apply(&self, continuation: f64) -> f64 {
        match self {
            Self::Call { strike } => continuation.min(*strike),
            Self::Put { strike } => continuation.max(*strike),
        }
    }

    /// True when exercising beats continuing.
    #[must_use]
    pub fn binds(&self, continuation: f64) -> bool {
        match self {
            Self::Call { strike } => continuation > *strike,
            Self::Put { strike } => continuation < *strike,
        }
    }
}
