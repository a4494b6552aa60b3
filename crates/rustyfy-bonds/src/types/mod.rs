//! Domain types for bond pricing.
//!
//! - [`Compounding`]: discounting convention for flat-rate pricing
//! - [`ExerciseRule`] / [`OptionKind`]: embedded call or put provisions
//! - [`ForwardCurve`]: per-period forward rates the lattice is calibrated to

mod compounding;
mod exercise;
mod forward_curve;

pub use compounding::Compounding;
pub use exercise::{ExerciseRule, OptionKind};
pub use forward_curve::ForwardCurve;
