//! # Rustyfy Math
//!
//! Numerical utilities for the Rustyfy bond pricing library.
//!
//! This crate provides:
//!
//! - **Solvers**: Root-finding algorithms (Newton-Raphson, Brent, Hybrid) and bracket search
//! - **Interpolation**: Piecewise-linear and natural cubic spline interpolation
//!   with an explicit extrapolation policy
//!
//! ## Design Philosophy
//!
//! - **Numerical Stability**: Careful handling of edge cases
//! - **Explicit Failure**: Invalid inputs are rejected at construction, never
//!   silently defaulted

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        CubicSpline, ExtrapolationMethod, Interpolator, LinearInterpolator,
    };
    pub use crate::solvers::{
        brent, expand_bracket, expand_bracket_monotone, hybrid, newton_raphson, SolverConfig,
        SolverResult,
    };
}

pub use error::{MathError, MathResult};
