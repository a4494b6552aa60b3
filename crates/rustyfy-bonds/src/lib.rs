//! # Rustyfy Bonds
//!
//! Bond pricing and analytics for the Rustyfy fixed income library.
//!
//! This crate provides:
//!
//! - **Lattice**: A recombining binomial short-rate tree calibrated to a
//!   forward curve, and backward induction over it
//! - **Instruments**: Callable/puttable bonds priced on the lattice, and
//!   straight bonds priced at a flat rate
//! - **Cash Flows**: Notional and coupon schedules shared by both pricers
//! - **Risk**: Macaulay/modified duration, convexity, DV01
//!
//! ## Compounding
//!
//! Lattice rates are continuously compounded per period: one step of length
//! `dt` discounts by `exp(-r * dt)`. [`SimpleBond`] uses periodic compounding
//! at the coupon frequency unless [`Compounding::Continuous`] is requested.
//!
//! ## Example
//!
//! ```rust
//! use rustyfy_bonds::prelude::*;
//!
//! // Callable zero-coupon bond on a three-period forward curve
//! let rule = ExerciseRule::call(1000.0).unwrap();
//! let bond = OptionEmbeddedBond::new(1000.0, rule, vec![0.01, 0.02, 0.03], 0.3, None).unwrap();
//!
//! println!("Current price: {}", bond.price());
//! for level in bond.binomial_tree() {
//!     assert_eq!(level.prices().len(), level.rates().len());
//! }
//!
//! // Straight coupon bond at a flat 5%
//! let simple = SimpleBond::new(1000.0, 5, 20.0, 1, 0.05).unwrap();
//! assert!(simple.mod_duration() < simple.mac_duration());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::return_self_not_must_use)]

pub mod cashflows;
pub mod config;
pub mod error;
pub mod instruments;
pub mod lattice;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    // Cash flows
    pub use crate::cashflows::CashFlowSchedule;

    // Configuration
    pub use crate::config::{LatticeConfig, Validate, ValidationError};

    // Errors
    pub use crate::error::{BondError, BondResult};

    // Instruments
    pub use crate::instruments::{OptionEmbeddedBond, SimpleBond};

    // Lattice
    pub use crate::lattice::{PriceLattice, RateLattice, TreeLevel};

    // Types
    pub use crate::types::{Compounding, ExerciseRule, ForwardCurve, OptionKind};
}

pub use cashflows::CashFlowSchedule;
pub use config::LatticeConfig;
pub use error::{BondError, BondResult};
pub use instruments::{OptionEmbeddedBond, SimpleBond};
pub use lattice::{PriceLattice, RateLattice, TreeLevel};
pub use types::{Compounding, ExerciseRule, ForwardCurve, OptionKind};
