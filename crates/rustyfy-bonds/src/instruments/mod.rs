//! Bond instrument types.
//!
//! - [`OptionEmbeddedBond`]: Callable or puttable bond priced on a calibrated
//!   short-rate lattice
//! - [`SimpleBond`]: Straight bond priced at a flat rate, with duration and
//!   convexity

mod option_embedded;
mod simple;

pub use option_embedded::OptionEmbeddedBond;
pub use simple::{SimpleBond, MAX_GRID_POINTS};
