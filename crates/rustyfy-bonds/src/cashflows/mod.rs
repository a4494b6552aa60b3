//! Cash flow schedules for bonds.
//!
//! A [`CashFlowSchedule`] holds the notional repaid at maturity and one
//! coupon per period. Coupon `k` is paid at the end of period `k`.

mod schedule;

pub use schedule::CashFlowSchedule;
