//! Property-based tests for lattice and pricing invariants.
//!
//! These tests verify properties that should always hold:
//! - Level k of the lattice has k + 1 nodes
//! - The lattice reprices the forward curve's discount factors
//! - Calls never exceed, puts never fall below, the straight price
//! - Straight-bond prices fall as the yield rises

use proptest::prelude::*;
use rustyfy_bonds::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Forward curves up to 60 periods, negative rates included.
fn forwards_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.01f64..0.08, 1..60)
}

fn vol_strategy() -> impl Strategy<Value = f64> {
    0.0f64..1.0
}

/// Curves and volatilities for pricing bonds with embedded options.
fn pricing_forwards_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..0.08, 1..60)
}

fn pricing_vol_strategy() -> impl Strategy<Value = f64> {
    0.0f64..0.5
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_level_sizes(forwards in forwards_strategy(), vol in vol_strategy()) {
        let curve = ForwardCurve::new(forwards.clone()).unwrap();
        let lattice = RateLattice::build(&curve, vol).unwrap();

        prop_assert_eq!(lattice.n_levels(), forwards.len() + 1);
        for k in 0..lattice.n_levels() {
            prop_assert_eq!(lattice.level(k).len(), k + 1);
        }
    }

    #[test]
    fn prop_lattice_reprices_curve(forwards in forwards_strategy(), vol in vol_strategy()) {
        let curve = ForwardCurve::new(forwards).unwrap();
        let lattice = RateLattice::build(&curve, vol).unwrap();

        for k in 0..lattice.n_levels() {
            let implied = lattice.zero_coupon_price(k);
            let target = curve.discount_factor(k, 1.0);
            prop_assert!(
                (implied - target).abs() < 1e-9 * target,
                "level {}: {} vs {}", k, implied, target
            );
        }
        prop_assert!(lattice.levels().iter().flatten().all(|r| r.is_finite()));
    }

    #[test]
    fn prop_call_and_put_bound_straight(
        forwards in pricing_forwards_strategy(),
        vol in pricing_vol_strategy(),
        coupon in 0.0f64..80.0,
        strike in 900.0f64..1100.0,
    ) {
        let n = forwards.len();
        let coupons = Some(vec![coupon; n]);

        let call = OptionEmbeddedBond::new(
            1000.0, ExerciseRule::call(strike).unwrap(), forwards.clone(), vol, coupons.clone(),
        ).unwrap();
        let put = OptionEmbeddedBond::new(
            1000.0, ExerciseRule::put(strike).unwrap(), forwards, vol, coupons,
        ).unwrap();

        prop_assert!(call.price() <= call.straight_price() + 1e-9);
        prop_assert!(put.price() >= put.straight_price() - 1e-9);
        prop_assert!(call.price() <= put.price() + 1e-9);
    }

    #[test]
    fn prop_price_range_non_increasing(
        years in 1u32..30,
        coupon in 0.0f64..100.0,
        freq in prop::sample::select(vec![1u32, 2, 4, 12]),
        low in -0.05f64..0.10,
        width in 0.0f64..0.20,
        steps in 1usize..50,
    ) {
        let bond = SimpleBond::new(1000.0, years, coupon, freq, 0.05).unwrap();
        let (yields, prices) = bond.price_range(low, low + width, steps).unwrap();

        prop_assert_eq!(yields.len(), steps);
        prop_assert_eq!(prices.len(), steps);
        for pair in prices.windows(2) {
            prop_assert!(pair[1] <= pair[0] + 1e-9);
        }
    }

    #[test]
    fn prop_zero_coupon_macaulay_is_maturity(years in 1u32..40, rate in -0.02f64..0.15, freq in 1u32..13) {
        let bond = SimpleBond::new(100.0, years, 0.0, freq, rate).unwrap();
        prop_assert!((bond.mac_duration() - f64::from(years)).abs() < 1e-9);
    }
}
