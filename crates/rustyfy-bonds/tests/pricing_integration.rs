//! End-to-end pricing scenarios.
//!
//! Covers lattice calibration feeding the option-embedded pricer, curves
//! sampled from interpolators, configuration loading and the straight-bond
//! analytics.

use approx::assert_relative_eq;
use rustyfy_bonds::prelude::*;
use rustyfy_math::interpolation::{CubicSpline, LinearInterpolator};

// =============================================================================
// OPTION-EMBEDDED BONDS
// =============================================================================

#[test]
fn test_zero_vol_callable_prices_forward_path() {
    let rule = ExerciseRule::call(100.0).unwrap();
    let bond = OptionEmbeddedBond::new(100.0, rule, vec![0.01, 0.02, 0.03], 0.0, None).unwrap();

    assert_relative_eq!(bond.price(), 100.0 * (-0.06_f64).exp(), epsilon = 1e-10);
    assert!(bond.exercise_nodes().is_empty());

    for level in bond.binomial_tree() {
        let first = level.rates()[0];
        assert!(level.rates().iter().all(|&r| r == first));
    }
}

#[test]
fn test_zero_vol_coupon_bond_matches_discounted_schedule() {
    let forwards = vec![0.02, 0.025, 0.03, 0.035];
    let coupons = vec![4.0, 4.0, 4.0, 4.0];
    let rule = ExerciseRule::call(1_000.0).unwrap();
    let bond =
        OptionEmbeddedBond::new(100.0, rule, forwards.clone(), 0.0, Some(coupons.clone())).unwrap();

    let curve = ForwardCurve::new(forwards).unwrap();
    let expected: f64 = coupons
        .iter()
        .enumerate()
        .map(|(k, c)| c * curve.discount_factor(k + 1, 1.0))
        .sum::<f64>()
        + 100.0 * curve.discount_factor(4, 1.0);

    assert_relative_eq!(bond.price(), expected, epsilon = 1e-10);
    assert_relative_eq!(bond.straight_price(), expected, epsilon = 1e-10);
}

#[test]
fn test_straight_price_independent_of_volatility() {
    // The lattice reprices zero-coupon bonds for any volatility
    let forwards = vec![0.01, 0.02, 0.03, 0.025, 0.02];
    let curve = ForwardCurve::new(forwards.clone()).unwrap();
    let expected = 1000.0 * curve.discount_factor(5, 1.0);

    for vol in [0.0, 0.1, 0.3, 0.6] {
        let rule = ExerciseRule::call(1000.0).unwrap();
        let bond = OptionEmbeddedBond::new(1000.0, rule, forwards.clone(), vol, None).unwrap();
        assert_relative_eq!(bond.straight_price(), expected, epsilon = 1e-8);
    }
}

#[test]
fn test_call_and_put_bracket_straight() {
    let forwards = vec![0.03, 0.035, 0.04, 0.045, 0.05];
    let coupons = Some(vec![45.0; 5]);

    let call = OptionEmbeddedBond::from_kind(1000.0, "call", 1000.0, forwards.clone(), 0.2, coupons.clone())
        .unwrap();
    let put = OptionEmbeddedBond::from_kind(1000.0, "put", 1000.0, forwards, 0.2, coupons).unwrap();

    assert_relative_eq!(call.straight_price(), put.straight_price(), epsilon = 1e-12);
    assert!(call.price() <= call.straight_price());
    assert!(put.price() >= put.straight_price());
}

#[test]
fn test_call_value_grows_with_volatility() {
    let forwards = vec![0.03; 6];
    let coupons = Some(vec![30.0; 6]);

    let values: Vec<f64> = [0.05, 0.15, 0.30]
        .iter()
        .map(|&vol| {
            let rule = ExerciseRule::call(1000.0).unwrap();
            OptionEmbeddedBond::new(1000.0, rule, forwards.clone(), vol, coupons.clone())
                .unwrap()
                .option_value()
        })
        .collect();

    assert!(values[0] <= values[1] && values[1] <= values[2]);
}

#[test]
fn test_half_year_periods() {
    let config = LatticeConfig::from_toml_str("dt = 0.5").unwrap();
    let rule = ExerciseRule::put(97.0).unwrap();

    let bond = OptionEmbeddedBond::with_config(
        100.0,
        rule,
        vec![0.04; 6],
        0.2,
        Some(vec![2.0; 6]),
        &config,
    )
    .unwrap();

    assert_eq!(bond.rate_lattice().dt(), 0.5);
    assert_eq!(bond.n_periods(), 6);
    assert!(bond.price() >= bond.straight_price());
}

#[test]
fn test_from_parts_reuses_lattice() {
    let curve = ForwardCurve::new(vec![0.02, 0.03, 0.04]).unwrap();
    let lattice = RateLattice::build(&curve, 0.25).unwrap();

    let callable = OptionEmbeddedBond::from_parts(
        lattice.clone(),
        CashFlowSchedule::level(100.0, 3, 5.0, 1).unwrap(),
        ExerciseRule::call(100.0).unwrap(),
    )
    .unwrap();
    let puttable = OptionEmbeddedBond::from_parts(
        lattice,
        CashFlowSchedule::level(100.0, 3, 5.0, 1).unwrap(),
        ExerciseRule::put(100.0).unwrap(),
    )
    .unwrap();

    assert_eq!(callable.rate_lattice(), puttable.rate_lattice());
    assert!(callable.price() < puttable.price());
}

// =============================================================================
// CURVES FROM INTERPOLATORS
// =============================================================================

#[test]
fn test_curve_from_linear_interpolator() {
    let interp = LinearInterpolator::new(
        vec![0.0, 1.0, 2.0, 3.0, 5.0, 10.0],
        vec![0.0, 0.01, 0.005, 0.03, 0.04, 0.10],
    )
    .unwrap();
    let curve = ForwardCurve::from_interpolator(&interp, 10, 1.0).unwrap();
    let lattice = RateLattice::build(&curve, 0.2).unwrap();

    assert_eq!(lattice.n_periods(), 10);
    for k in 0..=10 {
        assert_relative_eq!(
            lattice.zero_coupon_price(k),
            curve.discount_factor(k, 1.0),
            epsilon = 1e-10
        );
    }
}

#[test]
fn test_curve_from_cubic_spline() {
    let spline = CubicSpline::new(vec![0.0, 2.0, 5.0, 10.0], vec![0.02, 0.028, 0.035, 0.04]).unwrap();
    let curve = ForwardCurve::from_interpolator(&spline, 8, 1.0).unwrap();

    let rule = ExerciseRule::call(100.0).unwrap();
    let bond = OptionEmbeddedBond::new(100.0, rule, curve.rates().to_vec(), 0.15, Some(vec![3.0; 8])).unwrap();

    assert!(bond.price().is_finite());
    assert!(bond.price() <= bond.straight_price());
}

// =============================================================================
// STRAIGHT BONDS
// =============================================================================

#[test]
fn test_simple_bond_outputs() {
    let bond = SimpleBond::new(1000.0, 5, 20.0, 1, 0.05).unwrap();

    for value in [bond.price(), bond.mac_duration(), bond.mod_duration(), bond.convexity()] {
        assert!(value.is_finite() && value > 0.0);
    }
    assert!(bond.mod_duration() < bond.mac_duration());

    let continuous = bond.with_compounding(Compounding::Continuous).unwrap();
    assert_relative_eq!(continuous.mod_duration(), continuous.mac_duration(), epsilon = 1e-12);
}

#[test]
fn test_simple_bond_matches_flat_lattice() {
    // Continuous straight pricing equals a zero-vol lattice on a flat curve
    let bond = SimpleBond::from_schedule(
        CashFlowSchedule::level(100.0, 4, 3.0, 1).unwrap(),
        0.035,
        Compounding::Continuous,
    )
    .unwrap();

    let rule = ExerciseRule::call(1_000.0).unwrap();
    let lattice_bond =
        OptionEmbeddedBond::new(100.0, rule, vec![0.035; 4], 0.0, Some(vec![3.0; 4])).unwrap();

    assert_relative_eq!(bond.price(), lattice_bond.price(), epsilon = 1e-10);
}

#[test]
fn test_config_errors_surface() {
    let config = LatticeConfig::default().with_max_iterations(0);
    let rule = ExerciseRule::call(100.0).unwrap();

    let result = OptionEmbeddedBond::with_config(100.0, rule, vec![0.02], 0.1, None, &config);
    assert!(matches!(result, Err(BondError::Config(_))));
}
