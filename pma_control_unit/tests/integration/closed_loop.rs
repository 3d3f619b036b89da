//! Closed-loop behaviour of complete runs.
//!
//! Pins a short scenario against precomputed values and checks the
//! structural relations between the recorded series.

use pma_common::sim::config::SimConfig;
use pma_control_unit::control::reference::internal_reference;
use pma_control_unit::cycle::{SimulationResult, run};

fn scenario(steps: usize) -> SimConfig {
    let mut config = SimConfig::default();
    config.simulation.steps = steps;
    config
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    let tol = 1e-12 * expected.abs().max(1e-300);
    assert!(
        (actual - expected).abs() <= tol,
        "{what}: got {actual:e}, expected {expected:e}"
    );
}

fn assert_series(actual: &[f64], expected: &[f64], what: &str) {
    assert_eq!(actual.len(), expected.len(), "{what}: length");
    for (k, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        if e == 0.0 {
            assert_eq!(a, 0.0, "{what}[{k}]");
        } else {
            assert_close(a, e, &format!("{what}[{k}]"));
        }
    }
}

fn bits(series: &[f64]) -> Vec<u64> {
    series.iter().map(|v| v.to_bits()).collect()
}

fn all_series(r: &SimulationResult) -> [&Vec<f64>; 11] {
    [
        &r.time,
        &r.reference,
        &r.output,
        &r.measured,
        &r.control,
        &r.internal_reference,
        &r.tracking_error,
        &r.accumulator,
        &r.integrated_error,
        &r.trapezoid,
        &r.state,
    ]
}

#[test]
fn three_step_scenario_matches_reference_values() {
    let r = run(&scenario(3)).unwrap();

    assert_series(
        &r.output,
        &[
            0.0,
            0.0002670806463721503,
            0.0017023186879376211,
            0.004642951878124032,
        ],
        "output",
    );
    assert_series(
        &r.measured,
        &[0.0, 0.0, 0.0002670806463721503, 0.0017023186879376211],
        "measured",
    );
    assert_series(
        &r.accumulator,
        &[0.0, 9996.000799893343, 19988.00399904018, 29976.008525354577],
        "accumulator",
    );
    assert_series(
        &r.integrated_error,
        &[0.0, 8.55, 8.55, 8.549732919353628],
        "integrated_error",
    );
    assert_series(
        &r.trapezoid,
        &[
            0.0,
            4.275000000000001e-05,
            0.00012825000000000003,
            0.00021374866459676818,
        ],
        "trapezoid",
    );
    assert_series(
        &r.control,
        &[
            0.0,
            0.04273290341954405,
            0.25634615128769034,
            0.6407331792235879,
        ],
        "control",
    );
    assert_series(
        &r.internal_reference,
        &[
            1000.0,
            999.6000799893344,
            999.2003199146837,
            998.8007197120864,
        ],
        "internal_reference",
    );
    assert_series(
        &r.state,
        &[
            0.0,
            2.670806463721503e-07,
            1.7023186879376211e-06,
            4.642951878124032e-06,
        ],
        "state",
    );
}

#[test]
fn repeated_runs_are_bit_identical() {
    let config = scenario(500);
    let a = run(&config).unwrap();
    let b = run(&config).unwrap();
    for (sa, sb) in all_series(&a).iter().zip(all_series(&b)) {
        assert_eq!(bits(sa), bits(sb));
    }
}

#[test]
fn zero_gains_leave_plant_at_rest() {
    let mut config = scenario(200);
    config.controller.kp = 0.0;
    config.controller.kint = 0.0;
    let r = run(&config).unwrap();
    assert!(r.control.iter().all(|&u| u == 0.0));
    assert!(r.state.iter().all(|&x| x == 0.0));
    assert!(r.output.iter().all(|&y| y == 0.0));
}

#[test]
fn measurement_is_output_delayed_one_step() {
    let mut config = scenario(50);
    config.simulation.initial_state = 1e-3;
    let r = run(&config).unwrap();

    // Initial slots hold C·x0, independent of later outputs.
    assert_eq!(r.output[0], 1.0);
    assert_eq!(r.measured[0], 1.0);
    assert_eq!(r.measured[1], 1.0);
    for k in 1..r.len() - 1 {
        assert_eq!(r.measured[k + 1].to_bits(), r.output[k].to_bits(), "k={k}");
    }
    // The controller at step k sees the slot one behind it.
    for k in 1..r.len() {
        let expected = r.reference[k] - r.measured[k - 1];
        assert_eq!(r.tracking_error[k].to_bits(), expected.to_bits(), "k={k}");
    }
}

#[test]
fn output_is_c_times_state() {
    let config = scenario(100);
    let r = run(&config).unwrap();
    for k in 0..r.len() {
        assert_eq!(r.output[k], config.plant.c * r.state[k]);
    }
}

#[test]
fn trapezoid_with_constant_integrand() {
    // C = 0 keeps the measurement at zero, so the integrand stays Kint·R.
    let mut config = scenario(8);
    config.plant.c = 0.0;
    let r = run(&config).unwrap();

    let dt = config.simulation.time_step;
    let ie = config.controller.kint * config.simulation.reference;
    assert!(r.integrated_error[1..].iter().all(|&v| v == ie));

    // First step averages against the zero slot at index 0.
    assert_close(r.trapezoid[1], dt * ie / 2.0, "trapezoid[1]");
    for k in 2..r.len() {
        assert_close(
            r.trapezoid[k],
            dt * ie * (k as f64 - 0.5),
            &format!("trapezoid[{k}]"),
        );
    }
}

#[test]
fn trapezoid_recursion_holds_every_step() {
    let config = scenario(300);
    let r = run(&config).unwrap();
    let dt = config.simulation.time_step;
    for k in 1..r.len() {
        let expected =
            r.trapezoid[k - 1] + dt * (r.integrated_error[k] + r.integrated_error[k - 1]) / 2.0;
        assert_eq!(r.trapezoid[k].to_bits(), expected.to_bits(), "k={k}");
    }
}

#[test]
fn internal_reference_stored_at_its_own_time_index() {
    let config = scenario(20);
    let r = run(&config).unwrap();
    let c = &config.controller;
    assert_eq!(r.internal_reference[0], c.k_alpha);
    for k in 0..r.len() {
        assert_eq!(r.time[k], k as f64 * config.simulation.time_step);
        let expected = internal_reference(r.time[k], c.k_alpha, c.k_beta);
        assert_eq!(r.internal_reference[k].to_bits(), expected.to_bits(), "k={k}");
    }
}

#[test]
fn default_run_stays_finite_and_bounded() {
    let r = run(&SimConfig::default()).unwrap();
    assert_eq!(r.len(), 1001);
    assert!(r.divergence.is_none());
    for series in all_series(&r) {
        assert!(series.iter().all(|v| v.is_finite()));
    }
    assert_close(r.output[1000], 8.637783195409677, "output[1000]");
    let peak = r.output.iter().copied().fold(f64::MIN, f64::max);
    assert!((peak - 10.986651083811878).abs() < 1e-9);
}
