//! Numeric divergence under an integrator step outside RK4 stability.

use pma_common::sim::config::{DivergencePolicy, SimConfig};
use pma_common::sim::error::SimulationError;
use pma_control_unit::cycle::{RunStatus, run};

/// `a·dt = -10`: each RK4 step amplifies the state by roughly 291.
fn unstable() -> SimConfig {
    let mut config = SimConfig::default();
    config.plant.a = -1e6;
    config
}

#[test]
fn warn_policy_completes_and_reports_first_step() {
    let r = run(&unstable()).unwrap();
    assert_eq!(r.status, RunStatus::Completed);
    assert_eq!(r.len(), 1001);

    let d = r.divergence.expect("divergence recorded");
    assert!(d.step >= 1 && d.step < 1000);
    // Everything before the first diverged step is finite.
    assert!(r.output[..d.step].iter().all(|v| v.is_finite()));
    assert!(!d.signals.is_empty());
    assert!(d.source().is_some());
}

#[test]
fn abort_policy_stops_at_same_step() {
    let warned = run(&unstable()).unwrap();
    let first = warned.divergence.expect("divergence recorded");

    let mut config = unstable();
    config.simulation.divergence_policy = DivergencePolicy::Abort;
    let err = run(&config).unwrap_err();
    assert_eq!(
        err,
        SimulationError::Diverged {
            step: first.step,
            signals: first.signals,
        }
    );
}

#[test]
fn stable_run_reports_nothing() {
    let mut config = SimConfig::default();
    config.simulation.divergence_policy = DivergencePolicy::Abort;
    config.simulation.steps = 200;
    let r = run(&config).unwrap();
    assert!(r.divergence.is_none());
}
