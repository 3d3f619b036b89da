//! Cooperative cancellation through the progress callback.

use pma_common::sim::config::SimConfig;
use pma_control_unit::cycle::{CancelToken, RunStatus, Simulation};

#[test]
fn cancelled_run_is_prefix_of_full_run() {
    let mut config = SimConfig::default();
    config.simulation.steps = 400;

    let full = Simulation::new(&config).unwrap().run().unwrap();

    let token = CancelToken::new();
    let trigger = token.clone();
    let mut stop_at_150 = move |step: usize, _pct: f64| {
        if step == 150 {
            trigger.cancel();
        }
    };
    let partial = Simulation::new(&config)
        .unwrap()
        .with_cancel(token)
        .run_with_progress(&mut stop_at_150)
        .unwrap();

    assert_eq!(partial.status, RunStatus::Cancelled { completed_steps: 150 });
    assert!(!partial.is_complete());
    assert_eq!(partial.len(), 151);

    let pairs = [
        (&partial.output, &full.output),
        (&partial.measured, &full.measured),
        (&partial.control, &full.control),
        (&partial.trapezoid, &full.trapezoid),
        (&partial.accumulator, &full.accumulator),
        (&partial.state, &full.state),
    ];
    for (p, f) in pairs {
        for k in 0..p.len() {
            assert_eq!(p[k].to_bits(), f[k].to_bits(), "k={k}");
        }
    }
}

#[test]
fn token_shared_across_threads() {
    let token = CancelToken::new();
    let remote = token.clone();
    std::thread::spawn(move || remote.cancel()).join().unwrap();
    assert!(token.is_cancelled());
}
