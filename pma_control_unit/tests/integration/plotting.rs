//! Chart image output for a real run.

use pma_common::sim::config::SimConfig;
use pma_control_unit::chart::{PlotOptions, save_plot};
use pma_control_unit::cycle::run;
use tempfile::TempDir;

#[test]
fn short_run_saved_as_svg() {
    let mut config = SimConfig::default();
    config.simulation.steps = 50;
    let result = run(&config).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pma.svg");
    save_plot(&result, &path, &PlotOptions::default()).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<svg"));
    // Three output traces and one control trace.
    assert!(svg.matches("<polyline").count() >= 4);
}

#[test]
fn diverged_run_still_plots() {
    let mut config = SimConfig::default();
    config.plant.a = -1e6;
    let result = run(&config).unwrap();
    assert!(result.divergence.is_some());

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("diverged.svg");
    save_plot(&result, &path, &PlotOptions::default()).unwrap();
    assert!(path.is_file());
}
