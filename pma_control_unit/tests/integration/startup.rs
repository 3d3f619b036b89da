//! Startup: configuration loading and rejection before any step.

use std::fs;

use pma_common::config::ConfigError;
use pma_common::sim::config::SimConfig;
use pma_common::sim::error::SimulationError;
use pma_control_unit::config::{load_config, load_config_from_str};
use pma_control_unit::cycle::Simulation;
use tempfile::TempDir;

fn rejected(config: &SimConfig) -> bool {
    matches!(
        Simulation::new(config),
        Err(SimulationError::Config(ConfigError::ValidationError(_)))
    )
}

#[test]
fn zero_final_scale_rejected() {
    let mut config = SimConfig::default();
    config.controller.final_scale = 0.0;
    assert!(rejected(&config));
}

#[test]
fn non_positive_time_step_rejected() {
    for dt in [0.0, -1e-5, f64::NAN] {
        let mut config = SimConfig::default();
        config.simulation.time_step = dt;
        assert!(rejected(&config), "dt={dt}");
    }
}

#[test]
fn zero_steps_rejected() {
    let mut config = SimConfig::default();
    config.simulation.steps = 0;
    assert!(rejected(&config));
}

#[test]
fn shipped_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../config/pma.toml");
    let loaded = load_config(std::path::Path::new(path)).unwrap();
    assert_eq!(loaded.sim, SimConfig::default());
}

#[test]
fn file_config_drives_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pma.toml");
    fs::write(
        &path,
        r#"
[simulation]
steps = 3

[controller]
kp = 0.0
kint = 0.0
"#,
    )
    .unwrap();

    let loaded = load_config(&path).unwrap();
    let r = Simulation::new(&loaded.sim).unwrap().run().unwrap();
    assert_eq!(r.len(), 4);
    assert!(r.control.iter().all(|&u| u == 0.0));
}

#[test]
fn invalid_file_reports_parse_error() {
    let err = load_config_from_str("[simulation]\nsteps = \"many\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}
