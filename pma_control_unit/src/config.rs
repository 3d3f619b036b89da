//! TOML configuration loader with validation.
//!
//! Loads a [`SimConfig`] through the [`ConfigLoader`] blanket trait and
//! validates it. Settings that are legal but numerically suspicious are
//! reported with `warn!` and accepted.

use std::path::{Path, PathBuf};

use pma_common::config::{ConfigError, ConfigLoader};
use pma_common::sim::config::SimConfig;
use tracing::{debug, warn};

/// Left end of the RK4 stability interval on the negative real axis.
pub const RK4_STABILITY_LIMIT: f64 = -2.785;

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// Validated configuration, ready for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub sim: SimConfig,
    /// Non-fatal findings raised during loading.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Validate an in-memory configuration.
    pub fn from_config(sim: SimConfig) -> Result<Self, ConfigError> {
        sim.validate()?;
        let warnings = advisories(&sim);
        for w in &warnings {
            warn!("{w}");
        }
        debug!(
            steps = sim.simulation.steps,
            dt = sim.simulation.time_step,
            "configuration validated"
        );
        Ok(Self { sim, warnings })
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let sim = SimConfig::load(path)?;
    LoadedConfig::from_config(sim)
}

/// Parse and validate a configuration from a TOML string.
pub fn load_config_from_str(content: &str) -> Result<LoadedConfig, ConfigError> {
    let sim = SimConfig::from_toml(content)?;
    LoadedConfig::from_config(sim)
}

/// Pick the configuration file for a run.
///
/// An explicit path is always used (a missing file is an error later).
/// Otherwise `fallback` is used only if it exists; `None` means built-in
/// defaults.
pub fn resolve_config_path(explicit: Option<&Path>, fallback: &Path) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None if fallback.is_file() => Some(fallback.to_path_buf()),
        None => None,
    }
}

/// Unusual-but-valid settings.
fn advisories(sim: &SimConfig) -> Vec<String> {
    let mut out = Vec::new();

    let beta = sim.controller.k_beta;
    if beta <= 0.0 {
        out.push(format!(
            "controller.k_beta = {beta}: internal reference does not decay"
        ));
    }

    let z = sim.plant.a * sim.simulation.time_step;
    if !(RK4_STABILITY_LIMIT..=0.0).contains(&z) {
        out.push(format!(
            "plant.a * time_step = {z}: outside the RK4 stability interval [{RK4_STABILITY_LIMIT}, 0]"
        ));
    }

    out
}

// ─── Tests ──────────────────────────────────────────────────────────
