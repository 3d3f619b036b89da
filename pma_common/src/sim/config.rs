//! Configuration structures for a closed-loop simulation run.
//!
//! All config types use `serde::Deserialize` for TOML loading. Every field
//! has a default taken from [`crate::consts`], so a partial file (or none at
//! all) describes the reference scenario. Unknown keys are rejected.
//!
//! The whole [`SimConfig`] is immutable once a run starts and is passed by
//! reference into every step.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SharedConfig};
use crate::consts::{
    DEFAULT_FINAL_SCALE, DEFAULT_INITIAL_STATE, DEFAULT_K_ALPHA, DEFAULT_K_BETA, DEFAULT_KINT,
    DEFAULT_KP, DEFAULT_PLANT_A, DEFAULT_PLANT_B, DEFAULT_PLANT_C, DEFAULT_REFERENCE,
    DEFAULT_SIM_STEPS, DEFAULT_TIME_STEP, MAX_SIM_STEPS,
};

// ─── Top-Level Config ───────────────────────────────────────────────

/// Complete simulation configuration.
///
/// # TOML Example
///
/// ```toml
/// [simulation]
/// steps = 1000
/// time_step = 1e-5
/// reference = 8.55
///
/// [plant]
/// a = -1e5
/// b = 1.0
/// c = 1e3
///
/// [controller]
/// kp = 10.0
/// kint = 1.0
/// k_alpha = 1e3
/// k_beta = 40.0
/// final_scale = 10.0
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Logging and instance settings.
    #[serde(default)]
    pub shared: SharedConfig,
    /// Horizon, reference and initial condition.
    #[serde(default)]
    pub simulation: HorizonParams,
    /// Linear plant coefficients.
    #[serde(default)]
    pub plant: PlantParams,
    /// PMA controller gains.
    #[serde(default)]
    pub controller: ControllerParams,
}

impl SimConfig {
    /// Validate every section.
    ///
    /// Must succeed before any simulation buffer is allocated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.simulation.validate()?;
        self.plant.validate()?;
        self.controller.validate()?;
        Ok(())
    }
}

// ─── Horizon ────────────────────────────────────────────────────────

/// What to do once a non-finite value enters the histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DivergencePolicy {
    /// Warn once and complete the run (non-finite values propagate).
    #[default]
    Warn,
    /// Stop at the first diverged step and return an error.
    Abort,
}

/// Simulation horizon `{N, dt, R}` plus initial condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HorizonParams {
    /// Number of steps `N` (> 0).
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Fixed integration step `dt` [s] (> 0).
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    /// Constant reference value `R`.
    #[serde(default = "default_reference")]
    pub reference: f64,
    /// Initial plant state `x0`.
    #[serde(default = "default_initial_state")]
    pub initial_state: f64,
    /// Reaction to numeric divergence.
    #[serde(default)]
    pub divergence_policy: DivergencePolicy,
}

fn default_steps() -> usize {
    DEFAULT_SIM_STEPS
}
fn default_time_step() -> f64 {
    DEFAULT_TIME_STEP
}
fn default_reference() -> f64 {
    DEFAULT_REFERENCE
}
fn default_initial_state() -> f64 {
    DEFAULT_INITIAL_STATE
}

impl Default for HorizonParams {
    fn default() -> Self {
        Self {
            steps: DEFAULT_SIM_STEPS,
            time_step: DEFAULT_TIME_STEP,
            reference: DEFAULT_REFERENCE,
            initial_state: DEFAULT_INITIAL_STATE,
            divergence_policy: DivergencePolicy::default(),
        }
    }
}

impl HorizonParams {
    /// Validate horizon bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 || self.steps > MAX_SIM_STEPS {
            return Err(ConfigError::ValidationError(format!(
                "simulation.steps {} out of range [1, {}]",
                self.steps, MAX_SIM_STEPS
            )));
        }
        ensure_finite("simulation.time_step", self.time_step)?;
        if self.time_step <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "simulation.time_step must be > 0, got {}",
                self.time_step
            )));
        }
        ensure_finite("simulation.reference", self.reference)?;
        ensure_finite("simulation.initial_state", self.initial_state)?;
        Ok(())
    }

    /// Simulated duration `N·dt` [s].
    #[inline]
    pub fn duration(&self) -> f64 {
        self.steps as f64 * self.time_step
    }
}

// ─── Plant ──────────────────────────────────────────────────────────

/// Scalar linear plant `dx/dt = A·x + B·u`, `y = C·x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlantParams {
    /// Dynamic coefficient.
    #[serde(default = "default_plant_a")]
    pub a: f64,
    /// Input gain.
    #[serde(default = "default_plant_b")]
    pub b: f64,
    /// Output gain.
    #[serde(default = "default_plant_c")]
    pub c: f64,
}

fn default_plant_a() -> f64 {
    DEFAULT_PLANT_A
}
fn default_plant_b() -> f64 {
    DEFAULT_PLANT_B
}
fn default_plant_c() -> f64 {
    DEFAULT_PLANT_C
}

impl Default for PlantParams {
    fn default() -> Self {
        Self {
            a: DEFAULT_PLANT_A,
            b: DEFAULT_PLANT_B,
            c: DEFAULT_PLANT_C,
        }
    }
}

impl PlantParams {
    /// All coefficients must be finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("plant.a", self.a)?;
        ensure_finite("plant.b", self.b)?;
        ensure_finite("plant.c", self.c)?;
        Ok(())
    }
}

// ─── PMA Controller ─────────────────────────────────────────────────

/// PMA controller parameters `{Kp, Kint, K_alpha, K_beta, FinalScale}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerParams {
    /// Proportional gain on the internal error.
    #[serde(default = "default_kp")]
    pub kp: f64,
    /// Gain applied to the tracking error before integration.
    #[serde(default = "default_kint")]
    pub kint: f64,
    /// Internal reference amplitude.
    #[serde(default = "default_k_alpha")]
    pub k_alpha: f64,
    /// Internal reference decay rate [1/s]. `<= 0` is legal but does not decay.
    #[serde(default = "default_k_beta")]
    pub k_beta: f64,
    /// Divisor of the final control signal (!= 0).
    #[serde(default = "default_final_scale")]
    pub final_scale: f64,
}

fn default_kp() -> f64 {
    DEFAULT_KP
}
fn default_kint() -> f64 {
    DEFAULT_KINT
}
fn default_k_alpha() -> f64 {
    DEFAULT_K_ALPHA
}
fn default_k_beta() -> f64 {
    DEFAULT_K_BETA
}
fn default_final_scale() -> f64 {
    DEFAULT_FINAL_SCALE
}

impl Default for ControllerParams {
    fn default() -> Self {
        Self {
            kp: DEFAULT_KP,
            kint: DEFAULT_KINT,
            k_alpha: DEFAULT_K_ALPHA,
            k_beta: DEFAULT_K_BETA,
            final_scale: DEFAULT_FINAL_SCALE,
        }
    }
}

impl ControllerParams {
    /// Reject non-finite gains and a zero final scale.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("controller.kp", self.kp)?;
        ensure_finite("controller.kint", self.kint)?;
        ensure_finite("controller.k_alpha", self.k_alpha)?;
        ensure_finite("controller.k_beta", self.k_beta)?;
        ensure_finite("controller.final_scale", self.final_scale)?;
        if self.final_scale == 0.0 {
            return Err(ConfigError::ValidationError(
                "controller.final_scale must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn ensure_finite(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{field} must be finite, got {value}"
        )))
    }
}
