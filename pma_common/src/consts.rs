//! System-wide constants for the PMA workspace.
//!
//! Single source of truth for default parameters and validation bounds.
//! The defaults reproduce the reference closed-loop scenario.

use static_assertions::{const_assert, const_assert_eq};

// ─── Simulation Horizon ─────────────────────────────────────────────

/// Default number of simulation steps.
pub const DEFAULT_SIM_STEPS: usize = 1000;

/// Upper bound on simulation steps (buffers are allocated up front).
pub const MAX_SIM_STEPS: usize = 50_000_000;

/// Default integration time step [s].
pub const DEFAULT_TIME_STEP: f64 = 1e-5;

/// Default constant reference value.
pub const DEFAULT_REFERENCE: f64 = 8.55;

/// Default initial plant state.
pub const DEFAULT_INITIAL_STATE: f64 = 0.0;

// ─── Plant ──────────────────────────────────────────────────────────

/// Default plant dynamic coefficient `A` in `dx/dt = A·x + B·u`.
pub const DEFAULT_PLANT_A: f64 = -1e5;

/// Default plant input gain `B`.
pub const DEFAULT_PLANT_B: f64 = 1.0;

/// Default plant output gain `C` in `y = C·x`.
pub const DEFAULT_PLANT_C: f64 = 1e3;

// ─── PMA Controller ─────────────────────────────────────────────────

/// Default proportional gain on the internal error.
pub const DEFAULT_KP: f64 = 10.0;

/// Default gain on the tracking error before trapezoidal integration.
pub const DEFAULT_KINT: f64 = 1.0;

/// Default internal reference amplitude (alpha).
pub const DEFAULT_K_ALPHA: f64 = 1e3;

/// Default internal reference decay rate (beta) [1/s].
pub const DEFAULT_K_BETA: f64 = 40.0;

/// Default divisor applied to the final control signal.
pub const DEFAULT_FINAL_SCALE: f64 = 10.0;

// ─── Reporting ──────────────────────────────────────────────────────

/// Progress milestone spacing [%].
pub const PROGRESS_MILESTONE_PERCENT: u32 = 25;

/// Default chart width [columns].
pub const DEFAULT_CHART_WIDTH: usize = 72;

/// Default height of each chart panel [rows].
pub const DEFAULT_CHART_HEIGHT: usize = 12;

/// Default plot image width [px].
pub const DEFAULT_PLOT_WIDTH: u32 = 1200;

/// Default plot image height [px], shared by both panels.
pub const DEFAULT_PLOT_HEIGHT: u32 = 900;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/pma.toml";

const_assert!(DEFAULT_SIM_STEPS > 0);
const_assert!(DEFAULT_SIM_STEPS <= MAX_SIM_STEPS);
const_assert_eq!(100 % PROGRESS_MILESTONE_PERCENT, 0);
const_assert!(DEFAULT_CHART_WIDTH >= 2 && DEFAULT_CHART_HEIGHT >= 2);
const_assert!(DEFAULT_PLOT_WIDTH >= 200 && DEFAULT_PLOT_HEIGHT >= 200);
