//! Prelude module for common re-exports.
//!
//! ```rust
//! use pma_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::sim::config::{
    ControllerParams, DivergencePolicy, HorizonParams, PlantParams, SimConfig,
};

// ─── Errors ─────────────────────────────────────────────────────────
pub use crate::sim::error::{Divergence, DivergenceFlags, DivergenceSource, SimulationError};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{DEFAULT_CONFIG_PATH, MAX_SIM_STEPS};
