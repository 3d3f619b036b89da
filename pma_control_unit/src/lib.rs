//! # PMA Control Unit Library
//!
//! Closed-loop simulation of a scalar linear plant driven by a PMA
//! controller: a proportional accumulator on a decaying internal reference,
//! multiplied by a trapezoidal integral of the tracking error.
//!
//! ## Layers
//!
//! 1. **plant** — `dx/dt = A·x + B·u`, advanced by a fixed-step RK4
//! 2. **control** — internal reference generator and the PMA step
//! 3. **cycle** — owns the histories and sequences each step, with a
//!    one-step measurement lag between plant output and controller input
//! 4. **error** — per-step numeric divergence monitoring
//! 5. **chart** — read-only rendering of a finished run (plotters image, text preview)
//!
//! ## Determinism
//!
//! Controller and integrator are pure functions. Identical configurations
//! produce bit-identical histories; buffers are allocated once before the
//! first step.
//!
//! ```rust
//! use pma_common::prelude::*;
//! use pma_control_unit::cycle::run;
//!
//! let mut config = SimConfig::default();
//! config.simulation.steps = 3;
//! let result = run(&config).unwrap();
//! assert_eq!(result.len(), 4);
//! ```

pub mod chart;
pub mod config;
pub mod control;
pub mod cycle;
pub mod error;
pub mod plant;
