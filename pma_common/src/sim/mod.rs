//! Simulation shared types.
//!
//! - [`config`] - Horizon, plant and controller parameters with validation
//! - [`error`] - Divergence flags and simulation errors

pub mod config;
pub mod error;
