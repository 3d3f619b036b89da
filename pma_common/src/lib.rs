//! PMA Common Library
//!
//! Shared constants, configuration types and error types for the PMA
//! closed-loop simulator workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Default parameter values and validation bounds
//! - [`config`] - Configuration loading traits and shared settings
//! - [`sim`] - Plant, controller and horizon parameters, simulation errors
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use pma_common::prelude::*;
//!
//! let config = SimConfig::default();
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
pub mod sim;
