//! Error module root.
//!
//! Configuration errors stop a run before step 1. Numeric divergence is
//! detected per step and, by default, only reported.

pub mod divergence;
