//! Numeric divergence monitoring.
//!
//! Checks every value written during a step. The first non-finite write is
//! recorded and reported once; later steps keep propagating NaN/Inf
//! without further warnings. Dispatch follows [`DivergencePolicy`]:
//!
//! - **Warn**: the run completes with the same output shape.
//! - **Abort**: the run stops with [`SimulationError::Diverged`].

use pma_common::sim::config::DivergencePolicy;
use pma_common::sim::error::{Divergence, DivergenceFlags, SimulationError};
use tracing::warn;

use crate::control::pma::PmaOutput;

/// Flag every non-finite signal written in one step.
pub fn classify_step(out: &PmaOutput, next_state: f64, output: f64) -> DivergenceFlags {
    let mut flags = DivergenceFlags::empty();

    if !out.internal_reference.is_finite() {
        flags |= DivergenceFlags::INTERNAL_REFERENCE;
    }
    if !(out.accumulator.is_finite() && out.internal_error.is_finite()) {
        flags |= DivergenceFlags::ACCUMULATOR;
    }
    if !(out.trapezoid.is_finite()
        && out.integrated_error.is_finite()
        && out.tracking_error.is_finite())
    {
        flags |= DivergenceFlags::TRAPEZOID;
    }
    if !out.control.is_finite() {
        flags |= DivergenceFlags::CONTROL;
    }
    if !next_state.is_finite() {
        flags |= DivergenceFlags::STATE;
    }
    if !output.is_finite() {
        flags |= DivergenceFlags::OUTPUT;
    }

    flags
}

/// Per-run divergence monitor.
#[derive(Debug, Clone)]
pub struct DivergenceMonitor {
    policy: DivergencePolicy,
    first: Option<Divergence>,
    diverged_steps: usize,
}

impl DivergenceMonitor {
    pub fn new(policy: DivergencePolicy) -> Self {
        Self {
            policy,
            first: None,
            diverged_steps: 0,
        }
    }

    /// Evaluate the values written at step `k`.
    ///
    /// # Errors
    /// [`SimulationError::Diverged`] on the first diverged step when the
    /// policy is `Abort`.
    pub fn check_step(
        &mut self,
        k: usize,
        out: &PmaOutput,
        next_state: f64,
        output: f64,
    ) -> Result<(), SimulationError> {
        let signals = classify_step(out, next_state, output);
        if signals.is_empty() {
            return Ok(());
        }

        self.diverged_steps += 1;
        if self.first.is_some() {
            return Ok(());
        }

        let first = Divergence { step: k, signals };
        self.first = Some(first);
        let source = first.source();
        match self.policy {
            DivergencePolicy::Warn => {
                warn!(
                    step = k,
                    ?signals,
                    ?source,
                    "non-finite value entered the histories; continuing"
                );
                Ok(())
            }
            DivergencePolicy::Abort => {
                warn!(
                    step = k,
                    ?signals,
                    ?source,
                    "non-finite value entered the histories; aborting"
                );
                Err(SimulationError::Diverged { step: k, signals })
            }
        }
    }

    /// First diverged step, if any.
    #[inline]
    pub fn first(&self) -> Option<Divergence> {
        self.first
    }

    /// Number of steps that wrote at least one non-finite value.
    #[inline]
    pub fn diverged_steps(&self) -> usize {
        self.diverged_steps
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
