//! Error types for a simulation run.
//!
//! Divergence flags use the `bitflags` crate so a single step can report
//! every signal that went non-finite at once.

use bitflags::bitflags;
use thiserror::Error;

use crate::config::ConfigError;

bitflags! {
    /// Signals that can go non-finite during a step.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DivergenceFlags: u8 {
        /// Internal decaying reference.
        const INTERNAL_REFERENCE = 0x01;
        /// Proportional accumulator.
        const ACCUMULATOR        = 0x02;
        /// Trapezoidal running integral (or its integrand).
        const TRAPEZOID          = 0x04;
        /// Final control signal.
        const CONTROL            = 0x08;
        /// Plant state after integration.
        const STATE              = 0x10;
        /// True plant output.
        const OUTPUT             = 0x20;
    }
}

impl DivergenceFlags {
    /// Signals computed by the controller.
    pub const CONTROLLER_MASK: Self = Self::from_bits_truncate(
        Self::INTERNAL_REFERENCE.bits()
            | Self::ACCUMULATOR.bits()
            | Self::TRAPEZOID.bits()
            | Self::CONTROL.bits(),
    );

    /// Signals computed by the plant integrator.
    pub const PLANT_MASK: Self =
        Self::from_bits_truncate(Self::STATE.bits() | Self::OUTPUT.bits());

    /// Returns true if any controller signal is flagged.
    #[inline]
    pub const fn has_controller(&self) -> bool {
        self.intersects(Self::CONTROLLER_MASK)
    }

    /// Returns true if any plant signal is flagged.
    #[inline]
    pub const fn has_plant(&self) -> bool {
        self.intersects(Self::PLANT_MASK)
    }
}

/// Stage of a step that wrote a non-finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivergenceSource {
    /// PMA controller (runs first within a step).
    Controller,
    /// RK4 integrator or output map.
    Plant,
}

impl Default for DivergenceFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// First step at which a non-finite value was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Divergence {
    /// Step index `k` of the first non-finite write.
    pub step: usize,
    /// Every signal that was non-finite at that step.
    pub signals: DivergenceFlags,
}

impl Divergence {
    /// Earliest stage in the step that went non-finite.
    ///
    /// The controller runs before the integrator, so a controller flag wins
    /// when both are set.
    pub fn source(&self) -> Option<DivergenceSource> {
        if self.signals.has_controller() {
            Some(DivergenceSource::Controller)
        } else if self.signals.has_plant() {
            Some(DivergenceSource::Plant)
        } else {
            None
        }
    }
}

/// Errors returned by a simulation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The run was refused before any step executed.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Non-finite values appeared and the divergence policy is `Abort`.
    #[error("numeric divergence at step {step}: {signals:?}")]
    Diverged {
        /// Step index of the first non-finite write.
        step: usize,
        /// Signals that were non-finite.
        signals: DivergenceFlags,
    },
}
