//! Progress observers.
//!
//! Called once per completed step with `(step, percent)`. Observers are
//! diagnostic only and never feed back into the numerics.

use pma_common::consts::PROGRESS_MILESTONE_PERCENT;
use tracing::{info, trace};

/// Receives one callback per completed step.
pub trait ProgressObserver {
    /// `step` is the step just completed, `percent` the elapsed share of
    /// the horizon in `(0, 100]`.
    fn on_step(&mut self, step: usize, percent: f64);
}

/// Observer that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    #[inline]
    fn on_step(&mut self, _step: usize, _percent: f64) {}
}

impl<F: FnMut(usize, f64)> ProgressObserver for F {
    #[inline]
    fn on_step(&mut self, step: usize, percent: f64) {
        self(step, percent)
    }
}

/// Logs an `info!` line whenever progress crosses the next milestone and a
/// `trace!` line for every step.
#[derive(Debug, Clone)]
pub struct LogProgress {
    next_milestone: f64,
    reported: u32,
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl LogProgress {
    /// Start with the 0 % milestone pending.
    pub fn new() -> Self {
        Self {
            next_milestone: 0.0,
            reported: 0,
        }
    }

    /// Number of milestone lines emitted so far.
    pub fn reported(&self) -> u32 {
        self.reported
    }
}

impl ProgressObserver for LogProgress {
    fn on_step(&mut self, step: usize, percent: f64) {
        if percent >= self.next_milestone {
            info!("Simulation progress: {}%", percent as u32);
            self.reported += 1;
            while self.next_milestone <= percent {
                self.next_milestone += f64::from(PROGRESS_MILESTONE_PERCENT);
            }
        }
        trace!(step, "step complete");
    }
}
