//! Deterministic simulation loop: compute → integrate → publish.
//!
//! ## Sequence
//! `Init -> (StepCompute -> StepIntegrate -> StepPublish) × N -> Done`
//!
//! For each step `k` in `1..=N`:
//! 1. `time[k] = k·dt`
//! 2. PMA controller on the histories → `u[k]` and its accumulators
//! 3. RK4 with `u[k]` held over the step → `x[k+1]`
//! 4. `output[k] = C·x[k+1]`, `measured[k+1] = output[k]`
//! 5. divergence check, progress callback
//!
//! Step `k+1` depends on the integrator result of step `k`, so steps are
//! strictly serial. All buffers are pre-allocated in [`History::new`]; the
//! loop itself performs no allocation.
//!
//! ## Cancellation
//! A [`CancelToken`] is polled once before each step. A cancelled run
//! returns the completed prefix, bit-identical to an uncancelled run.

pub mod history;
pub mod progress;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use pma_common::sim::config::SimConfig;
use pma_common::sim::error::{Divergence, SimulationError};
use tracing::{debug, info, warn};

use crate::control::pma::{PmaGains, pma_compute};
use crate::error::divergence::DivergenceMonitor;
use crate::plant::model::plant_output;
use crate::plant::rk4::plant_step;

use self::history::History;
use self::progress::{NoProgress, ProgressObserver};

// ─── Cancellation ───────────────────────────────────────────────────

/// Cooperative cancellation flag, shared between threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the run to stop before its next step.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ─── Result ─────────────────────────────────────────────────────────

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// All `N` steps executed.
    Completed,
    /// Stopped by a [`CancelToken`] after `completed_steps` steps.
    Cancelled { completed_steps: usize },
}

/// Time series of a run, sliced to `[0, completed]`.
///
/// All series have the same length. Consumers only read; nothing here
/// feeds back into the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// `k·dt` [s].
    pub time: Vec<f64>,
    /// Constant external reference.
    pub reference: Vec<f64>,
    /// True plant output `C·x` after step `k`.
    pub output: Vec<f64>,
    /// Output as seen by the sensor, one step late.
    pub measured: Vec<f64>,
    /// Control signal applied during step `k`.
    pub control: Vec<f64>,
    /// Internal reference evaluated at `time[k]`.
    pub internal_reference: Vec<f64>,
    /// `reference[k] − measured[k-1]`.
    pub tracking_error: Vec<f64>,
    /// Proportional accumulator.
    pub accumulator: Vec<f64>,
    /// `Kint · tracking_error`.
    pub integrated_error: Vec<f64>,
    /// Trapezoidal running integral.
    pub trapezoid: Vec<f64>,
    /// Plant state after step `k` (`state[0] = x0`).
    pub state: Vec<f64>,
    /// How the run ended.
    pub status: RunStatus,
    /// First non-finite write, if any.
    pub divergence: Option<Divergence>,
}

impl SimulationResult {
    /// Number of samples per series (`completed_steps + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Steps actually executed.
    #[inline]
    pub fn completed_steps(&self) -> usize {
        self.len().saturating_sub(1)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

// ─── Simulation ─────────────────────────────────────────────────────

/// A validated simulation, ready to run.
///
/// Owns nothing between runs; each call to [`Simulation::run`] allocates
/// fresh histories.
#[derive(Debug, Clone)]
pub struct Simulation<'a> {
    config: &'a SimConfig,
    gains: PmaGains,
    cancel: Option<CancelToken>,
}

impl<'a> Simulation<'a> {
    /// Validate `config` and prepare a run.
    ///
    /// # Errors
    /// [`SimulationError::Config`] if any parameter is invalid. No buffer
    /// is allocated in that case.
    pub fn new(config: &'a SimConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self {
            config,
            gains: PmaGains::from(&config.controller),
            cancel: None,
        })
    }

    /// Attach a cancellation token polled before each step.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Run all steps without progress reporting.
    pub fn run(&self) -> Result<SimulationResult, SimulationError> {
        self.run_with_progress(&mut NoProgress)
    }

    /// Run all steps, reporting each completed step to `progress`.
    ///
    /// # Errors
    /// [`SimulationError::Diverged`] only under `DivergencePolicy::Abort`.
    pub fn run_with_progress<P: ProgressObserver + ?Sized>(
        &self,
        progress: &mut P,
    ) -> Result<SimulationResult, SimulationError> {
        let horizon = &self.config.simulation;
        let n = horizon.steps;

        let mut history = History::new(horizon, &self.config.plant, &self.gains);
        let mut monitor = DivergenceMonitor::new(horizon.divergence_policy);
        let started = Instant::now();

        debug!(
            steps = n,
            dt = horizon.time_step,
            reference = horizon.reference,
            "simulation start"
        );

        let mut status = RunStatus::Completed;
        let mut completed = 0;

        for k in 1..=n {
            if self.is_cancelled() {
                warn!(completed_steps = completed, "simulation cancelled");
                status = RunStatus::Cancelled {
                    completed_steps: completed,
                };
                break;
            }

            self.step(&mut history, &mut monitor, k)?;
            completed = k;
            progress.on_step(k, 100.0 * k as f64 / n as f64);
        }

        let elapsed = started.elapsed();
        info!(
            steps = completed,
            elapsed_us = elapsed.as_micros() as u64,
            diverged_steps = monitor.diverged_steps(),
            "simulation finished"
        );

        Ok(history.finish(completed, status, monitor.first()))
    }

    /// Execute step `k`.
    #[inline]
    fn step(
        &self,
        history: &mut History,
        monitor: &mut DivergenceMonitor,
        k: usize,
    ) -> Result<(), SimulationError> {
        let dt = self.config.simulation.time_step;
        let plant = &self.config.plant;

        // ── StepCompute ─────────────────────────────────────
        history.set_time(k, k as f64 * dt);
        let input = history.controller_input(k);
        let out = pma_compute(&input, &self.gains, dt);
        history.record_controller(k, &out);

        // ── StepIntegrate ───────────────────────────────────
        let next_state = plant_step(plant, history.state_at_step_start(k), out.control, dt);

        // ── StepPublish ─────────────────────────────────────
        let output = plant_output(plant, next_state);
        history.record_plant(k, next_state, output);

        monitor.check_step(k, &out, next_state, output)
    }

    #[inline]
    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

/// Validate `config` and run it to completion.
pub fn run(config: &SimConfig) -> Result<SimulationResult, SimulationError> {
    Simulation::new(config)?.run()
}

// ─── Tests ──────────────────────────────────────────────────────────
