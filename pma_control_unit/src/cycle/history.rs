//! Pre-allocated time-series buffers for one run.
//!
//! Every series is allocated zero-filled once, before step 1, and written
//! in strictly increasing step order. Two series carry one look-ahead slot
//! because a step writes one index ahead of itself:
//!
//! - `state[k]` is the plant state at the start of step `k`; step `k`
//!   writes `state[k+1]`. `state[0] = state[1] = x0`.
//! - `measured[k+1] = output[k]`; the controller at step `k` reads
//!   `measured[k-1]`.
//!
//! Callers never do index arithmetic themselves; the accessors below own
//! the offsets.

use pma_common::sim::config::{HorizonParams, PlantParams};
use pma_common::sim::error::Divergence;

use crate::control::pma::{PmaGains, PmaInput, PmaOutput};
use crate::control::reference::internal_reference;
use crate::plant::model::plant_output;

use super::{RunStatus, SimulationResult};

/// Extra slots reserved past index `N` for signals written one step ahead.
const LOOKAHEAD: usize = 1;

/// Index distance between the step that reads a measurement and the
/// newest slot it may read.
const MEASUREMENT_READ_LAG: usize = 1;

/// Index distance between the step that produces an output and the slot
/// where the measured copy appears.
const MEASUREMENT_WRITE_LEAD: usize = 1;

/// Owned histories of a single simulation run.
#[derive(Debug, Clone)]
pub struct History {
    time: Vec<f64>,
    reference: Vec<f64>,
    internal_reference: Vec<f64>,
    tracking_error: Vec<f64>,
    accumulator: Vec<f64>,
    integrated_error: Vec<f64>,
    trapezoid: Vec<f64>,
    control: Vec<f64>,
    output: Vec<f64>,
    state: Vec<f64>,
    measured: Vec<f64>,
}

impl History {
    /// Allocate every buffer for `horizon.steps` steps and write index 0.
    ///
    /// Index 0 holds the initial conditions: the constant reference, the
    /// internal reference at `t = 0` (`alpha`), the initial state and its
    /// output. All accumulators start at zero.
    pub fn new(horizon: &HorizonParams, plant: &PlantParams, gains: &PmaGains) -> Self {
        let n = horizon.steps;
        let len = n + 1;

        let mut history = Self {
            time: vec![0.0; len],
            reference: vec![horizon.reference; len],
            internal_reference: vec![0.0; len],
            tracking_error: vec![0.0; len],
            accumulator: vec![0.0; len],
            integrated_error: vec![0.0; len],
            trapezoid: vec![0.0; len],
            control: vec![0.0; len],
            output: vec![0.0; len],
            state: vec![0.0; len + LOOKAHEAD],
            measured: vec![0.0; len + LOOKAHEAD],
        };

        let x0 = horizon.initial_state;
        let y0 = plant_output(plant, x0);
        history.internal_reference[0] = internal_reference(0.0, gains.k_alpha, gains.k_beta);
        history.state[0] = x0;
        history.state[1] = x0;
        history.output[0] = y0;
        history.measured[0] = y0;
        history.measured[1] = y0;
        history
    }

    /// Record `time[k]`.
    #[inline]
    pub fn set_time(&mut self, k: usize, t: f64) {
        self.time[k] = t;
    }

    /// Measurement visible to the controller at step `k`.
    #[inline]
    pub fn measured_seen_at(&self, k: usize) -> f64 {
        self.measured[k - MEASUREMENT_READ_LAG]
    }

    /// Plant state at the start of step `k`.
    #[inline]
    pub fn state_at_step_start(&self, k: usize) -> f64 {
        self.state[k]
    }

    /// Gather the controller reads for step `k` (`k >= 1`).
    ///
    /// `time[k]` must already be recorded.
    #[inline]
    pub fn controller_input(&self, k: usize) -> PmaInput {
        PmaInput {
            time: self.time[k],
            reference: self.reference[k],
            measured: self.measured_seen_at(k),
            accumulator: self.accumulator[k - 1],
            integrated_error: self.integrated_error[k - 1],
            trapezoid: self.trapezoid[k - 1],
        }
    }

    /// Store the controller results at index `k`.
    #[inline]
    pub fn record_controller(&mut self, k: usize, out: &PmaOutput) {
        self.internal_reference[k] = out.internal_reference;
        self.tracking_error[k] = out.tracking_error;
        self.accumulator[k] = out.accumulator;
        self.integrated_error[k] = out.integrated_error;
        self.trapezoid[k] = out.trapezoid;
        self.control[k] = out.control;
    }

    /// Store the integrated state, the true output and its delayed copy.
    #[inline]
    pub fn record_plant(&mut self, k: usize, next_state: f64, output: f64) {
        self.state[k + 1] = next_state;
        self.output[k] = output;
        self.publish_measurement(k, output);
    }

    #[inline]
    fn publish_measurement(&mut self, k: usize, output: f64) {
        self.measured[k + MEASUREMENT_WRITE_LEAD] = output;
    }

    /// Slice every series to `[0, completed]` and hand them out.
    ///
    /// Look-ahead slots are never exposed. The returned `state[k]` is the
    /// state after step `k`, so `output[k] == C·state[k]` for every `k`.
    pub(crate) fn finish(
        mut self,
        completed: usize,
        status: RunStatus,
        divergence: Option<Divergence>,
    ) -> SimulationResult {
        let len = completed + 1;

        // Shift the state so index k means "after step k".
        self.state.remove(0);

        for series in [
            &mut self.time,
            &mut self.reference,
            &mut self.internal_reference,
            &mut self.tracking_error,
            &mut self.accumulator,
            &mut self.integrated_error,
            &mut self.trapezoid,
            &mut self.control,
            &mut self.output,
            &mut self.state,
            &mut self.measured,
        ] {
            series.truncate(len);
        }

        SimulationResult {
            time: self.time,
            reference: self.reference,
            output: self.output,
            measured: self.measured,
            control: self.control,
            internal_reference: self.internal_reference,
            tracking_error: self.tracking_error,
            accumulator: self.accumulator,
            integrated_error: self.integrated_error,
            trapezoid: self.trapezoid,
            state: self.state,
            status,
            divergence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pma_common::sim::config::ControllerParams;

    fn history(steps: usize, x0: f64) -> History {
        let horizon = HorizonParams {
            steps,
            initial_state: x0,
            ..Default::default()
        };
        History::new(
            &horizon,
            &PlantParams::default(),
            &PmaGains::from(&ControllerParams::default()),
        )
    }

    #[test]
    fn initial_conditions() {
        let h = history(4, 0.5);
        assert_eq!(h.time.len(), 5);
        assert_eq!(h.state_at_step_start(1), 0.5);
        assert_eq!(h.measured_seen_at(1), 500.0);
        assert_eq!(h.internal_reference[0], 1e3);
        assert!(h.reference.iter().all(|&r| r == 8.55));
        assert!(h.accumulator.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn buffers_reserve_lookahead() {
        let h = history(10, 0.0);
        assert_eq!(h.time.len(), 11);
        assert_eq!(h.state.len(), 12);
        assert_eq!(h.measured.len(), 12);
    }

    #[test]
    fn measurement_reaches_controller_two_steps_later() {
        let mut h = history(5, 0.0);
        h.record_plant(1, 0.001, 1.0);
        assert_eq!(h.measured_seen_at(2), 0.0);
        assert_eq!(h.measured_seen_at(3), 1.0);
        assert_eq!(h.state_at_step_start(2), 0.001);
    }

    #[test]
    fn controller_input_reads_previous_slots() {
        let mut h = history(5, 0.0);
        h.set_time(1, 1e-5);
        let out = PmaOutput {
            accumulator: 1.0,
            integrated_error: 2.0,
            trapezoid: 3.0,
            ..Default::default()
        };
        h.record_controller(1, &out);
        h.set_time(2, 2e-5);
        let input = h.controller_input(2);
        assert_eq!(input.time, 2e-5);
        assert_eq!(input.accumulator, 1.0);
        assert_eq!(input.integrated_error, 2.0);
        assert_eq!(input.trapezoid, 3.0);
    }

    #[test]
    fn finish_hides_lookahead_and_shifts_state() {
        let mut h = history(3, 0.0);
        for k in 1..=3 {
            h.record_plant(k, k as f64, 10.0 * k as f64);
        }
        let r = h.finish(3, RunStatus::Completed, None);
        assert_eq!(r.state, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(r.output, vec![0.0, 10.0, 20.0, 30.0]);
        assert_eq!(r.measured, vec![0.0, 0.0, 10.0, 20.0]);
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn finish_truncates_partial_run() {
        let h = history(10, 0.0);
        let r = h.finish(4, RunStatus::Cancelled { completed_steps: 4 }, None);
        assert_eq!(r.time.len(), 5);
        assert_eq!(r.state.len(), 5);
        assert_eq!(r.measured.len(), 5);
    }
}
