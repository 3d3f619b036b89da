//! Model-free PMA controller step.
//!
//! One step computes, in order:
//!
//! ```text
//! y_int   = alpha·exp(-beta·t)
//! e_int   = y_int − y_meas[k-1]
//! e       = r[k] − y_meas[k-1]
//! acc[k]  = acc[k-1] + Kp·e_int
//! ie[k]   = Kint·e
//! tz[k]   = tz[k-1] + dt·(ie[k] + ie[k-1]) / 2
//! u[k]    = acc[k]·tz[k] / FinalScale
//! ```
//!
//! The controller keeps no state of its own. Everything from the previous
//! step arrives in [`PmaInput`]; the caller writes [`PmaOutput`] back into
//! its histories. The trapezoid needs the previous integrand `ie[k-1]`, so
//! it must be retained by the caller.

use pma_common::sim::config::ControllerParams;

use super::reference::internal_reference;

/// PMA gains — extracted from `ControllerParams`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PmaGains {
    /// Proportional gain on the internal error.
    pub kp: f64,
    /// Gain on the tracking error before integration.
    pub kint: f64,
    /// Internal reference amplitude.
    pub k_alpha: f64,
    /// Internal reference decay rate [1/s].
    pub k_beta: f64,
    /// Divisor of the final control signal. Non-zero by validation.
    pub final_scale: f64,
}

impl From<&ControllerParams> for PmaGains {
    fn from(p: &ControllerParams) -> Self {
        Self {
            kp: p.kp,
            kint: p.kint,
            k_alpha: p.k_alpha,
            k_beta: p.k_beta,
            final_scale: p.final_scale,
        }
    }
}

/// Values the controller reads for step `k`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PmaInput {
    /// Elapsed time `k·dt` [s].
    pub time: f64,
    /// External reference `r[k]`.
    pub reference: f64,
    /// Delayed measurement `y_meas[k-1]`.
    pub measured: f64,
    /// Accumulator `acc[k-1]`.
    pub accumulator: f64,
    /// Integrand `ie[k-1]`.
    pub integrated_error: f64,
    /// Trapezoidal integral `tz[k-1]`.
    pub trapezoid: f64,
}

/// Everything the controller produces for step `k`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PmaOutput {
    /// Internal reference `y_int(k·dt)`.
    pub internal_reference: f64,
    /// Internal error `y_int − y_meas[k-1]`.
    pub internal_error: f64,
    /// Tracking error `r[k] − y_meas[k-1]`.
    pub tracking_error: f64,
    /// Updated accumulator `acc[k]`.
    pub accumulator: f64,
    /// Integrand `ie[k] = Kint·e`.
    pub integrated_error: f64,
    /// Updated trapezoidal integral `tz[k]`.
    pub trapezoid: f64,
    /// Final control signal `u[k]`.
    pub control: f64,
}

/// Compute one PMA step.
///
/// # Arguments
/// - `input`: Previous-step histories and current reference.
/// - `gains`: Controller gains; `final_scale` must be non-zero.
/// - `dt`: Step size [s].
///
/// # Returns
/// [`PmaOutput`] with the control signal and every updated accumulator.
#[inline]
pub fn pma_compute(input: &PmaInput, gains: &PmaGains, dt: f64) -> PmaOutput {
    let y_int = internal_reference(input.time, gains.k_alpha, gains.k_beta);

    let internal_error = y_int - input.measured;
    let tracking_error = input.reference - input.measured;

    // ── Proportional accumulator ───────────────────────────
    let accumulator = input.accumulator + gains.kp * internal_error;

    // ── Two-point trapezoid over the retained integrand ────
    let integrated_error = gains.kint * tracking_error;
    let trapezoid = input.trapezoid + dt * (integrated_error + input.integrated_error) / 2.0;

    // Product of the two accumulators, not a sum.
    let control = accumulator * trapezoid / gains.final_scale;

    PmaOutput {
        internal_reference: y_int,
        internal_error,
        tracking_error,
        accumulator,
        integrated_error,
        trapezoid,
        control,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
