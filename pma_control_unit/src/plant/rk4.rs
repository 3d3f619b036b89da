//! Classic 4th-order Runge-Kutta step for the scalar plant.
//!
//! Fixed step, explicit, four stages. The control input is held constant
//! over the whole step (zero-order hold); it is not re-sampled at the
//! interior stages.
//!
//! Stability for `A < 0` requires `A·dt` within roughly `[-2.78, 0]`. No
//! check is made here; the config loader warns about it.

use pma_common::sim::config::PlantParams;

use super::model::derivative;

/// Advance the plant state by one step of size `dt`.
///
/// ```text
/// k1 = f(x)
/// k2 = f(x + dt/2·k1)
/// k3 = f(x + dt/2·k2)
/// k4 = f(x + dt·k3)
/// x_next = x + dt/6·(k1 + 2·k2 + 2·k3 + k4)
/// ```
///
/// where `f(s) = a·s + b·u`.
#[inline]
pub fn rk4_step(x: f64, u: f64, dt: f64, a: f64, b: f64) -> f64 {
    let k1 = derivative(x, u, a, b);
    let k2 = derivative(x + 0.5 * dt * k1, u, a, b);
    let k3 = derivative(x + 0.5 * dt * k2, u, a, b);
    let k4 = derivative(x + dt * k3, u, a, b);

    x + (dt / 6.0) * (k1 + 2.0 * k2 + 2.0 * k3 + k4)
}

/// [`rk4_step`] with configured plant coefficients.
#[inline]
pub fn plant_step(plant: &PlantParams, x: f64, u: f64, dt: f64) -> f64 {
    rk4_step(x, u, dt, plant.a, plant.b)
}

// ─── Tests ──────────────────────────────────────────────────────────
