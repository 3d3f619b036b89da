//! First-order linear plant model.

use pma_common::sim::config::PlantParams;

/// Time derivative of the plant state: `a·state + b·control`.
///
/// Pure and total over all real inputs; non-finite inputs propagate.
#[inline]
pub fn derivative(state: f64, control: f64, a: f64, b: f64) -> f64 {
    a * state + b * control
}

/// Plant derivative using configured coefficients.
#[inline]
pub fn plant_derivative(plant: &PlantParams, state: f64, control: f64) -> f64 {
    derivative(state, control, plant.a, plant.b)
}

/// True plant output `c·state`.
#[inline]
pub fn plant_output(plant: &PlantParams, state: f64) -> f64 {
    plant.c * state
}
