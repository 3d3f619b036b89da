//! Internal reference generator.
//!
//! `alpha·exp(-beta·t)`: starts at `alpha` and decays toward zero when
//! `beta > 0`. `beta <= 0` yields a constant or growing signal and is a
//! legal parameterization.

/// Evaluate the internal reference at elapsed time `t` [s].
#[inline]
pub fn internal_reference(t: f64, alpha: f64, beta: f64) -> f64 {
    alpha * (-beta * t).exp()
}
