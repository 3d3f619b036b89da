//! Plant root.
//!
//! Scalar linear plant `dx/dt = A·x + B·u`, `y = C·x`, advanced by a
//! fixed-step classical RK4 integrator.

pub mod model;
pub mod rk4;
