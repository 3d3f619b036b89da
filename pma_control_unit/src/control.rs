//! Control engine root.
//!
//! Model-free PMA controller: a proportional accumulator driven by an
//! exponentially decaying internal reference, multiplied by a trapezoidal
//! running integral of the tracking error.

pub mod pma;
pub mod reference;
