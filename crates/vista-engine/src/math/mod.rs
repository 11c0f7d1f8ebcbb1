//! Scalar helpers shared by layout and animation code.

mod scalar;

pub use scalar::{clamp, step};
