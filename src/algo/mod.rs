//! Mesh processing algorithms.
//!
//! - **Spherical parameterization**: Tutte and harmonic maps of closed genus-0
//!   meshes onto the unit sphere ([`spherical`])
//! - **Progress**: callback-based iteration reporting shared by the drivers

pub mod progress;
pub mod spherical;

pub use progress::{IterationUpdate, Progress};
