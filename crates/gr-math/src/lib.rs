//! Numerical kernels for magnitude-frequency analysis.

pub mod math;

pub use math::curvature::*;
pub use math::grid::*;
pub use math::likelihood::*;
pub use math::regression::*;
