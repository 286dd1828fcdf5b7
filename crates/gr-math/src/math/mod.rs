//! Core math modules.

pub mod curvature;
pub mod grid;
pub mod likelihood;
pub mod regression;
