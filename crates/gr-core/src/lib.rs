//! Gutenberg-Richter analysis core.
//!
//! Turns a read-only earthquake catalog and a user selection into an
//! [`AnalysisResult`]:
//! - Spatial/temporal selection (`select`)
//! - Magnitude-frequency distribution (`mfd`)
//! - Magnitude of completeness (`completeness`)
//! - Gutenberg-Richter fit (`fit`)
//! - Result assembly and rendering (`result`, `output`)
//!
//! Catalog loading, logging and exit codes support the `gr-core` binary in
//! `main.rs`.

pub mod catalog;
pub mod completeness;
pub mod exit_codes;
pub mod fit;
pub mod logging;
pub mod mfd;
pub mod output;
pub mod pipeline;
pub mod result;
pub mod select;
pub mod synthetic;

pub use catalog::{load_catalog, load_catalog_with_stats, parse_catalog, LoadStats};
pub use completeness::{estimate_mc, max_curvature, McEstimate};
pub use fit::{fit, GrParams};
pub use mfd::{compute_mfd, Mfd, MfdPoint};
pub use output::{render, render_markdown, render_summary};
pub use pipeline::analyze;
pub use result::{AbsenceReason, AnalysisResult, CurvePoint, Estimate, TimeSpan};
pub use select::{select, Subset};
