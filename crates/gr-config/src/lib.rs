//! Analysis configuration loading and validation.
//!
//! This crate provides:
//! - The typed `AnalysisConfig` document (Mc method, fit method, thresholds)
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod analysis;
pub mod resolve;
pub mod validate;

pub use analysis::{AnalysisConfig, FitMethod, McMethod};
pub use resolve::{load_config, resolve_config, ConfigSource, ResolvedConfig};
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
