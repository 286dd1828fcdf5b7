//! Configuration validation errors and semantic validation.

use crate::analysis::AnalysisConfig;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Fewest points a least-squares line with a slope error can be fitted to.
pub const MIN_FIT_POINTS: usize = 3;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 62,
            ValidationError::VersionMismatch { .. } => 63,
        }
    }

    fn invalid(field: &str, message: String) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message,
        }
    }
}

/// Validate an analysis configuration semantically.
pub fn validate_config(config: &AnalysisConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if config.min_points_for_fit < MIN_FIT_POINTS {
        return Err(ValidationError::invalid(
            "min_points_for_fit",
            format!(
                "must be at least {}, got {}",
                MIN_FIT_POINTS, config.min_points_for_fit
            ),
        ));
    }

    let threshold = config.goodness_of_fit_threshold;
    if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
        return Err(ValidationError::invalid(
            "goodness_of_fit_threshold",
            format!("must be in (0, 1], got {}", threshold),
        ));
    }

    validate_bin_width(config.bin_width)?;

    Ok(())
}

/// A bin width must be positive and finite.
pub fn validate_bin_width(bin_width: f64) -> ValidationResult<()> {
    if !bin_width.is_finite() || bin_width <= 0.0 {
        return Err(ValidationError::invalid(
            "bin_width",
            format!("must be positive and finite, got {}", bin_width),
        ));
    }
    Ok(())
}
