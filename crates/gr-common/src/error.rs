//! Error types for catalog analysis.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - A distinction between caller bugs and data shortfalls
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Invalid Region
//!   Reason: polygon needs at least 3 vertices, got 2
//!   Fix: Draw a closed polygon with at least three distinct vertices.
//! ```
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 11,
//!   "category": "parameter",
//!   "message": "invalid region: polygon needs at least 3 vertices, got 2",
//!   "caller_error": true,
//!   "recoverable": false
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed caller input (region, time range, bin width).
    Parameter,
    /// Selection too sparse or too flat to estimate from.
    Data,
    /// Catalog file could not be parsed.
    Catalog,
    /// Configuration file errors.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Parameter => write!(f, "parameter"),
            ErrorCategory::Data => write!(f, "data"),
            ErrorCategory::Catalog => write!(f, "catalog"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for catalog analysis.
#[derive(Error, Debug)]
pub enum Error {
    // Parameter errors (10-19)
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter { name: String, message: String },

    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("invalid time range: start {start} is after end {end}")]
    InvalidTimeRange { start: String, end: String },

    // Data errors (20-29)
    #[error("insufficient data for {stage}: need at least {needed}, have {available}")]
    InsufficientData {
        stage: String,
        needed: usize,
        available: usize,
    },

    #[error("degenerate distribution: {0}")]
    DegenerateDistribution(String),

    // Catalog errors (30-39)
    #[error("catalog parse error at line {line}: {message}")]
    CatalogParse { line: u64, message: String },

    #[error("invalid event: {0}")]
    InvalidEvent(String),

    // Configuration errors (40-49)
    #[error("configuration error: {0}")]
    Config(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`].
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::InsufficientData`].
    pub fn insufficient(stage: impl Into<String>, needed: usize, available: usize) -> Self {
        Error::InsufficientData {
            stage: stage.into(),
            needed,
            available,
        }
    }

    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Parameter errors
    /// - 20-29: Data errors
    /// - 30-39: Catalog errors
    /// - 40-49: Configuration errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidParameter { .. } => 10,
            Error::InvalidRegion(_) => 11,
            Error::InvalidTimeRange { .. } => 12,
            Error::InsufficientData { .. } => 20,
            Error::DegenerateDistribution(_) => 21,
            Error::CatalogParse { .. } => 30,
            Error::InvalidEvent(_) => 31,
            Error::Config(_) => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidParameter { .. }
            | Error::InvalidRegion(_)
            | Error::InvalidTimeRange { .. } => ErrorCategory::Parameter,

            Error::InsufficientData { .. } | Error::DegenerateDistribution(_) => {
                ErrorCategory::Data
            }

            Error::CatalogParse { .. } | Error::InvalidEvent(_) => ErrorCategory::Catalog,

            Error::Config(_) => ErrorCategory::Config,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether the error is a caller bug (malformed input) rather than
    /// a legitimate "not enough data" outcome.
    pub fn is_caller_error(&self) -> bool {
        self.category() == ErrorCategory::Parameter
    }

    /// Whether the error describes a selection that is valid but too
    /// sparse or flat to analyze.
    pub fn is_data_shortfall(&self) -> bool {
        self.category() == ErrorCategory::Data
    }

    /// Returns whether this error is potentially recoverable.
    ///
    /// Data shortfalls are recovered by choosing a different selection;
    /// config and I/O errors by fixing the file. Caller bugs are not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::InvalidParameter { .. } => false,
            Error::InvalidRegion(_) => false,
            Error::InvalidTimeRange { .. } => false,

            Error::InsufficientData { .. } => true,
            Error::DegenerateDistribution(_) => true,

            Error::CatalogParse { .. } => true,
            Error::InvalidEvent(_) => true,

            Error::Config(_) => true,

            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InvalidParameter { .. } => {
                "Check the analysis parameters: bin width must be positive and finite."
            }
            Error::InvalidRegion(_) => {
                "Draw a closed polygon with at least three distinct vertices, or a bounding box with south < north."
            }
            Error::InvalidTimeRange { .. } => "Make sure the start of the time window is not after its end.",

            Error::InsufficientData { .. } => {
                "Select a larger region or a longer time window to include more events."
            }
            Error::DegenerateDistribution(_) => {
                "The selected magnitudes show no roll-off. Widen the selection or use a finer bin width."
            }

            Error::CatalogParse { .. } => {
                "Check the catalog CSV: it needs date, lat, lon and a magnitude column (mw/mag)."
            }
            Error::InvalidEvent(_) => {
                "Remove events with non-finite or out-of-range coordinates or magnitudes from the catalog."
            }

            Error::Config(_) => "Run 'gr-core check' to validate the analysis configuration.",

            Error::Io(_) => "Check that the file exists and is readable, then retry.",
            Error::Json(_) => "Invalid JSON in file. Check syntax with 'jq . <file>'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InvalidParameter { .. } => "Invalid Parameter",
            Error::InvalidRegion(_) => "Invalid Region",
            Error::InvalidTimeRange { .. } => "Invalid Time Range",

            Error::InsufficientData { .. } => "Insufficient Data",
            Error::DegenerateDistribution(_) => "Degenerate Distribution",

            Error::CatalogParse { .. } => "Catalog Parse Error",
            Error::InvalidEvent(_) => "Invalid Catalog Event",

            Error::Config(_) => "Configuration Error",

            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }

    /// Formats the error as a human-facing block (headline, reason, fix).
    pub fn to_human(&self) -> String {
        format!(
            "✗ {}\n  Reason: {}\n  Fix: {}",
            self.headline(),
            self,
            self.remediation()
        )
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// True when the caller supplied malformed input.
    pub caller_error: bool,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g. parameter name, line number).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidParameter { name, .. } => {
                context.insert("parameter".to_string(), serde_json::json!(name));
            }
            Error::InsufficientData {
                stage,
                needed,
                available,
            } => {
                context.insert("stage".to_string(), serde_json::json!(stage));
                context.insert("needed".to_string(), serde_json::json!(needed));
                context.insert("available".to_string(), serde_json::json!(available));
            }
            Error::CatalogParse { line, .. } => {
                context.insert("line".to_string(), serde_json::json!(line));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            caller_error: err.is_caller_error(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}
