//! The analysis configuration document (`analysis.json`).

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the magnitude of completeness is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum McMethod {
    /// Peak curvature of the non-cumulative distribution.
    #[default]
    MaxCurvature,
    /// Smallest candidate whose GR fit explains the observed counts
    /// at or above the configured threshold; falls back to max-curvature.
    GoodnessOfFit,
}

impl std::fmt::Display for McMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            McMethod::MaxCurvature => write!(f, "max-curvature"),
            McMethod::GoodnessOfFit => write!(f, "goodness-of-fit"),
        }
    }
}

/// How the Gutenberg-Richter parameters are fitted above Mc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FitMethod {
    /// Ordinary least squares on log10 cumulative counts.
    #[default]
    LeastSquares,
    /// Aki–Utsu maximum-likelihood b-value on the binned distribution.
    MaxLikelihood,
}

impl std::fmt::Display for FitMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitMethod::LeastSquares => write!(f, "least-squares"),
            FitMethod::MaxLikelihood => write!(f, "max-likelihood"),
        }
    }
}

/// Tunable parameters for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisConfig {
    pub schema_version: String,
    pub mc_method: McMethod,
    pub fit_method: FitMethod,
    /// Fewest MFD points at or above Mc for a fit to be attempted.
    pub min_points_for_fit: usize,
    /// Quality an Mc candidate must reach under `goodness-of-fit`.
    pub goodness_of_fit_threshold: f64,
    /// Bin width used when the caller does not supply one.
    pub bin_width: f64,
    /// Report cumulative counts per year of observation alongside raw counts.
    pub normalize_by_years: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            mc_method: McMethod::MaxCurvature,
            fit_method: FitMethod::LeastSquares,
            min_points_for_fit: 3,
            goodness_of_fit_threshold: 0.9,
            bin_width: 0.1,
            normalize_by_years: true,
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, crate::validate::ValidationError> {
        serde_json::from_str(json).map_err(|e| {
            crate::validate::ValidationError::ParseError(format!("Invalid JSON: {}", e))
        })
    }

    pub fn with_mc_method(mut self, method: McMethod) -> Self {
        self.mc_method = method;
        self
    }

    pub fn with_fit_method(mut self, method: FitMethod) -> Self {
        self.fit_method = method;
        self
    }

    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points_for_fit = min_points;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.goodness_of_fit_threshold = threshold;
        self
    }
}
