//! The analysis snapshot handed to renderers.
//!
//! Values that could not be computed are carried as explicit
//! [`Estimate::Absent`] records with a reason, never as zero or NaN, so a
//! consumer can tell "no fit possible" apart from "fit is exactly zero".

use crate::completeness::McEstimate;
use crate::fit::GrParams;
use crate::mfd::MfdPoint;
use chrono::{DateTime, Utc};
use gr_common::Error;
use gr_config::{FitMethod, McMethod};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Why a value is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceReason {
    /// No events matched the selection.
    EmptySelection,
    /// Too few bins or points for the stage.
    InsufficientData,
    /// The distribution has no usable shape (flat, constant).
    DegenerateDistribution,
    /// An upstream stage was absent.
    NotAttempted,
}

impl std::fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbsenceReason::EmptySelection => write!(f, "empty selection"),
            AbsenceReason::InsufficientData => write!(f, "insufficient data"),
            AbsenceReason::DegenerateDistribution => write!(f, "degenerate distribution"),
            AbsenceReason::NotAttempted => write!(f, "not attempted"),
        }
    }
}

/// A stage output that is either available or explicitly absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Estimate<T> {
    Available { value: T },
    Absent { reason: AbsenceReason, detail: String },
}

impl<T> Estimate<T> {
    pub fn absent(reason: AbsenceReason, detail: impl Into<String>) -> Self {
        Estimate::Absent {
            reason,
            detail: detail.into(),
        }
    }

    /// Fold a data shortfall into an absence record.
    ///
    /// Returns the error back for anything that is not a shortfall.
    pub fn from_shortfall(error: Error) -> Result<Self, Error> {
        let reason = match &error {
            Error::InsufficientData { .. } => AbsenceReason::InsufficientData,
            Error::DegenerateDistribution(_) => AbsenceReason::DegenerateDistribution,
            _ => return Err(error),
        };
        Ok(Estimate::absent(reason, error.to_string()))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Estimate::Available { value } => Some(value),
            Estimate::Absent { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Estimate::Available { .. })
    }

    pub fn absence_reason(&self) -> Option<AbsenceReason> {
        match self {
            Estimate::Available { .. } => None,
            Estimate::Absent { reason, .. } => Some(*reason),
        }
    }
}

/// Earliest and latest origin time in the selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One point of the fitted GR line, for drawing over the MFD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurvePoint {
    pub magnitude_bin: f64,
    pub predicted_count: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_annual_rate: Option<f64>,
}

/// Immutable result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    /// Events in the selection.
    pub event_count: usize,
    pub bin_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_span: Option<TimeSpan>,
    /// Length of `time_span` in years; absent for an empty or instantaneous selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation_years: Option<f64>,
    /// Cumulative MFD, ascending by magnitude.
    pub mfd: Vec<MfdPoint>,
    pub completeness: Estimate<McEstimate>,
    pub gutenberg_richter: Estimate<GrParams>,
    /// GR-predicted counts for every MFD bin at or above Mc; empty without a fit.
    pub fit_curve: Vec<CurvePoint>,
    pub mc_method: McMethod,
    pub fit_method: FitMethod,
}

impl AnalysisResult {
    pub fn mc(&self) -> Option<f64> {
        self.completeness.value().map(|e| e.mc)
    }

    pub fn gr(&self) -> Option<&GrParams> {
        self.gutenberg_richter.value()
    }

    pub fn has_fit(&self) -> bool {
        self.gutenberg_richter.is_available()
    }

    /// True when Mc or the GR fit could not be computed.
    pub fn insufficient_data(&self) -> bool {
        !self.completeness.is_available() || !self.gutenberg_richter.is_available()
    }

    /// JSON Schema of the serialized result.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(AnalysisResult)
    }
}
