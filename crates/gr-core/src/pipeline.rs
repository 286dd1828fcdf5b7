//! End-to-end analysis: selection, MFD, Mc, GR fit, assembly.
//!
//! [`analyze`] is a pure function of its inputs. The catalog is borrowed
//! read-only and every intermediate value is allocated per call, so
//! independent analyses may run on separate threads sharing one catalog.

use crate::completeness::{estimate_mc, McEstimate};
use crate::fit::{fit, GrParams};
use crate::logging::{event_names, Stage};
use crate::mfd::{compute_mfd, Mfd};
use crate::result::{AbsenceReason, AnalysisResult, CurvePoint, Estimate, TimeSpan};
use crate::select::select;
use gr_common::{Error, EventCatalog, Region, Result, TimeRange};
use gr_config::{validate_config, AnalysisConfig};

const DAYS_PER_YEAR: f64 = 365.25;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Run the full pipeline over `catalog`.
///
/// Returns `Err` only for caller errors (malformed region, time range,
/// bin width or configuration). Sparse or flat selections produce a result
/// whose completeness and fit are explicitly absent.
pub fn analyze(
    catalog: &EventCatalog,
    region: &Region,
    time_range: &TimeRange,
    bin_width: f64,
    config: &AnalysisConfig,
) -> Result<AnalysisResult> {
    validate_config(config).map_err(|e| Error::invalid_parameter("config", e.to_string()))?;

    let subset = select(catalog, region, time_range)?;
    let mut mfd = compute_mfd(&subset, bin_width)?;

    let time_span = subset
        .time_span()
        .map(|(start, end)| TimeSpan { start, end });
    let observation_years = time_span.as_ref().and_then(observation_years);
    let rate_years = observation_years.filter(|_| config.normalize_by_years);
    if let Some(years) = rate_years {
        mfd = mfd.with_annual_rates(years);
    }

    let completeness = completeness_stage(&mfd, config)?;
    let gutenberg_richter = match completeness.value() {
        Some(estimate) => fit_stage(&mfd, estimate.mc, config, rate_years)?,
        None if mfd.is_empty() => {
            Estimate::absent(AbsenceReason::EmptySelection, "no events in selection")
        }
        None => Estimate::absent(
            AbsenceReason::NotAttempted,
            "magnitude of completeness is absent",
        ),
    };

    let fit_curve = gutenberg_richter
        .value()
        .map(|params| fit_curve(&mfd, params, rate_years))
        .unwrap_or_default();

    let result = AnalysisResult {
        event_count: subset.len(),
        bin_width,
        time_span,
        observation_years,
        mfd: mfd.points,
        completeness,
        gutenberg_richter,
        fit_curve,
        mc_method: config.mc_method,
        fit_method: config.fit_method,
    };

    tracing::info!(
        event = event_names::ANALYZE_FINISHED,
        stage = %Stage::Assemble,
        events = result.event_count,
        bins = result.mfd.len(),
        mc = ?result.mc(),
        b = ?result.gr().map(|p| p.b),
        "analysis finished"
    );

    Ok(result)
}

fn completeness_stage(mfd: &Mfd, config: &AnalysisConfig) -> Result<Estimate<McEstimate>> {
    if mfd.is_empty() {
        return Ok(Estimate::absent(
            AbsenceReason::EmptySelection,
            "no events in selection",
        ));
    }
    match estimate_mc(mfd, config) {
        Ok(value) => Ok(Estimate::Available { value }),
        Err(e) => {
            tracing::info!(
                event = event_names::MC_ABSENT,
                stage = %Stage::Completeness,
                code = e.code(),
                reason = %e,
                "magnitude of completeness absent"
            );
            Estimate::from_shortfall(e)
        }
    }
}

fn fit_stage(
    mfd: &Mfd,
    mc: f64,
    config: &AnalysisConfig,
    years: Option<f64>,
) -> Result<Estimate<GrParams>> {
    match fit(mfd, mc, config) {
        Ok(params) => Ok(Estimate::Available {
            value: params.with_observation_years(years),
        }),
        Err(e) => {
            tracing::info!(
                event = event_names::FIT_ABSENT,
                stage = %Stage::Fit,
                code = e.code(),
                reason = %e,
                "gutenberg-richter fit absent"
            );
            Estimate::from_shortfall(e)
        }
    }
}

fn fit_curve(mfd: &Mfd, params: &GrParams, years: Option<f64>) -> Vec<CurvePoint> {
    mfd.at_or_above(params.mc)
        .iter()
        .map(|p| {
            let predicted_count = params.predicted_count(p.magnitude_bin);
            CurvePoint {
                magnitude_bin: p.magnitude_bin,
                predicted_count,
                predicted_annual_rate: years.map(|y| predicted_count / y),
            }
        })
        .collect()
}

/// Span of the selection in years, `None` when it is not positive.
pub fn observation_years(span: &TimeSpan) -> Option<f64> {
    let millis = (span.end - span.start).num_milliseconds() as f64;
    let years = millis / MILLIS_PER_DAY / DAYS_PER_YEAR;
    (years > 0.0).then_some(years)
}
