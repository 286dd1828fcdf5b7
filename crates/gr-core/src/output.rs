//! Rendering of analysis results.
//!
//! JSON is the serde form of [`AnalysisResult`]. The Markdown and summary
//! forms are the text panel shown beside the MFD plot; absent values print
//! as "insufficient data".

use crate::result::{AnalysisResult, Estimate};
use gr_common::{OutputFormat, Result};
use std::fmt::Write;

const ABSENT: &str = "insufficient data";

/// Render `result` in the requested format.
pub fn render(result: &AnalysisResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Md => Ok(render_markdown(result)),
        OutputFormat::Summary => Ok(render_summary(result)),
    }
}

fn or_absent<T>(estimate: &Estimate<T>, show: impl Fn(&T) -> String) -> String {
    match estimate.value() {
        Some(value) => show(value),
        None => ABSENT.to_string(),
    }
}

/// Markdown parameter panel with the MFD table.
pub fn render_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let gr = &result.gutenberg_richter;

    let _ = writeln!(out, "# Gutenberg-Richter Analysis\n");
    let _ = writeln!(out, "| Parameter | Value |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| Events | {} |", result.event_count);
    if let Some(span) = &result.time_span {
        let _ = writeln!(
            out,
            "| Period | {} to {} |",
            span.start.format("%Y-%m-%d"),
            span.end.format("%Y-%m-%d")
        );
    }
    let _ = writeln!(out, "| Bin width | {} |", result.bin_width);
    let _ = writeln!(
        out,
        "| Mc | {} |",
        or_absent(&result.completeness, |e| format!("{:.1} ({})", e.mc, e.method))
    );
    let _ = writeln!(out, "| a | {} |", or_absent(gr, |p| format!("{:.3}", p.a)));
    if let Some(a_annual) = result.gr().and_then(|p| p.a_annual) {
        let _ = writeln!(out, "| a (annual) | {:.3} |", a_annual);
    }
    let _ = writeln!(out, "| b | {} |", or_absent(gr, |p| format!("{:.3}", p.b)));
    let _ = writeln!(
        out,
        "| b std. error | {} |",
        or_absent(gr, |p| format!("{:.3}", p.b_std_err))
    );
    let _ = writeln!(
        out,
        "| Goodness of fit | {} |",
        or_absent(gr, |p| format!("{:.3} ({})", p.goodness_of_fit, p.method))
    );

    if let Estimate::Absent { detail, .. } = &result.completeness {
        let _ = writeln!(out, "\n> Mc: {}", detail);
    } else if let Estimate::Absent { detail, .. } = gr {
        let _ = writeln!(out, "\n> Fit: {}", detail);
    }

    if !result.mfd.is_empty() {
        let _ = writeln!(out, "\n## Magnitude-frequency distribution\n");
        let _ = writeln!(out, "| M | N(≥M) | n(M) | Rate/yr | Fit |");
        let _ = writeln!(out, "|---|---|---|---|---|");
        for point in &result.mfd {
            let rate = point
                .annual_rate
                .map(|r| format!("{:.3}", r))
                .unwrap_or_else(|| "-".to_string());
            let fitted = result
                .fit_curve
                .iter()
                .find(|c| c.magnitude_bin == point.magnitude_bin)
                .map(|c| format!("{:.1}", c.predicted_count))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "| {:.1} | {} | {} | {} | {} |",
                point.magnitude_bin,
                point.cumulative_count,
                point.incremental_count,
                rate,
                fitted
            );
        }
    }

    out
}

/// One-line summary.
pub fn render_summary(result: &AnalysisResult) -> String {
    let gr = &result.gutenberg_richter;
    format!(
        "events={} mc={} a={} b={} b_std_err={} gof={}",
        result.event_count,
        or_absent(&result.completeness, |e| format!("{:.1}", e.mc)),
        or_absent(gr, |p| format!("{:.3}", p.a)),
        or_absent(gr, |p| format!("{:.3}", p.b)),
        or_absent(gr, |p| format!("{:.3}", p.b_std_err)),
        or_absent(gr, |p| format!("{:.3}", p.goodness_of_fit)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::AbsenceReason;
    use gr_config::{FitMethod, McMethod};

    fn empty_result() -> AnalysisResult {
        AnalysisResult {
            event_count: 0,
            bin_width: 0.1,
            time_span: None,
            observation_years: None,
            mfd: Vec::new(),
            completeness: Estimate::absent(AbsenceReason::EmptySelection, "no events in selection"),
            gutenberg_richter: Estimate::absent(
                AbsenceReason::EmptySelection,
                "no events in selection",
            ),
            fit_curve: Vec::new(),
            mc_method: McMethod::MaxCurvature,
            fit_method: FitMethod::LeastSquares,
        }
    }

    #[test]
    fn summary_marks_absent_values() {
        let line = render_summary(&empty_result());
        assert_eq!(
            line,
            "events=0 mc=insufficient data a=insufficient data b=insufficient data \
             b_std_err=insufficient data gof=insufficient data"
        );
    }

    #[test]
    fn markdown_explains_absence() {
        let md = render_markdown(&empty_result());
        assert!(md.contains("| Mc | insufficient data |"));
        assert!(md.contains("> Mc: no events in selection"));
        assert!(!md.contains("Magnitude-frequency distribution"));
    }

    #[test]
    fn json_carries_status_tags() {
        let json = render(&empty_result(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["completeness"]["status"], "absent");
        assert_eq!(value["gutenberg_richter"]["reason"], "empty_selection");
    }
}
