//! Stable event names and pipeline stages for structured logs.
//!
//! Every pipeline log line carries `event` (one of [`event_names`]) and
//! `stage` fields so JSONL output can be filtered without parsing messages.

use serde::{Deserialize, Serialize};

/// Processing stages in the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Catalog file parsing.
    Load,
    /// Spatial/temporal filtering.
    Select,
    /// Magnitude-frequency distribution.
    Mfd,
    /// Magnitude of completeness.
    Completeness,
    /// Gutenberg-Richter fit.
    Fit,
    /// Result packaging.
    Assemble,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Select => "select",
            Stage::Mfd => "mfd",
            Stage::Completeness => "completeness",
            Stage::Fit => "fit",
            Stage::Assemble => "assemble",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";

    // Catalog
    pub const CATALOG_LOADED: &str = "catalog.loaded";
    pub const CATALOG_ROW_SKIPPED: &str = "catalog.row_skipped";

    // Pipeline
    pub const SELECT_FINISHED: &str = "select.finished";
    pub const MFD_FINISHED: &str = "mfd.finished";
    pub const MC_ESTIMATED: &str = "mc.estimated";
    pub const MC_ABSENT: &str = "mc.absent";
    pub const FIT_FINISHED: &str = "fit.finished";
    pub const FIT_ABSENT: &str = "fit.absent";
    pub const ANALYZE_FINISHED: &str = "analyze.finished";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_display_matches_serde() {
        for stage in [
            Stage::Init,
            Stage::Load,
            Stage::Select,
            Stage::Mfd,
            Stage::Completeness,
            Stage::Fit,
            Stage::Assemble,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage));
        }
    }
}
