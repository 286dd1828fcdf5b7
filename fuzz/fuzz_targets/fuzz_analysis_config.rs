//! Fuzz target for analysis.json parsing.
//!
//! Parsing and validation return errors for malformed input, never panic.

#![no_main]

use gr_config::{validate_config, AnalysisConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(config) = AnalysisConfig::from_json(data) {
        let _ = validate_config(&config);
    }
});
