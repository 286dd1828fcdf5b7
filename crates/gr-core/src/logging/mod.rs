//! Structured logging for the analysis CLI.
//!
//! Pipeline stages log through `tracing` with `event` and `stage` fields
//! (see [`event_names`] and [`Stage`]). The subscriber writes either
//! console lines or JSONL, always to stderr so stdout carries only the
//! rendered result.

pub mod config;
pub mod events;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Stage};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Crates whose events pass the level filter.
const LOG_TARGETS: [&str; 4] = ["gr_core", "gr_common", "gr_config", "gr_math"];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// `EnvFilter` directives enabling `level` for the workspace crates only.
fn directives(level: LogLevel) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

fn stderr_layer(config: &LogConfig) -> BoxedLayer {
    match config.format {
        LogFormat::Human => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            if config.timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
        LogFormat::Jsonl => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed(),
    }
}

/// Install the global subscriber.
///
/// Call once at startup; later calls leave the first subscriber in place.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::new(directives(config.level));
    let installed = tracing_subscriber::registry()
        .with(stderr_layer(config).with_filter(filter))
        .try_init();

    if installed.is_err() {
        tracing::debug!("logging already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_workspace_crates() {
        let d = directives(LogLevel::Debug);
        assert_eq!(d.split(',').count(), LOG_TARGETS.len());
        assert!(d.contains("gr_core=debug"));
        assert!(d.contains("gr_math=debug"));
    }

    #[test]
    fn init_twice_does_not_panic() {
        let config = LogConfig::default().with_level(LogLevel::Off);
        init_logging(&config);
        init_logging(&config);
    }
}
