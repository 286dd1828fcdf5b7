//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths → defaults.

use crate::analysis::AnalysisConfig;
use crate::validate::{validate_config, ValidationError};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "GR_CONFIG";
pub const ENV_CONFIG_DIR: &str = "GR_CONFIG_DIR";

/// Standard config file name.
pub const CONFIG_FILENAME: &str = "analysis.json";

/// Application name for XDG directories.
const APP_NAME: &str = "gr-explorer";

/// A loaded, validated configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: AnalysisConfig,
    /// File the config came from (None for built-in defaults).
    pub path: Option<PathBuf>,
    /// Hex SHA-256 of the file content (None for built-in defaults).
    pub hash: Option<String>,
    pub source: ConfigSource,
}

/// Resolve the configuration file path using the standard resolution order.
///
/// 1. Explicit CLI path (returned even if missing, so loading reports it)
/// 2. `GR_CONFIG` (direct path)
/// 3. `GR_CONFIG_DIR` + `analysis.json`
/// 4. XDG config directory (`~/.config/gr-explorer/analysis.json`)
/// 5. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> (Option<PathBuf>, ConfigSource) {
    if let Some(path) = cli_path {
        return (Some(path.to_path_buf()), ConfigSource::CliArgument);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }

    (None, ConfigSource::BuiltinDefault)
}

/// Resolve, read, parse and validate the analysis configuration.
pub fn load_config(cli_path: Option<&Path>) -> Result<ResolvedConfig, ValidationError> {
    let (path, source) = resolve_config(cli_path);

    let Some(path) = path else {
        let config = AnalysisConfig::default();
        validate_config(&config)?;
        return Ok(ResolvedConfig {
            config,
            path: None,
            hash: None,
            source,
        });
    };

    let content = std::fs::read(&path).map_err(|e| {
        ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let hash = hex::encode(Sha256::digest(&content));
    let text = String::from_utf8(content).map_err(|e| {
        ValidationError::ParseError(format!("{} is not UTF-8: {}", path.display(), e))
    })?;
    let config = AnalysisConfig::from_json(&text)?;
    validate_config(&config)?;

    Ok(ResolvedConfig {
        config,
        path: Some(path),
        hash: Some(hash),
        source,
    })
}

/// Get the XDG config directory for gr-explorer.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
