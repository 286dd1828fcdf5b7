//! Exit codes for the gr-core CLI.
//!
//! Exit codes communicate the analysis outcome without requiring output
//! parsing.
//!
//! Exit code ranges:
//! - 0-1: Operational outcomes (analysis ran)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

use gr_common::{Error, ErrorCategory};

/// Exit codes for gr-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Operational Outcomes (0-1)
    // ========================================================================
    /// Analysis completed with Mc and a GR fit
    Clean = 0,

    /// Analysis completed but Mc or the fit is absent for this selection
    InsufficientData = 1,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments or analysis parameters
    ArgsError = 10,

    /// Configuration file missing, malformed or invalid
    ConfigError = 11,

    /// Catalog file could not be parsed
    CatalogError = 12,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if the analysis ran (codes 0-1).
    pub fn is_operational(self) -> bool {
        (self as i32) < 10
    }

    /// Check if this exit code is a user/environment error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        let code = self as i32;
        (10..20).contains(&code)
    }

    /// Check if this exit code is an internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        let code = self as i32;
        code >= 20
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::InsufficientData => "OK_INSUFFICIENT_DATA",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::CatalogError => "ERR_CATALOG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Map a pipeline error to its exit code.
    pub fn for_error(error: &Error) -> Self {
        match error.category() {
            ErrorCategory::Parameter => ExitCode::ArgsError,
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Catalog => ExitCode::CatalogError,
            ErrorCategory::Io => ExitCode::IoError,
            // shortfalls are folded into the result before reaching the CLI
            ErrorCategory::Data => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
