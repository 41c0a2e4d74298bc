//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the option state model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionError {
    #[error("Please enter a valid number (degrees), got {0:?}")]
    InvalidAngle(String),
}

/// Errors that end a single render attempt.
///
/// The display text of each variant is the terminal line written to the execution log.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed ❌  File not found: {}", .0.display())]
    InputMissing(PathBuf),
    #[error("Failed ❌  ERROR: transcoder not found (bundled payload missing at {})", .0.display())]
    ToolMissing(PathBuf),
    #[error("Failed ❌  (exit code {}, see log above)", exit_code_text(.code))]
    ProcessFailure { code: Option<i32> },
    #[error("Failed ❌  Exception: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed ❌  Exception: {0}")]
    Unhandled(String),
}

fn exit_code_text(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Errors loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("No configuration directory available")]
    NoConfigDir,
}
