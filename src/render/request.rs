//! Render request and result.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::options::OptionSnapshot;

/// Immutable input for one render: the file, the options at click time, and when it was asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub input: PathBuf,
    pub options: OptionSnapshot,
    /// Source of the output-file timestamp
    pub requested_at: NaiveDateTime,
}

impl RenderRequest {
    /// Create a request stamped with the current local time.
    pub fn new(input: impl Into<PathBuf>, options: OptionSnapshot) -> Self {
        Self::at(input, options, Local::now().naive_local())
    }

    pub fn at(input: impl Into<PathBuf>, options: OptionSnapshot, requested_at: NaiveDateTime) -> Self {
        Self {
            input: input.into(),
            options,
            requested_at,
        }
    }

    pub fn input_filename(&self) -> String {
        self.input
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// Outcome of one render attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    /// Transcoder exit code, if it ran and exited normally
    pub exit_code: Option<i32>,
    /// Planned output file, if the request got that far
    pub output_path: Option<PathBuf>,
    pub success: bool,
    /// Execution log for this attempt
    pub log_path: PathBuf,
}

impl RenderResult {
    pub(crate) fn failed(log_path: &Path, output_path: Option<PathBuf>, exit_code: Option<i32>) -> Self {
        Self {
            exit_code,
            output_path,
            success: false,
            log_path: log_path.to_path_buf(),
        }
    }

    /// Short status line for the caller.
    pub fn summary(&self) -> String {
        if self.success {
            format!("Render complete. See log: {}", self.log_path.display())
        } else {
            format!("Render failed. See log: {}", self.log_path.display())
        }
    }
}
