//! Application configuration
//!
//! Encoder settings, transcoder location and log placement, stored as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H.%M.%S";

/// Fixed re-encode settings and output naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    /// Video codec passed to `-c:v`
    pub video_codec: String,
    /// Encoder preset passed to `-preset`
    pub video_preset: String,
    /// Constant rate factor passed to `-crf`
    pub video_crf: u8,
    /// Audio codec passed to `-c:a` unless muted
    pub audio_codec: String,
    /// Audio bitrate passed to `-b:a` unless muted
    pub audio_bitrate: String,
    /// Token inserted between the input stem and the timestamp
    pub output_marker: String,
    /// chrono format string for output and log timestamps
    pub timestamp_format: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            video_preset: "veryfast".to_string(),
            video_crf: 20,
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
            output_marker: "processed".to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl EncodeSettings {
    /// Format a timestamp with `timestamp_format`, falling back to the default
    /// format when the configured one is not a valid strftime string.
    pub fn format_timestamp(&self, at: &NaiveDateTime) -> String {
        let valid = !StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error));
        if valid {
            at.format(&self.timestamp_format).to_string()
        } else {
            at.format(DEFAULT_TIMESTAMP_FORMAT).to_string()
        }
    }
}

/// Where the transcoder comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Executable file name
    pub binary_name: String,
    /// Bundled payload copied out on first run (default: `<app-base>/assets/ffmpeg/<name>`)
    pub payload_path: Option<PathBuf>,
    /// Writable directory the payload is extracted to (default: `<temp>/VPT_FFMPEG`)
    pub extract_dir: Option<PathBuf>,
    /// Fall back to a transcoder found in PATH when the payload is absent
    pub search_system_path: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        let binary_name = if cfg!(target_os = "windows") {
            "ffmpeg.exe"
        } else {
            "ffmpeg"
        };
        Self {
            binary_name: binary_name.to_string(),
            payload_path: None,
            extract_dir: None,
            search_system_path: false,
        }
    }
}

/// Execution log placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Application base directory; logs go to `<base>/logs` (default: executable directory)
    pub base_dir: Option<PathBuf>,
    /// Log file name prefix
    pub prefix: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            base_dir: None,
            prefix: "VPT".to_string(),
        }
    }
}

impl LogSettings {
    /// Directory the execution logs are written to.
    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.clone().unwrap_or_else(app_base_dir).join("logs")
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub encode: EncodeSettings,
    pub tool: ToolSettings,
    pub logging: LogSettings,
}

impl AppConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("VPT");
            p.push("config.json");
            p
        })
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load from the default location, falling back to defaults when missing or unreadable
    pub fn load_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Save to the default location
    pub fn save_default(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save(&path)
    }
}

/// Directory of the running executable, or the working directory if unknown.
pub fn app_base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
