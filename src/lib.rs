//! VPT
//!
//! Compiles a set of toggled video transforms (rotation, flips, volume, mute,
//! stereo-to-mono) into a single FFmpeg invocation and supervises its execution.

pub mod config;
pub mod error;
pub mod formats;
pub mod options;
pub mod render;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{ConfigError, OptionError, RenderError};
pub use options::{Group, OptionSnapshot, OptionState, OptionTag};
pub use render::{CommandPlan, Compiler, RenderRequest, RenderResult, Supervisor};
