//! Transcoder binary resolution.
//!
//! The transcoder ships as a payload next to the application and is copied to a
//! writable directory on first use.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{app_base_dir, ToolSettings};
use crate::error::RenderError;

/// Locates, and extracts if needed, the transcoder executable.
#[derive(Debug, Clone)]
pub struct ToolLocator {
    payload: PathBuf,
    extract_dir: PathBuf,
    binary_name: String,
    search_system_path: bool,
}

impl ToolLocator {
    pub fn new(settings: &ToolSettings) -> Self {
        let payload = settings.payload_path.clone().unwrap_or_else(|| {
            app_base_dir()
                .join("assets")
                .join("ffmpeg")
                .join(&settings.binary_name)
        });
        let extract_dir = settings
            .extract_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("VPT_FFMPEG"));

        Self {
            payload,
            extract_dir,
            binary_name: settings.binary_name.clone(),
            search_system_path: settings.search_system_path,
        }
    }

    /// Where the extracted executable lives.
    pub fn extracted_path(&self) -> PathBuf {
        self.extract_dir.join(&self.binary_name)
    }

    pub fn payload_path(&self) -> &Path {
        &self.payload
    }

    /// Return a runnable transcoder path, extracting the payload on first use.
    pub fn resolve(&self) -> Result<PathBuf, RenderError> {
        let target = self.extracted_path();
        if target.is_file() {
            return Ok(target);
        }

        if self.payload.is_file() {
            self.extract(&target)?;
            log::info!("Extracted transcoder to {:?}", target);
            return Ok(target);
        }

        if self.search_system_path {
            if let Ok(path) = which::which(&self.binary_name) {
                log::info!("Using transcoder from PATH: {:?}", path);
                return Ok(path);
            }
        }

        Err(RenderError::ToolMissing(self.payload.clone()))
    }

    fn extract(&self, target: &Path) -> io::Result<()> {
        fs::create_dir_all(&self.extract_dir)?;
        // Copy under a temporary name so a half-written binary is never picked up.
        let partial = target.with_extension("partial");
        fs::copy(&self.payload, &partial)?;
        make_executable(&partial)?;
        fs::rename(&partial, target)
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(dir: &Path) -> ToolSettings {
        ToolSettings {
            binary_name: "fake-transcoder".to_string(),
            payload_path: Some(dir.join("payload").join("fake-transcoder")),
            extract_dir: Some(dir.join("extracted")),
            search_system_path: false,
        }
    }

    #[test]
    fn test_missing_payload_is_tool_missing() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ToolLocator::new(&settings(dir.path()));
        let err = locator.resolve().unwrap_err();
        assert!(matches!(err, RenderError::ToolMissing(_)));
    }

    #[test]
    fn test_extracts_payload_once() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let payload = settings.payload_path.clone().unwrap();
        fs::create_dir_all(payload.parent().unwrap()).unwrap();
        fs::write(&payload, b"v1").unwrap();

        let locator = ToolLocator::new(&settings);
        let resolved = locator.resolve().unwrap();
        assert_eq!(resolved, dir.path().join("extracted").join("fake-transcoder"));
        assert_eq!(fs::read(&resolved).unwrap(), b"v1");

        // Already extracted: the payload is not copied again.
        fs::write(&payload, b"v2").unwrap();
        let resolved = locator.resolve().unwrap();
        assert_eq!(fs::read(&resolved).unwrap(), b"v1");

        // Extracted copy survives without the payload.
        fs::remove_file(&payload).unwrap();
        assert!(locator.resolve().is_ok());
    }
}
