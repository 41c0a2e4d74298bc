//! Input formats offered by the file picker.

use std::path::Path;

/// Supported input file extensions.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &["mp4", "mov", "avi", "mkv", "webm", "wmv"]
}

/// Check if a file extension is supported for rendering.
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_input_extensions().iter().any(|e| *e == ext_lower)
}

/// Check a path's extension against the supported list.
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(is_supported_extension)
}
