//! Source folder path helpers: `~` expansion and validation.

use super::error::{Result, UploadError};
use std::path::{Path, PathBuf};

/// Replace a leading `~` with the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

pub fn canonicalize_scan_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Check that `path` exists, is a directory and can be listed.
pub fn validate_scan_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(UploadError::NotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(UploadError::NotADirectory(path.to_path_buf()));
    }
    std::fs::read_dir(path)?;
    Ok(())
}

/// Expand, validate and canonicalize a configured source folder.
pub fn resolve_source_folder(raw: &Path) -> Result<PathBuf> {
    let expanded = expand_home(raw);
    validate_scan_path(&expanded)?;
    Ok(canonicalize_scan_path(&expanded))
}
