//! Output path construction.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Path of a downloaded artifact under the music directory.
pub fn artifact_path(music_dir: &Path, name: &str, extension: &str) -> PathBuf {
    music_dir.join(format!("{}.{}", name, extension))
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
