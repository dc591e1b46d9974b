//! Archive unpacking for album bundles.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Unpack a fetched file if it is an album archive.
///
/// Detection is by filename extension, not content. Zip files are
/// expanded into a directory named after the sanitized title, and the
/// archive is deleted only once every entry has been written and closed.
/// Non-archive files are left in place as the final artifact.
pub fn maybe_extract(file: &Path, music_dir: &Path, title: &str) -> Result<Option<PathBuf>> {
    let is_archive = file
        .extension()
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);
    if !is_archive {
        return Ok(None);
    }

    let archive_file = fs::File::open(file)?;
    let mut archive = zip::ZipArchive::new(archive_file)
        .map_err(|e| Error::Extract(format!("Failed to read archive {}: {}", file.display(), e)))?;

    // The directory must exist before any entry is written.
    let dest_dir = music_dir.join(title);
    match fs::create_dir(&dest_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
        Err(e) => return Err(Error::Io(e)),
    }

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| {
            Error::Extract(format!("Failed to read entry in {}: {}", file.display(), e))
        })?;

        let entry_path = match entry.enclosed_name() {
            Some(path) => dest_dir.join(path),
            None => {
                tracing::warn!("Skipping entry with unsafe path: {}", entry.name());
                continue;
            }
        };

        if entry.is_dir() {
            fs::create_dir_all(&entry_path)?;
            continue;
        }

        if let Some(parent) = entry_path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::debug!("Extracting {}", entry_path.display());
        let mut outfile = fs::File::create(&entry_path)?;
        std::io::copy(&mut entry, &mut outfile)?;
    }

    // All entries written and closed; the archive can go.
    drop(archive);
    fs::remove_file(file)?;

    Ok(Some(dest_dir))
}
