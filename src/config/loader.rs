//! Settings structure and persistence.
//!
//! The settings file is the single source of truth for what has already
//! been synchronized: the `downloads` map holds one entry per completed
//! item key and is flushed back to disk after every successful item.

use crate::config::format::AudioFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Item keys that have been fully fetched and unpacked.
    #[serde(default)]
    pub downloads: BTreeMap<String, bool>,

    /// Target audio format for single-track downloads.
    pub format: AudioFormat,

    /// Identity token sent as the authentication cookie.
    pub identity: String,

    /// Directory new music is placed under.
    pub music_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            downloads: BTreeMap::new(),
            format: AudioFormat::default(),
            identity: String::new(),
            music_path: PathBuf::new(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Settings file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let settings: Settings = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Invalid settings file {}: {}", path.display(), e))
        })?;
        Ok(settings)
    }

    /// Load settings, writing a placeholder file first if none exists.
    ///
    /// The placeholder has an empty identity token and music path, so a
    /// fresh file always fails validation with instructions to fill it in.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            let placeholder = Settings::default();
            placeholder.save(path)?;
            tracing::info!("Created placeholder settings file: {}", path.display());
        }
        Self::load(path)
    }

    /// Save settings to a JSON file with readable formatting.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize settings: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check whether an item key has already been synchronized.
    pub fn is_downloaded(&self, item_key: &str) -> bool {
        self.downloads.get(item_key).copied().unwrap_or(false)
    }

    /// Record an item key as synchronized.
    pub fn mark_downloaded(&mut self, item_key: String) {
        self.downloads.insert(item_key, true);
    }
}
