//! Settings validation logic.
//!
//! Validation runs once at startup; an incompletely configured settings
//! file refuses the whole run rather than starting a partial sync.

use crate::config::loader::Settings;
use crate::error::{Error, Result};

/// Validate the entire settings value before synchronization starts.
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_identity(&settings.identity)?;
    validate_music_path(settings)?;
    Ok(())
}

/// Validate the identity token.
pub fn validate_identity(identity: &str) -> Result<()> {
    if identity.trim().is_empty() {
        return Err(Error::MissingConfig(
            "identity (copy the 'identity' cookie from your browser into the settings file)"
                .to_string(),
        ));
    }

    let lower = identity.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_token") {
        return Err(Error::ConfigValidation {
            field: "identity".to_string(),
            message: "Identity token appears to be a placeholder. Please provide your actual cookie value."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate the music output path.
pub fn validate_music_path(settings: &Settings) -> Result<()> {
    if settings.music_path.as_os_str().is_empty() {
        return Err(Error::MissingConfig(
            "music_path (directory downloads are placed under)".to_string(),
        ));
    }

    Ok(())
}
