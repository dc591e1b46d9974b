//! Filename generation from item titles.

use regex::Regex;

use crate::error::{Error, Result};

/// Sanitize an item title into a usable file or directory name.
///
/// Removes the characters `\ / : * ? < > "` outright, matching what the
/// provider's own apps do, and rejects names that sanitize down to
/// nothing or to a relative path component.
pub fn sanitize_title(title: &str) -> Result<String> {
    let forbidden = Regex::new(r#"[\\/:*?<>"]"#).unwrap();
    let sanitized = forbidden.replace_all(title, "").to_string();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(format!(
            "Title '{}' sanitizes to an empty name",
            title
        )));
    }

    // With separators stripped, only a bare dot component can still
    // escape the output directory.
    if sanitized == "." || sanitized == ".." {
        return Err(Error::InvalidFilename(format!(
            "Title '{}' sanitizes to a relative path component",
            title
        )));
    }

    Ok(sanitized)
}
