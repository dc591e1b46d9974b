//! File system helpers.

pub mod naming;
pub mod paths;

pub use naming::sanitize_title;
pub use paths::{artifact_path, ensure_dir};
