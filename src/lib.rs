//! Bandcamp Collection Sync - incremental collection downloads.
//!
//! This library synchronizes the purchases in a Bandcamp collection to
//! local storage.
//!
//! # Features
//!
//! - Incremental sync driven by a durable downloaded-set
//! - Embedded page-data extraction via a single-pass streaming scan
//! - Streamed file downloads with progress reporting
//! - Album bundle unpacking
//! - Per-item failure isolation with an end-of-run summary
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use bandcamp_sync::{BandcampApi, Settings, SyncOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let path = Path::new("settings.json");
//!     let mut settings = Settings::load(path)?;
//!     let api = BandcampApi::new(settings.identity.clone())?;
//!
//!     let report =
//!         bandcamp_sync::sync_collection(&api, &mut settings, path, &SyncOptions::default())
//!             .await?;
//!     println!("{} item(s) downloaded", report.downloaded);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;
pub mod scrape;
pub mod sync;

// Re-exports for convenience
pub use api::BandcampApi;
pub use config::{AudioFormat, Settings};
pub use error::{Error, Result};
pub use scrape::{extract_page_data, PageData};
pub use sync::{sync_collection, SyncOptions, SyncReport};
