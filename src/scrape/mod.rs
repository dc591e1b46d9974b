//! Embedded page-data extraction.
//!
//! Download pages embed their state as a JSON payload inside a single
//! `data-blob` attribute. Only that one attribute of one tag is needed, so
//! extraction is a forward streaming scan instead of a DOM parse.

pub mod pagedata;

pub use pagedata::{extract_page_data, DigitalItem, DownloadLink, PageData, PageDataScanner};
