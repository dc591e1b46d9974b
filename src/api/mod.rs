//! Remote collection API client.

pub mod client;
pub mod types;

pub use client::BandcampApi;
pub use types::{SearchItemsResponse, Tralbum};
