//! API request and response type definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response from the collection summary endpoint.
#[derive(Debug, Deserialize)]
pub struct CollectionSummaryResponse {
    pub collection_summary: CollectionSummary,
}

/// Collection summary payload; only the fan id is consumed.
#[derive(Debug, Deserialize)]
pub struct CollectionSummary {
    pub fan_id: i64,
}

/// Body for the collection search endpoint.
#[derive(Debug, Serialize)]
pub struct SearchItemsRequest {
    pub fan_id: i64,
    pub search_key: String,
    pub search_type: String,
}

impl SearchItemsRequest {
    /// Request the fan's full collection.
    pub fn collection(fan_id: i64) -> Self {
        Self {
            fan_id,
            search_key: String::new(),
            search_type: "collection".to_string(),
        }
    }
}

/// Response from the collection search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchItemsResponse {
    /// Purchased transactions, in the server's reported order.
    #[serde(default)]
    pub tralbums: Vec<Tralbum>,

    /// Redownload URLs keyed by `<sale_item_type><sale_item_id>`.
    #[serde(default)]
    pub redownload_urls: HashMap<String, String>,
}

/// A purchased album or track transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct Tralbum {
    pub item_id: i64,
    pub tralbum_type: String,
    pub sale_item_type: String,
    pub sale_item_id: i64,
}

impl Tralbum {
    /// Key into the redownload URL map for this transaction.
    pub fn redownload_key(&self) -> String {
        format!("{}{}", self.sale_item_type, self.sale_item_id)
    }
}
