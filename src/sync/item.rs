//! Collection item model and transaction join.

use std::fmt;

use crate::api::types::SearchItemsResponse;
use crate::error::{Error, Result};

/// Kind of a purchased item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Album,
    Track,
}

impl ItemKind {
    /// Parse the kind string the server reports for a transaction.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "a" | "album" => Ok(ItemKind::Album),
            "t" | "track" => Ok(ItemKind::Track),
            other => Err(Error::Api(format!("Unknown item kind: {}", other))),
        }
    }

    /// Canonical kind name used in item keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Album => "album",
            ItemKind::Track => "track",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One purchased item with its resolved redownload URL.
#[derive(Debug, Clone)]
pub struct CollectionItem {
    pub item_id: i64,
    pub kind: ItemKind,
    pub redownload_url: String,
}

impl CollectionItem {
    /// Idempotency key recorded in the downloaded set.
    ///
    /// Stable across runs; once present the item is never re-fetched.
    pub fn item_key(&self) -> String {
        format!("{}{}", self.kind.as_str(), self.item_id)
    }
}

/// Result of joining transactions with the redownload URL map.
#[derive(Debug)]
pub struct JoinedCollection {
    /// Items with a resolved URL, in the server's reported order.
    pub items: Vec<CollectionItem>,

    /// Item keys whose transaction had no redownload URL entry.
    pub unmatched: Vec<String>,
}

/// Join the purchased transactions with the redownload URL map.
///
/// The join key is `<sale_item_type><sale_item_id>`, which is not the
/// item key; the two identifier spaces only meet here. An unknown kind
/// string fails the whole join, since every later stage depends on it.
pub fn join_collection(collection: &SearchItemsResponse) -> Result<JoinedCollection> {
    let mut items = Vec::with_capacity(collection.tralbums.len());
    let mut unmatched = Vec::new();

    for tralbum in &collection.tralbums {
        let kind = ItemKind::parse(&tralbum.tralbum_type)?;
        let item = CollectionItem {
            item_id: tralbum.item_id,
            kind,
            redownload_url: String::new(),
        };

        match collection.redownload_urls.get(&tralbum.redownload_key()) {
            Some(url) => items.push(CollectionItem {
                redownload_url: url.clone(),
                ..item
            }),
            None => {
                tracing::warn!(
                    "No redownload URL for {} (sale key {})",
                    item.item_key(),
                    tralbum.redownload_key()
                );
                unmatched.push(item.item_key());
            }
        }
    }

    Ok(JoinedCollection { items, unmatched })
}
