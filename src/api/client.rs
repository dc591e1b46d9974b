//! Bandcamp API HTTP client.

use reqwest::{header, Client, Response};

use crate::api::types::*;
use crate::error::{Error, Result};

/// Bandcamp API base URL.
const API_BASE: &str = "https://bandcamp.com/api";

/// Bandcamp client carrying the identity token.
///
/// The identity cookie header is rebuilt on every request rather than kept
/// in a cookie store; whether the server would accept a session-scoped
/// cookie is unverified, so each call attaches the token fresh.
pub struct BandcampApi {
    client: Client,
    identity: String,
    api_base: String,
}

impl BandcampApi {
    /// Create a new API client.
    pub fn new(identity: String) -> Result<Self> {
        Self::with_base_url(identity, API_BASE.to_string())
    }

    /// Create a client against a non-default base URL.
    pub fn with_base_url(identity: String, api_base: String) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            identity,
            api_base,
        })
    }

    /// Cookie header value for an authenticated request.
    fn identity_cookie(&self) -> String {
        format!("identity={}", self.identity)
    }

    /// Make an authenticated GET request to an absolute URL.
    async fn authed_get(&self, url: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(header::COOKIE, self.identity_cookie())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Authentication(format!(
                "HTTP {}: {}",
                status,
                if body.is_empty() {
                    "Authentication failed"
                } else {
                    &body
                }
            )));
        }

        Ok(response)
    }

    /// Fetch the collection summary and return the fan id.
    pub async fn collection_summary(&self) -> Result<i64> {
        let url = format!("{}/fan/2/collection_summary", self.api_base);
        let response = self.authed_get(&url).await?;
        let text = response.text().await?;
        tracing::debug!("Collection summary response: {}", text);

        let summary: CollectionSummaryResponse = serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse collection summary: {} - Response: {}",
                e,
                &text[..text.len().min(500)]
            ))
        })?;

        Ok(summary.collection_summary.fan_id)
    }

    /// Search the fan's full collection.
    pub async fn search_collection(&self, fan_id: i64) -> Result<SearchItemsResponse> {
        let url = format!("{}/fancollection/1/search_items", self.api_base);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(header::COOKIE, self.identity_cookie())
            .json(&SearchItemsRequest::collection(fan_id))
            .send()
            .await?;

        let status = response.status();
        if status == 401 || status == 403 {
            return Err(Error::Authentication(format!(
                "HTTP {}: collection search rejected",
                status
            )));
        }

        let text = response.text().await?;
        tracing::debug!("Collection search response length: {} bytes", text.len());

        let collection: SearchItemsResponse = serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse collection search: {} - Response: {}",
                e,
                &text[..text.len().min(500)]
            ))
        })?;

        Ok(collection)
    }

    /// Fetch a redownload page for scraping.
    pub async fn fetch_page(&self, url: &str) -> Result<Response> {
        let response = self.authed_get(url).await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to fetch page {}: HTTP {}",
                url,
                response.status()
            )));
        }

        Ok(response)
    }

    /// Download a file from a URL, returning the streaming response.
    pub async fn download_file(&self, url: &str) -> Result<Response> {
        let response = self.authed_get(url).await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download file: HTTP {}",
                response.status()
            )));
        }

        Ok(response)
    }
}
