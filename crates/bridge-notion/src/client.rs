//! Notion HTTP client
//!
//! Thin `reqwest` wrapper over the three API operations the bridge uses.
//! Every failure is reported as an upstream error on that one call; nothing
//! here retries.

use crate::service::DocumentService;
use crate::types::{BlockChildren, Page, SearchResults};
use async_trait::async_trait;
use bridge_core::{Error, Result};
use serde_json::json;
use tracing::debug;

/// Notion REST API base URL.
pub const NOTION_API_BASE: &str = "https://api.notion.com/v1";

/// Notion API version header value.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Page size cap for block-children pagination.
pub const BLOCK_PAGE_SIZE: usize = 100;

/// Maximum search results considered by the resolver.
pub const SEARCH_PAGE_LIMIT: usize = 10;

/// Authenticated Notion API client.
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
}

impl NotionClient {
    /// Build a client with the integration token baked into default headers.
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base_url(token, NOTION_API_BASE)
    }

    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {}", token)
                .parse()
                .map_err(|_| Error::config("Invalid NOTION_TOKEN value"))?,
        );
        headers.insert(
            "Notion-Version",
            NOTION_VERSION
                .parse()
                .map_err(|_| Error::config("Invalid Notion-Version header"))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::upstream(format!("HTTP {}: {}", status, body)))
    }
}

#[async_trait]
impl DocumentService for NotionClient {
    async fn search_pages(&self, query: &str) -> Result<Vec<Page>> {
        debug!(query = %query, "Notion search");
        let body = json!({
            "query": query,
            "filter": {"value": "page", "property": "object"},
            "page_size": SEARCH_PAGE_LIMIT,
        });

        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::upstream(format!("search failed: {}", e)))?;

        let results: SearchResults = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::upstream(format!("invalid search response: {}", e)))?;
        Ok(results.results)
    }

    async fn retrieve_page(&self, page_id: &str) -> Result<Page> {
        debug!(page_id = %page_id, "Notion page retrieve");
        let response = self
            .http
            .get(format!("{}/pages/{}", self.base_url, page_id))
            .send()
            .await
            .map_err(|e| Error::upstream(format!("page retrieve failed: {}", e)))?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::upstream(format!("invalid page response: {}", e)))
    }

    async fn list_block_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<BlockChildren> {
        debug!(block_id = %block_id, cursor = ?cursor, "Notion block children");
        let mut query: Vec<(&str, String)> = vec![("page_size", BLOCK_PAGE_SIZE.to_string())];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor.to_string()));
        }

        let response = self
            .http
            .get(format!("{}/blocks/{}/children", self.base_url, block_id))
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::upstream(format!("block listing failed: {}", e)))?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::upstream(format!("invalid block listing response: {}", e)))
    }
}
