//! Document service seam
//!
//! The three Notion operations the bridge consumes, behind a trait so tool
//! and pagination logic can be exercised against in-memory fakes.

use crate::types::{BlockChildren, Page};
use async_trait::async_trait;
use bridge_core::Result;

/// Read-only access to the external document service.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Full-text search restricted to page objects, capped upstream.
    async fn search_pages(&self, query: &str) -> Result<Vec<Page>>;

    /// Fetch a page's metadata (for its title).
    async fn retrieve_page(&self, page_id: &str) -> Result<Page>;

    /// Fetch one page of a block's direct children.
    async fn list_block_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<BlockChildren>;
}
