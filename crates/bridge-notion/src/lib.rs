//! Notion document access for notion-bridge
//!
//! # Modules
//!
//! - `types`: pages, blocks, rich-text extraction
//! - `service`: the `DocumentService` seam over the external API
//! - `client`: the `reqwest`-backed Notion implementation
//! - `blocks`: cursor pagination and text flattening
//! - `search`: fuzzy title scoring for free-text page resolution

pub mod blocks;
pub mod client;
pub mod search;
pub mod service;
pub mod types;

// Re-exports
pub use client::NotionClient;
pub use service::DocumentService;
pub use types::{Block, BlockChildren, Page};
