//! Block pagination and text flattening

use crate::service::DocumentService;
use crate::types::Block;
use bridge_core::Result;
use tracing::debug;

/// Fetch every direct child block of a page, following the pagination
/// cursor until the service reports no further pages. Fetch order is
/// preserved. Children of children are never fetched.
pub async fn fetch_all_blocks(
    service: &dyn DocumentService,
    page_id: &str,
) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = service.list_block_children(page_id, cursor.as_deref()).await?;
        blocks.extend(page.results);
        if !page.has_more {
            break;
        }
        cursor = page.next_cursor;
    }

    debug!(page_id = %page_id, count = blocks.len(), "Fetched blocks");
    Ok(blocks)
}

/// Flatten blocks to plain text: one line per block with visible text,
/// in sequence order. Blocks whose text is empty after trimming are
/// dropped entirely, not kept as blank lines.
pub fn flatten_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::plain_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
