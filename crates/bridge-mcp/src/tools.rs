//! Notion tools
//!
//! Two behaviors under many names: a page read (title + flattened text)
//! exposed under several alias tools, and a block listing for debugging.
//! The alias names and their bilingual trigger-word descriptions are opaque
//! catalog metadata aimed at the upstream agent's tool-selection heuristic;
//! they are preserved as data, nothing here parses them.

use crate::tool_registry::{Tool, ToolRegistry};
use async_trait::async_trait;
use bridge_core::{Error, Result};
use bridge_notion::blocks::{fetch_all_blocks, flatten_blocks};
use bridge_notion::search::search_page_by_text;
use bridge_notion::DocumentService;
use serde_json::{json, Value};
use std::sync::Arc;

/// Page-read alias tools: identical behavior, distinct invocation names.
pub const PAGE_READ_TOOLS: &[(&str, &str)] = &[
    (
        "get_notion_page",
        "读取 Notion 页面内容（标题+正文纯文本）/ Read Notion page content (title + plain text). \
         触发词 Trigger words: Notion, 页面, page, 笔记, 文档, 读取内容, summarize page. \
         参数支持 page_id 或 query/keyword/utterance（自动搜索页面）/ Supports page_id or query/keyword/utterance.",
    ),
    (
        "read_notion_page",
        "get_notion_page 的语义别名（同功能）/ Semantic alias of get_notion_page. \
         触发词 Trigger words: 读取Notion页面, read notion page, 查看页面内容, page content.",
    ),
    (
        "study_notion_notes",
        "按自然语言学习意图读取相关 Notion 笔记 / Read relevant Notion notes from natural-language intent. \
         示例 Example: '我要复习 Pinterest 的简历笔记'.",
    ),
    (
        "import_mcp_context",
        "每轮对话先调用本工具导入 Notion 上下文 / MUST be called first each turn to import Notion context. \
         请传 utterance（用户原话）/ Pass utterance (raw user message).",
    ),
    (
        "read_page_content",
        "read_notion_page 的别名（同功能）/ Alias of read_notion_page (same behavior). \
         触发词 Trigger words: 读页面, 读取文档, summarize notion doc.",
    ),
    (
        "summarize_notion_page",
        "先读取页面内容再供模型总结 / Read page content first for downstream summarization. \
         触发词 Trigger words: 总结页面, summarize, extract key points.",
    ),
];

pub const LIST_BLOCKS_TOOL: (&str, &str) = (
    "list_notion_blocks",
    "列出 Notion 页面 block 结构用于调试 / List Notion block structure for debugging. \
     触发词 Trigger words: block, 结构, 调试, 类型, why empty.",
);

/// Shared input descriptor: an object with optional string reference fields,
/// at least one required, nothing else permitted.
pub fn page_reference_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "page_id": {"type": "string"},
            "query": {"type": "string"},
            "keyword": {"type": "string"},
            "utterance": {"type": "string"},
        },
        "anyOf": [
            {"required": ["page_id"]},
            {"required": ["query"]},
            {"required": ["keyword"]},
            {"required": ["utterance"]},
        ],
        "additionalProperties": false,
    })
}

/// Resolve the tool arguments to `(page_id, matched_title)`.
///
/// An explicit non-blank `page_id` is authoritative and skips search.
/// Otherwise the first non-blank of `query`, `keyword`, `utterance` (in that
/// order) is resolved through the fuzzy search; its matched title is carried
/// back for caller transparency.
pub async fn resolve_page(
    service: &dyn DocumentService,
    arguments: &Value,
) -> Result<(String, Option<String>)> {
    if let Some(page_id) = arguments.get("page_id").and_then(Value::as_str) {
        let page_id = page_id.trim();
        if !page_id.is_empty() {
            return Ok((page_id.to_string(), None));
        }
    }

    for key in ["query", "keyword", "utterance"] {
        if let Some(text) = arguments.get(key).and_then(Value::as_str) {
            let text = text.trim();
            if !text.is_empty() {
                let (page_id, matched_title) = search_page_by_text(service, text).await?;
                return Ok((page_id, Some(matched_title)));
            }
        }
    }

    Err(Error::invalid_argument("Please provide page_id or query/keyword"))
}

/// Page read under an alias name: resolve, paginate, flatten, fetch title.
pub struct PageReadTool {
    name: &'static str,
    description: &'static str,
    service: Arc<dyn DocumentService>,
}

#[async_trait]
impl Tool for PageReadTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn input_schema(&self) -> Value {
        page_reference_schema()
    }

    async fn execute(&self, arguments: Value) -> Result<Value> {
        let (page_id, matched_title) = resolve_page(self.service.as_ref(), &arguments).await?;
        let blocks = fetch_all_blocks(self.service.as_ref(), &page_id).await?;
        let page = self.service.retrieve_page(&page_id).await?;

        let mut result = json!({
            "page_id": page_id,
            "title": page.title(),
            "content": flatten_blocks(&blocks),
        });
        if let Some(title) = matched_title {
            result["matched_by_query_title"] = Value::String(title);
        }
        Ok(result)
    }
}

/// Debug-friendly structural dump of a page's blocks.
///
/// Unlike the flattened-content path, this enumerates every fetched block,
/// empty text included, so "why is my page empty" is answerable.
pub struct ListBlocksTool {
    service: Arc<dyn DocumentService>,
}

#[async_trait]
impl Tool for ListBlocksTool {
    fn name(&self) -> &str {
        LIST_BLOCKS_TOOL.0
    }

    fn description(&self) -> &str {
        LIST_BLOCKS_TOOL.1
    }

    fn input_schema(&self) -> Value {
        page_reference_schema()
    }

    async fn execute(&self, arguments: Value) -> Result<Value> {
        let (page_id, matched_title) = resolve_page(self.service.as_ref(), &arguments).await?;
        let blocks = fetch_all_blocks(self.service.as_ref(), &page_id).await?;

        let result_blocks: Vec<Value> = blocks
            .iter()
            .enumerate()
            .map(|(index, block)| {
                json!({
                    "index": index,
                    "id": block.id,
                    "type": block.block_type,
                    "has_children": block.has_children,
                    "text": block.plain_text(),
                })
            })
            .collect();

        Ok(json!({
            "page_id": page_id,
            "matched_by_query_title": matched_title,
            "count": result_blocks.len(),
            "blocks": result_blocks,
        }))
    }
}

/// Register the full tool set against one shared document service handle.
pub fn build_registry(service: Arc<dyn DocumentService>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for &(name, description) in PAGE_READ_TOOLS {
        registry.register(Arc::new(PageReadTool {
            name,
            description,
            service: service.clone(),
        }));
    }
    registry.register(Arc::new(ListBlocksTool { service }));
    registry
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use bridge_notion::types::{Block, BlockChildren, Page};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory document service with per-operation call counters.
    pub struct FakeNotion {
        pub pages: Vec<Page>,
        pub blocks: Vec<Block>,
        pub search_calls: AtomicUsize,
        pub retrieve_calls: AtomicUsize,
        pub children_calls: AtomicUsize,
    }

    impl FakeNotion {
        pub fn new(pages: Vec<Page>, blocks: Vec<Block>) -> Self {
            Self {
                pages,
                blocks,
                search_calls: AtomicUsize::new(0),
                retrieve_calls: AtomicUsize::new(0),
                children_calls: AtomicUsize::new(0),
            }
        }

        pub fn external_calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
                + self.retrieve_calls.load(Ordering::SeqCst)
                + self.children_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentService for FakeNotion {
        async fn search_pages(&self, _query: &str) -> Result<Vec<Page>> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.pages.clone())
        }

        async fn retrieve_page(&self, page_id: &str) -> Result<Page> {
            self.retrieve_calls.fetch_add(1, Ordering::SeqCst);
            self.pages
                .iter()
                .find(|p| p.id.as_deref() == Some(page_id))
                .cloned()
                .ok_or_else(|| Error::upstream(format!("HTTP 404: no page {}", page_id)))
        }

        async fn list_block_children(
            &self,
            _block_id: &str,
            _cursor: Option<&str>,
        ) -> Result<BlockChildren> {
            self.children_calls.fetch_add(1, Ordering::SeqCst);
            Ok(BlockChildren {
                results: self.blocks.clone(),
                has_more: false,
                next_cursor: None,
            })
        }
    }

    pub fn titled_page(id: &str, title: &str) -> Page {
        serde_json::from_value(json!({
            "id": id,
            "properties": {
                "Name": {"type": "title", "title": [{"plain_text": title}]}
            }
        }))
        .unwrap()
    }

    pub fn text_block(id: &str, text: &str) -> Block {
        serde_json::from_value(json!({
            "id": id,
            "type": "paragraph",
            "paragraph": {"rich_text": [{"plain_text": text}]}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_explicit_id_skips_search() {
        let fake = FakeNotion::new(vec![], vec![]);
        let (id, matched) = resolve_page(&fake, &json!({"page_id": " abc "})).await.unwrap();
        assert_eq!(id, "abc");
        assert!(matched.is_none());
        assert_eq!(fake.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_query_uses_one_search_call() {
        let fake = FakeNotion::new(
            vec![
                titled_page("p1", "Meeting Notes"),
                titled_page("p2", "Resume 2023"),
                titled_page("p3", "Resume Archive"),
            ],
            vec![],
        );
        let (id, matched) = resolve_page(&fake, &json!({"query": "my resume notes"}))
            .await
            .unwrap();
        assert_eq!(fake.search_calls.load(Ordering::SeqCst), 1);
        // The resume bonus outweighs the token hit on "Meeting Notes".
        assert_eq!(id, "p2");
        assert_eq!(matched.as_deref(), Some("Resume 2023"));
    }

    #[tokio::test]
    async fn test_resolve_field_priority() {
        let fake = FakeNotion::new(vec![titled_page("p1", "Alpha")], vec![]);
        // Blank query falls through to keyword.
        let (id, _) = resolve_page(&fake, &json!({"query": "  ", "keyword": "alpha"}))
            .await
            .unwrap();
        assert_eq!(id, "p1");
    }

    #[tokio::test]
    async fn test_resolve_without_reference_is_invalid_argument() {
        let fake = FakeNotion::new(vec![], vec![]);
        let err = resolve_page(&fake, &json!({})).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(fake.external_calls(), 0);
    }

    #[tokio::test]
    async fn test_page_read_shape_with_explicit_id() {
        let fake = Arc::new(FakeNotion::new(
            vec![titled_page("p1", "Resume 2023")],
            vec![
                text_block("b1", "first line"),
                text_block("b2", "  "),
                text_block("b3", "second line"),
            ],
        ));
        let tool = PageReadTool {
            name: "get_notion_page",
            description: "",
            service: fake.clone(),
        };

        let result = tool.execute(json!({"page_id": "p1"})).await.unwrap();
        assert_eq!(result["page_id"], "p1");
        assert_eq!(result["title"], "Resume 2023");
        assert_eq!(result["content"], "first line\nsecond line");
        // No search happened, so no matched title key at all.
        assert!(result.get("matched_by_query_title").is_none());
        assert_eq!(fake.retrieve_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_page_read_carries_matched_title_after_search() {
        let fake = Arc::new(FakeNotion::new(
            vec![titled_page("p1", "Resume 2023")],
            vec![text_block("b1", "hello")],
        ));
        let tool = PageReadTool {
            name: "study_notion_notes",
            description: "",
            service: fake,
        };

        let result = tool.execute(json!({"utterance": "复习简历"})).await.unwrap();
        assert_eq!(result["matched_by_query_title"], "Resume 2023");
    }

    #[tokio::test]
    async fn test_list_blocks_keeps_empty_blocks() {
        let fake = Arc::new(FakeNotion::new(
            vec![titled_page("p1", "Anything")],
            vec![
                text_block("b1", "visible"),
                serde_json::from_value(json!({"id": "b2", "type": "divider", "divider": {}}))
                    .unwrap(),
            ],
        ));
        let tool = ListBlocksTool { service: fake };

        let result = tool.execute(json!({"page_id": "p1"})).await.unwrap();
        assert_eq!(result["count"], 2);
        assert_eq!(result["matched_by_query_title"], Value::Null);
        let blocks = result["blocks"].as_array().unwrap();
        assert_eq!(blocks[0]["index"], 0);
        assert_eq!(blocks[0]["text"], "visible");
        assert_eq!(blocks[1]["index"], 1);
        assert_eq!(blocks[1]["type"], "divider");
        // The debug listing keeps blocks the flattener would drop.
        assert_eq!(blocks[1]["text"], "");
    }

    #[test]
    fn test_registry_holds_all_aliases() {
        let fake = Arc::new(FakeNotion::new(vec![], vec![]));
        let registry = build_registry(fake);
        assert_eq!(registry.len(), PAGE_READ_TOOLS.len() + 1);
        for (name, _) in PAGE_READ_TOOLS {
            assert!(registry.contains(name));
        }
        assert!(registry.contains("list_notion_blocks"));
    }

    #[test]
    fn test_schema_requires_at_least_one_field() {
        let schema = page_reference_schema();
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["anyOf"].as_array().unwrap().len(), 4);
    }
}
