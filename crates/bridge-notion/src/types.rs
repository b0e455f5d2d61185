//! Notion entity types
//!
//! Only the fields this bridge consumes are modeled; everything else a page
//! or block carries rides along in the flattened payload map.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A Notion page as returned by search and retrieve.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Page id. Search results have been observed without one, so the
    /// absence must survive deserialization and be reportable.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Page {
    /// Plain-text title of the page.
    ///
    /// Scans the property map for the value typed `"title"` and concatenates
    /// its rich-text spans. Falls back to `"Untitled"` when no property
    /// yields non-blank text, so the result is never empty.
    pub fn title(&self) -> String {
        for value in self.properties.values() {
            if value.get("type").and_then(Value::as_str) != Some("title") {
                continue;
            }
            let title = value
                .get("title")
                .and_then(Value::as_array)
                .map(|spans| collect_plain_text(spans))
                .unwrap_or_default();
            let title = title.trim();
            if !title.is_empty() {
                return title.to_string();
            }
        }
        "Untitled".to_string()
    }
}

/// A single block from a page's child listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub block_type: Option<String>,
    #[serde(default)]
    pub has_children: bool,
    /// Remaining fields, including the type-specific payload keyed by the
    /// block's own type tag.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Block {
    /// Visible text of this block: the rich-text spans of its type-specific
    /// payload concatenated in order with no separator, trimmed. Blocks
    /// without a payload or without rich text yield an empty string.
    pub fn plain_text(&self) -> String {
        let text = self
            .block_type
            .as_deref()
            .and_then(|tag| self.payload.get(tag))
            .and_then(|payload| payload.get("rich_text"))
            .and_then(Value::as_array)
            .map(|spans| collect_plain_text(spans))
            .unwrap_or_default();
        text.trim().to_string()
    }
}

/// One page of a block-children listing.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockChildren {
    #[serde(default)]
    pub results: Vec<Block>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Search response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<Page>,
}

/// Concatenate the `plain_text` of a rich-text span array, no separator.
fn collect_plain_text(spans: &[Value]) -> String {
    spans
        .iter()
        .filter_map(|span| span.get("plain_text").and_then(Value::as_str))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(value: Value) -> Page {
        serde_json::from_value(value).unwrap()
    }

    fn block(value: Value) -> Block {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_title_from_title_property() {
        let page = page(json!({
            "id": "p1",
            "properties": {
                "Status": {"type": "select", "select": {"name": "Done"}},
                "Name": {
                    "type": "title",
                    "title": [
                        {"plain_text": "Resume "},
                        {"plain_text": "2023"}
                    ]
                }
            }
        }));
        // Spans concatenate with no separator, then trim.
        assert_eq!(page.title(), "Resume 2023");
    }

    #[test]
    fn test_title_falls_back_to_untitled() {
        let empty = page(json!({"id": "p1", "properties": {}}));
        assert_eq!(empty.title(), "Untitled");

        let blank = page(json!({
            "id": "p2",
            "properties": {
                "Name": {"type": "title", "title": [{"plain_text": "   "}]}
            }
        }));
        assert_eq!(blank.title(), "Untitled");
    }

    #[test]
    fn test_title_ignores_non_object_properties() {
        let page = page(json!({
            "id": "p1",
            "properties": {
                "weird": "just a string",
                "Name": {"type": "title", "title": [{"plain_text": "Notes"}]}
            }
        }));
        assert_eq!(page.title(), "Notes");
    }

    #[test]
    fn test_block_plain_text_follows_type_tag() {
        let block = block(json!({
            "id": "b1",
            "type": "paragraph",
            "has_children": false,
            "paragraph": {
                "rich_text": [
                    {"plain_text": "Hello, "},
                    {"plain_text": "world"}
                ]
            },
            "heading_1": {
                "rich_text": [{"plain_text": "ignored"}]
            }
        }));
        assert_eq!(block.plain_text(), "Hello, world");
    }

    #[test]
    fn test_block_plain_text_empty_cases() {
        // No type tag at all.
        let untyped = block(json!({"id": "b1"}));
        assert_eq!(untyped.plain_text(), "");

        // Type tag without a matching payload.
        let divider = block(json!({"id": "b2", "type": "divider", "divider": {}}));
        assert_eq!(divider.plain_text(), "");

        // Whitespace-only rich text trims to empty.
        let blank = block(json!({
            "id": "b3",
            "type": "paragraph",
            "paragraph": {"rich_text": [{"plain_text": "  \n "}]}
        }));
        assert_eq!(blank.plain_text(), "");
    }

    #[test]
    fn test_block_children_defaults() {
        let page: BlockChildren = serde_json::from_value(json!({
            "results": [{"id": "b1", "type": "paragraph", "paragraph": {"rich_text": []}}]
        }))
        .unwrap();
        assert_eq!(page.results.len(), 1);
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }
}
