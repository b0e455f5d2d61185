//! Tool registry
//!
//! Fixed set of tools, registered once at startup and read-only afterwards.
//! Lookup by name happens before any external call is made, so an unknown
//! tool name never reaches the document service.

use async_trait::async_trait;
use bridge_core::Result;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A remotely callable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;
    async fn execute(&self, arguments: Value) -> Result<Value>;
}

pub type BoxedTool = Arc<dyn Tool>;

/// Name-keyed tool set, preserving registration order for the catalog.
#[derive(Default)]
pub struct ToolRegistry {
    order: Vec<BoxedTool>,
    by_name: HashMap<String, BoxedTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: BoxedTool) {
        self.by_name.insert(tool.name().to_string(), tool.clone());
        self.order.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<BoxedTool> {
        self.by_name.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Catalog entries for `tools/list`, in registration order.
    pub fn catalog(&self) -> Vec<Value> {
        self.order
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "inputSchema": tool.input_schema(),
                })
            })
            .collect()
    }
}
