//! MCP request dispatch
//!
//! One `BridgeServer` handles every JSON-RPC request regardless of which
//! transport carried it in. Tool failures come back as successful responses
//! with `isError: true` in the tool-result payload; protocol-level mistakes
//! (bad params, unknown method) come back as JSON-RPC error responses.

use crate::protocol::{RpcError, RpcRequest, RpcResponse};
use crate::tool_registry::ToolRegistry;
use crate::{PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Behavioral contract pushed to the connected agent during initialize.
const INSTRUCTIONS: &str =
    "You are a dialogue assistant with STRICT mandatory MCP tool usage. \
     On EVERY user turn, call import_mcp_context first using the user's utterance, then answer. \
     For any Notion-related intent (notion/page/document/notes/read/summarize), \
     you MUST call one of these tools before answering: import_mcp_context, study_notion_notes, \
     read_notion_page, get_notion_page, list_notion_blocks. \
     Never claim you cannot access notes unless tool call fails. \
     你是对话助手，必须严格使用 MCP 工具。每一轮对话先调用 import_mcp_context（传用户原话）再回答。";

pub struct BridgeServer {
    registry: ToolRegistry,
}

impl BridgeServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub async fn handle_request(&self, request: RpcRequest) -> RpcResponse {
        debug!(method = %request.method, "handling request");
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "initialized" | "notifications/initialized" => {
                RpcResponse::success(request.id, json!({}))
            }
            "ping" => RpcResponse::success(request.id, json!({})),
            "tools/list" => RpcResponse::success(
                request.id,
                json!({ "tools": self.registry.catalog() }),
            ),
            "tools/call" => self.handle_tool_call(request).await,
            other => {
                warn!(method = %other, "unknown method");
                RpcResponse::error(request.id, RpcError::method_not_found(other))
            }
        }
    }

    fn handle_initialize(&self, request: RpcRequest) -> RpcResponse {
        info!(tools = self.registry.len(), "initialize");
        RpcResponse::success(
            request.id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": { "listChanged": false }
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION,
                },
                "instructions": INSTRUCTIONS,
            }),
        )
    }

    async fn handle_tool_call(&self, request: RpcRequest) -> RpcResponse {
        let params = match request.params {
            Some(params) => params,
            None => {
                return RpcResponse::error(
                    request.id,
                    RpcError::invalid_params("missing params"),
                )
            }
        };
        let name = match params.get("name").and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => {
                return RpcResponse::error(
                    request.id,
                    RpcError::invalid_params("missing tool name"),
                )
            }
        };
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        let tool = match self.registry.get(&name) {
            Some(tool) => tool,
            None => {
                warn!(tool = %name, "unknown tool");
                return RpcResponse::success(
                    request.id,
                    tool_result(format!("Error: Unknown tool: {}", name), true),
                );
            }
        };

        info!(tool = %name, "tool call");
        match tool.execute(arguments).await {
            Ok(value) => {
                let text = serde_json::to_string_pretty(&value)
                    .unwrap_or_else(|_| value.to_string());
                RpcResponse::success(request.id, tool_result(text, false))
            }
            Err(err) => {
                warn!(tool = %name, error = %err, "tool call failed");
                RpcResponse::success(request.id, tool_result(format!("Error: {}", err), true))
            }
        }
    }
}

/// MCP tool-result envelope: a single text content item plus error flag.
fn tool_result(text: String, is_error: bool) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error,
    })
}
