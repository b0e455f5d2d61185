//! Transport Layer
//!
//! Provides two transport implementations:
//! - Stdio (standard input/output, for local MCP clients)
//! - WebSocket (outbound client connection to an agent endpoint)

mod stdio;
mod websocket;

pub use stdio::StdioTransport;
pub use websocket::WebSocketTransport;

use anyhow::Result;
use std::sync::Arc;

/// Generic MCP server trait for transport layer
#[async_trait::async_trait]
pub trait McpHandler: Send + Sync {
    async fn handle_request(&self, request: crate::protocol::RpcRequest) -> crate::protocol::RpcResponse;
}

/// Transport trait - implement for new transport types
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Serve requests using this transport until the peer disconnects
    async fn serve<H: McpHandler + 'static>(&self, handler: Arc<H>) -> Result<()>;
}

#[async_trait::async_trait]
impl McpHandler for crate::server::BridgeServer {
    async fn handle_request(&self, request: crate::protocol::RpcRequest) -> crate::protocol::RpcResponse {
        self.handle_request(request).await
    }
}
