//! bridge-mcp: Notion MCP bridge server
//!
//! Exposes Notion page reading as MCP tools and serves them either over
//! stdio (local MCP clients) or over an outbound WebSocket connection to an
//! agent platform endpoint.
//!
//! Architecture:
//! agent endpoint ← WebSocket ← MCP JSON-RPC ← tools → Notion REST API
//!
//! Methods:
//! - initialize → handshake with instructions
//! - ping → liveness
//! - tools/list → alias catalog
//! - tools/call → page read / block listing

pub mod protocol;
pub mod server;
pub mod supervisor;
pub mod tool_registry;
pub mod tools;
pub mod transport;

pub use protocol::{RpcError, RpcRequest, RpcResponse};
pub use server::BridgeServer;
pub use tool_registry::{Tool, ToolRegistry};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "NotionBridge";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
