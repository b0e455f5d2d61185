//! notion-bridge: Notion MCP bridge
//!
//! Serves Notion page-reading tools over MCP. Default mode dials out to an
//! agent platform endpoint over WebSocket and reconnects forever; `--stdio`
//! serves a single local session over stdin/stdout instead.
//!
//!   notion-bridge                                  # WebSocket, endpoint from env
//!   notion-bridge --endpoint wss://host/mcp/?...   # WebSocket, explicit endpoint
//!   notion-bridge --stdio                          # stdio, for local MCP clients

use anyhow::{Context, Result};
use bridge_core::config::{self, BridgeConfig, NOTION_TOKEN_VAR};
use bridge_mcp::server::BridgeServer;
use bridge_mcp::supervisor::ConnectionSupervisor;
use bridge_mcp::tools::build_registry;
use bridge_mcp::transport::{StdioTransport, Transport, WebSocketTransport};
use bridge_notion::client::NotionClient;
use chrono::Local;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "notion-bridge")]
#[command(about = "Notion MCP bridge server")]
struct Cli {
    /// Serve one session over stdin/stdout instead of dialing out
    #[arg(long)]
    stdio: bool,

    /// WebSocket endpoint override (otherwise XIAOZHI_WSS / MCP_ENDPOINT)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr to not interfere with stdio transport)
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    config::load_environment();
    log_local_context();

    let token = config::get_config_opt(NOTION_TOKEN_VAR)
        .context("Missing NOTION_TOKEN")?;

    if cli.stdio {
        let server = Arc::new(build_server(&token)?);
        info!("MCP server initialized");
        return StdioTransport::new().serve(server).await;
    }

    let endpoint = match cli.endpoint {
        Some(endpoint) => endpoint,
        None => {
            let config = BridgeConfig::from_env()?;
            config.endpoint
        }
    };

    let server = Arc::new(build_server(&token)?);
    info!("MCP server initialized");

    ConnectionSupervisor::new(WebSocketTransport::new(endpoint), server)
        .run()
        .await;
    Ok(())
}

fn build_server(token: &str) -> Result<BridgeServer> {
    let notion = Arc::new(NotionClient::new(token)?);
    Ok(BridgeServer::new(build_registry(notion)))
}

/// Startup fingerprint for remote debugging. Reports presence of
/// credentials, never their values.
fn log_local_context() {
    info!(
        local_time = %Local::now().format("%Y-%m-%d %H:%M:%S %Z"),
        platform = %format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
        has_notion_token = config::get_config_opt(NOTION_TOKEN_VAR).is_some(),
        has_endpoint = config::resolve_endpoint().is_some(),
        "local context"
    );
}
