//! WebSocket Transport
//!
//! Outbound WebSocket transport: connects to a remote agent endpoint and
//! serves MCP over that single connection. The direction is reversed from
//! the usual server arrangement - the agent platform listens, we dial.

use super::{McpHandler, Transport};
use crate::protocol::{RpcError, RpcRequest, RpcResponse};
use anyhow::{Context, Result};
use bridge_core::Error;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, error, info, warn};

/// WebSocket transport dialing out to a fixed endpoint
pub struct WebSocketTransport {
    endpoint: String,
}

impl WebSocketTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait::async_trait]
impl Transport for WebSocketTransport {
    async fn serve<H: McpHandler + 'static>(&self, handler: Arc<H>) -> Result<()> {
        info!(endpoint = %redact_endpoint(&self.endpoint), "Connecting to agent endpoint");

        let (stream, _) = connect_async(self.endpoint.as_str())
            .await
            .map_err(|e| Error::connection(format!("WebSocket connect failed: {}", e)))?;
        info!("WebSocket connected");

        let (mut sink, mut source) = stream.split();

        while let Some(message) = source.next().await {
            let message =
                message.map_err(|e| Error::connection(format!("WebSocket read failed: {}", e)))?;
            match message {
                Message::Text(text) => {
                    debug!(request = %text, "Received request");

                    let response = match serde_json::from_str::<RpcRequest>(&text) {
                        Ok(request) => {
                            if request.is_notification() {
                                handler.handle_request(request).await;
                                debug!("Notification handled, no reply");
                                continue;
                            }
                            handler.handle_request(request).await
                        }
                        Err(e) => {
                            error!(error = %e, "Parse error");
                            RpcResponse::error(None, RpcError::parse_error(e.to_string()))
                        }
                    };

                    let response_json = serde_json::to_string(&response)?;
                    debug!(response = %response_json, "Sending response");
                    sink.send(Message::Text(response_json))
                        .await
                        .context("WebSocket send failed")?;
                }
                Message::Ping(payload) => {
                    sink.send(Message::Pong(payload))
                        .await
                        .context("WebSocket pong failed")?;
                }
                Message::Close(frame) => {
                    info!(?frame, "Server closed connection");
                    break;
                }
                other => {
                    warn!(?other, "Ignoring non-text message");
                }
            }
        }

        info!("WebSocket transport shutting down");
        Ok(())
    }
}

/// Endpoint URLs embed access tokens; log scheme and host only.
fn redact_endpoint(endpoint: &str) -> String {
    match endpoint.split_once('?') {
        Some((base, _)) => format!("{}?...", base),
        None => endpoint.to_string(),
    }
}
