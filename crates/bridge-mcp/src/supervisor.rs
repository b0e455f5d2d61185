//! Connection supervisor
//!
//! Keeps the outbound WebSocket session alive indefinitely. Failed
//! connections back off exponentially up to a ceiling; a session that ends
//! cleanly (server-initiated close) resets the backoff and reconnects at
//! once, since a clean close is routine session cycling rather than an
//! outage signal.

use crate::server::BridgeServer;
use crate::transport::{Transport, WebSocketTransport};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const INITIAL_RECONNECT_DELAY: Duration = Duration::from_secs(1);
pub const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(60);

/// Next backoff step: doubled, capped.
pub fn next_delay(delay: Duration) -> Duration {
    (delay * 2).min(MAX_RECONNECT_DELAY)
}

pub struct ConnectionSupervisor {
    transport: WebSocketTransport,
    server: Arc<BridgeServer>,
}

impl ConnectionSupervisor {
    pub fn new(transport: WebSocketTransport, server: Arc<BridgeServer>) -> Self {
        Self { transport, server }
    }

    /// Run sessions forever. Never returns under normal operation.
    pub async fn run(&self) {
        let mut delay = INITIAL_RECONNECT_DELAY;
        loop {
            match self.transport.serve(self.server.clone()).await {
                Ok(()) => {
                    info!("Session ended cleanly, reconnecting");
                    delay = INITIAL_RECONNECT_DELAY;
                }
                Err(err) => {
                    warn!(error = %err, delay_secs = delay.as_secs(), "Session failed, backing off");
                    tokio::time::sleep(delay).await;
                    delay = next_delay(delay);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_to_ceiling() {
        let mut delay = INITIAL_RECONNECT_DELAY;
        let mut observed = Vec::new();
        for _ in 0..8 {
            observed.push(delay.as_secs());
            delay = next_delay(delay);
        }
        assert_eq!(observed, vec![1, 2, 4, 8, 16, 32, 60, 60]);
    }

    #[test]
    fn test_backoff_never_exceeds_ceiling() {
        assert_eq!(next_delay(MAX_RECONNECT_DELAY), MAX_RECONNECT_DELAY);
        assert_eq!(next_delay(Duration::from_secs(59)), MAX_RECONNECT_DELAY);
    }
}
