//! Outbound fan-out to connected clients

use std::collections::HashMap;

use tictac_core::ConnectionId;
use tokio::sync::{RwLock, mpsc};
use tracing::debug;

use crate::dispatch::Delivery;
use crate::ws::protocol::ServerMessage;

/// Sending half of one client's outbound queue.
pub type OutboundSender = mpsc::UnboundedSender<ServerMessage>;

/// Routes addressed messages onto per-connection queues.
///
/// Each socket task registers its queue on accept and drains it from its own
/// loop, which keeps that task the only writer to its socket. Queueing never
/// blocks: a peer that went away has dropped its receiver, the send fails,
/// and unregistration cleans up right after.
#[derive(Debug, Default)]
pub struct Broadcaster {
    connections: RwLock<HashMap<ConnectionId, OutboundSender>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, conn: ConnectionId, sender: OutboundSender) {
        self.connections.write().await.insert(conn, sender);
    }

    pub async fn unregister(&self, conn: ConnectionId) {
        self.connections.write().await.remove(&conn);
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Queue every delivery onto its target's outbound channel.
    pub async fn deliver(&self, deliveries: Vec<Delivery>) {
        if deliveries.is_empty() {
            return;
        }
        let connections = self.connections.read().await;
        for Delivery { to, message } in deliveries {
            match connections.get(&to) {
                Some(sender) => {
                    if sender.send(message).is_err() {
                        debug!(%to, "dropping message for closing connection");
                    }
                }
                None => debug!(%to, "dropping message for unknown connection"),
            }
        }
    }
}
