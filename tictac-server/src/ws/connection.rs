//! WebSocket connection handling
//!
//! One task per socket. It owns both halves: inbound frames are decoded and
//! fed to the dispatcher, and the connection's own outbound queue is drained
//! back onto the socket, so the task stays the only writer. A close, graceful
//! or not, funnels into the same disconnect path LEAVE_LOBBY uses.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tictac_core::ConnectionId;

use crate::AppState;

use super::protocol::ClientMessage;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one WebSocket connection until it closes
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn = ConnectionId::new();
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
    state.broadcaster.register(conn, outbound_tx).await;

    info!(%conn, "client connected");

    loop {
        tokio::select! {
            frame = receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => handle_text(&state, conn, &text).await,
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(%conn, "socket closed");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {
                        // Binary and pong frames are ignored.
                    }
                    Some(Err(err)) => {
                        warn!(%conn, %err, "websocket error");
                        break;
                    }
                }
            }
            queued = outbound_rx.recv() => {
                match queued {
                    Some(message) => match serde_json::to_string(&message) {
                        Ok(json) => {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => warn!(%conn, %err, "failed to encode outbound message"),
                    },
                    None => break,
                }
            }
        }
    }

    state.broadcaster.unregister(conn).await;
    let deliveries = state.dispatcher.lock().await.handle_disconnect(conn);
    state.broadcaster.deliver(deliveries).await;

    info!(%conn, "client disconnected");
}

/// Decode one text frame and run it through the dispatcher.
///
/// Malformed frames are dropped with a warning; they never close the socket
/// or reach the game state.
async fn handle_text(state: &Arc<AppState>, conn: ConnectionId, text: &str) {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(err) => {
            warn!(%conn, %err, "dropping malformed message");
            return;
        }
    };

    let deliveries = state.dispatcher.lock().await.handle_message(conn, message);
    state.broadcaster.deliver(deliveries).await;
}
