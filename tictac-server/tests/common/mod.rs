//! Shared test utilities for tictac-server integration tests

pub mod client;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use tictac_server::{AppState, ServerConfig, TictacServer};

/// Boots a server on an ephemeral port, returns its state and address
#[allow(dead_code)]
pub async fn spawn_test_server() -> (Arc<AppState>, SocketAddr) {
    let state = Arc::new(AppState::new());
    let server = TictacServer::with_state(ServerConfig::default(), Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = server.run_with_listener(listener).await;
    });

    // Brief delay to ensure the server is accepting connections
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    (state, addr)
}
