//! tictac-server - HTTP and WebSocket server for the tictac coordinator
//!
//! Holds the single authoritative copy of every lobby and relays validated
//! moves between the two players of each one. Clients keep one WebSocket
//! open and speak the JSON protocol in [`ws::protocol`]; a small REST
//! surface covers health, the lobby directory, and the single-player move
//! search.

mod dispatch;
mod error;
pub mod http;
mod router;
mod state;
pub mod ws;

use std::sync::Arc;

use tokio::net::TcpListener;

pub use dispatch::{Delivery, GameDispatcher};
pub use error::ServerError;
pub use http::create_router;
pub use router::Broadcaster;
pub use state::AppState;

/// The main tictac server
pub struct TictacServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl TictacServer {
    /// Create a new server with default state
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            state: Arc::new(AppState::new()),
        }
    }

    /// Create a server with custom state (for testing)
    pub fn with_state(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the shared application state
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Run the server, binding to the configured address
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.clone(),
                source: e,
            })?;

        tracing::info!("tictac server listening on {}", addr);
        self.run_with_listener(listener).await
    }

    /// Run on an already-bound listener (lets tests use an ephemeral port)
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        let router = create_router(self.state);
        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfig with the specified host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the socket address string (e.g., "0.0.0.0:3000")
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
