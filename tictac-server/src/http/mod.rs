//! HTTP router assembly

mod api;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::AppState;
use crate::ws;

pub use api::{AiMoveRequest, AiMoveResponse, HealthResponse, LobbyListResponse};

/// Create the router with the WebSocket endpoint and REST routes configured.
///
/// CORS stays permissive: the browser UI is served from a different origin
/// than the coordinator.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/health", get(api::health))
        .route("/api/lobbies", get(api::list_lobbies))
        .route("/api/ai-move", post(api::ai_move))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
