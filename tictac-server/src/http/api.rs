//! REST API handlers

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tictac_core::{Board, LobbySummary, Mark, best_move};

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Status of the server
    pub status: String,
    /// Server version
    pub version: String,
    /// Seconds since server started
    pub uptime_seconds: i64,
    /// Number of live lobbies
    pub active_lobbies: usize,
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        active_lobbies: state.lobby_count().await,
    })
}

/// Response for listing lobbies; same projection as the GET_LOBBIES reply
#[derive(Debug, Serialize, Deserialize)]
pub struct LobbyListResponse {
    pub sessions: Vec<LobbySummary>,
}

/// List open lobbies and their occupancy
pub async fn list_lobbies(State(state): State<Arc<AppState>>) -> Json<LobbyListResponse> {
    let sessions = state.dispatcher.lock().await.summaries();
    Json(LobbyListResponse { sessions })
}

/// Request for a single-player move suggestion
#[derive(Debug, Serialize, Deserialize)]
pub struct AiMoveRequest {
    pub board: Board,
    pub mark: Mark,
}

/// The cell the computer opponent plays
#[derive(Debug, Serialize, Deserialize)]
pub struct AiMoveResponse {
    pub row: usize,
    pub col: usize,
}

/// Compute the move the computer opponent would play.
///
/// 422 when the position is already decided, so a client that kept playing
/// past the end hears about it instead of getting a junk move.
pub async fn ai_move(
    Json(request): Json<AiMoveRequest>,
) -> Result<Json<AiMoveResponse>, StatusCode> {
    match best_move(&request.board, request.mark) {
        Some((row, col)) => Ok(Json(AiMoveResponse { row, col })),
        None => Err(StatusCode::UNPROCESSABLE_ENTITY),
    }
}
