//! Status endpoint

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use noughts_core::SearchMode;

use crate::state::ServerState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub engine: SearchMode,
    pub games: usize,
    pub max_sessions: usize,
}

pub async fn status_handler(State(state): State<Arc<ServerState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        engine: state.mode,
        games: state.game_count(),
        max_sessions: state.max_sessions(),
    })
}
