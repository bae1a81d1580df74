//! Stateless engine endpoints

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use noughts_core::{evaluate, Board, Engine, Move, Outcome, SearchMode, SearchStats, Side};

use super::{run_search, ApiError};
use crate::state::ServerState;

fn default_side() -> Side {
    Side::Computer
}

#[derive(Deserialize)]
pub struct BestMoveRequest {
    pub board: String,
    #[serde(default = "default_side")]
    pub side: Side,
    /// Falls back to the server's engine
    pub mode: Option<SearchMode>,
}

#[derive(Serialize)]
pub struct BestMoveResponse {
    pub index: usize,
    pub score: i32,
    pub mode: SearchMode,
    pub stats: SearchStats,
}

/// Best move for a posted position
pub async fn best_move(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<BestMoveRequest>,
) -> Result<Json<BestMoveResponse>, ApiError> {
    let board: Board = req.board.parse()?;
    let engine = Engine::new(req.mode.unwrap_or(state.mode));
    let side = req.side;
    let analysis = run_search(move || engine.analyze(&board, side).ok_or(ApiError::Decided)).await?;

    let Move { index, score } = analysis.best;
    Ok(Json(BestMoveResponse {
        index,
        score,
        mode: analysis.mode,
        stats: analysis.stats,
    }))
}

#[derive(Deserialize)]
pub struct EvaluateRequest {
    pub board: String,
    pub side: Side,
}

/// Terminal verdict for a posted position
pub async fn evaluate_board(Json(req): Json<EvaluateRequest>) -> Result<Json<Outcome>, ApiError> {
    let board: Board = req.board.parse()?;
    Ok(Json(evaluate(&board, req.side)))
}
