//! Game API endpoints
//!
//! A browser page starts a session, posts the cells the player clicks, and
//! renders the board and verdict that come back.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use noughts_core::{Board, Game, GameConfig, Move, Outcome, Placement, Side};

use super::{run_search, ApiError};
use crate::state::{lock_game, ServerState, SharedGame};

/// Snapshot of a session
#[derive(Serialize)]
pub struct GameView {
    pub id: String,
    pub board: Board,
    pub computer_first: bool,
    pub to_move: Option<Side>,
    pub outcome: Outcome,
    pub history: Vec<Placement>,
}

impl GameView {
    fn new(id: &str, game: &Game) -> Self {
        Self {
            id: id.to_string(),
            board: *game.board(),
            computer_first: game.config().computer_first,
            to_move: game.to_move(),
            outcome: game.outcome(),
            history: game.history().to_vec(),
        }
    }
}

#[derive(Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub computer_first: bool,
}

/// Look up a session or answer 404
fn find_game(state: &ServerState, id: &str) -> Result<SharedGame, ApiError> {
    state
        .game(id)
        .ok_or_else(|| ApiError::UnknownGame(id.to_string()))
}

/// Start a new game
pub async fn start_game(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<StartRequest>,
) -> Result<Json<GameView>, ApiError> {
    let mut config = GameConfig::default().with_mode(state.mode);
    if req.computer_first {
        config = config.computer_first();
    }

    // A computer opening searches the empty board
    let game = run_search(move || Ok(Game::new(config))).await?;
    let view_game = game.clone();
    let id = state.insert_game(game);

    tracing::info!(%id, computer_first = req.computer_first, "game started");
    Ok(Json(GameView::new(&id, &view_game)))
}

/// Get a game
pub async fn get_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let game = find_game(&state, &id)?;
    let game = lock_game(&game);
    Ok(Json(GameView::new(&id, &game)))
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub cell: usize,
}

#[derive(Serialize)]
pub struct MoveResponse {
    pub human: usize,
    pub computer: Option<usize>,
    pub outcome: Outcome,
    pub game: GameView,
}

/// Apply the player's move and answer with the computer's
pub async fn make_player_move(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let game = find_game(&state, &id)?;
    let cell = req.cell;
    let session = id.clone();

    let (turn, view) = run_search(move || {
        let mut game = lock_game(&game);
        let turn = game.play(cell).inspect_err(|e| {
            tracing::debug!(id = %session, cell, error = %e, "move rejected");
        })?;
        Ok((turn, GameView::new(&session, &game)))
    })
    .await?;

    if turn.outcome.is_terminal() {
        tracing::info!(%id, outcome = ?turn.outcome, "game over");
    }

    Ok(Json(MoveResponse {
        human: turn.human,
        computer: turn.computer,
        outcome: turn.outcome,
        game: view,
    }))
}

/// Restart a game with its original settings
pub async fn reset_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let game = find_game(&state, &id)?;
    let view = run_search(move || {
        let mut game = lock_game(&game);
        game.reset();
        Ok(GameView::new(&id, &game))
    })
    .await?;
    Ok(Json(view))
}

#[derive(Serialize)]
pub struct HintResponse {
    pub hint: Option<Move>,
}

/// Engine suggestion for the player
pub async fn get_hint(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<HintResponse>, ApiError> {
    let game = find_game(&state, &id)?;
    let hint = run_search(move || {
        let hint = lock_game(&game).hint();
        Ok(hint)
    })
    .await?;
    Ok(Json(HintResponse { hint }))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: bool,
}

/// End a session and free it
pub async fn delete_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.remove_game(&id) {
        return Err(ApiError::UnknownGame(id));
    }
    tracing::info!(%id, "game deleted");
    Ok(Json(DeleteResponse { id, deleted: true }))
}
