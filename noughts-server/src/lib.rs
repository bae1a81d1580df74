//! NOUGHTS Server - HTTP API for a browser front end
//!
//! This crate provides the web backend:
//! - Game sessions (start, move, reset, hint)
//! - Stateless engine queries (best move, evaluation)
//! - Board geometry for rendering
//! - Optional static file serving for the page itself

mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;

use noughts_core::SearchMode;

pub use state::{ServerState, DEFAULT_MAX_SESSIONS};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory with the browser page, if any
    pub static_dir: Option<String>,
    pub mode: SearchMode,
    /// Live sessions kept before the oldest are evicted
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8002,
            static_dir: None,
            mode: SearchMode::AlphaBeta,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let router = Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Board geometry
        .route("/api/board", get(routes::board::get_board))
        // Game API
        .route("/api/game/start", post(routes::game::start_game))
        .route(
            "/api/game/{id}",
            get(routes::game::get_game).delete(routes::game::delete_game),
        )
        .route("/api/game/{id}/move", post(routes::game::make_player_move))
        .route("/api/game/{id}/reset", post(routes::game::reset_game))
        .route("/api/game/{id}/hint", get(routes::game::get_hint))
        // Engine API
        .route("/api/engine/best-move", post(routes::engine::best_move))
        .route("/api/engine/evaluate", post(routes::engine::evaluate_board))
        // Shared state
        .with_state(state);

    // Static file serving (must be last)
    match &config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new(config.mode).with_max_sessions(config.max_sessions));
    let router = create_router(&config, state);

    tracing::info!("NOUGHTS server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Engine: {:?}", config.mode);
    tracing::info!("Session cap: {}", config.max_sessions);
    if let Some(dir) = &config.static_dir {
        tracing::info!("Static files served from: {}", dir);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
