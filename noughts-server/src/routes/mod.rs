//! HTTP route handlers

pub mod board;
pub mod engine;
pub mod game;
pub mod status;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use noughts_core::{GameError, ParseBoardError};

/// Error body returned by every handler: `{ "error": "..." }`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unknown game: {0}")]
    UnknownGame(String),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("bad board: {0}")]
    Board(#[from] ParseBoardError),

    /// Position already decided, nothing to search
    #[error("position is already decided")]
    Decided,

    #[error("search task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownGame(_) => StatusCode::NOT_FOUND,
            ApiError::Game(_) | ApiError::Board(_) | ApiError::Decided => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Run engine work on the blocking pool so searches never stall the
/// async workers
pub(crate) async fn run_search<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_and_message() {
        let err = ApiError::from(GameError::Occupied(4));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "cell 4 is already taken");

        let err = ApiError::from(ParseBoardError::Length(2));
        assert_eq!(err.to_string(), "bad board: expected 9 cells, found 2");

        let err = ApiError::UnknownGame("g7".to_string());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "unknown game: g7");
    }

    #[tokio::test]
    async fn test_run_search_passes_errors_through() {
        let ok = run_search(|| Ok(3)).await.unwrap();
        assert_eq!(ok, 3);

        let err = run_search::<(), _>(|| Err(ApiError::Decided)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
