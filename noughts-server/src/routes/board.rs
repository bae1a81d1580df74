//! Board geometry endpoint

use axum::Json;
use serde::Serialize;

use noughts_core::board::SIDE_LEN;
use noughts_core::{CELLS, LINE_NAMES, WIN_LINES};

#[derive(Serialize)]
pub struct BoardInfo {
    pub cells: usize,
    pub rows: Vec<[usize; 3]>,
    pub lines: Vec<[usize; 3]>,
    pub line_names: Vec<&'static str>,
}

/// Cell indices grouped by row
fn rows() -> Vec<[usize; 3]> {
    (0..SIDE_LEN)
        .map(|r| [r * SIDE_LEN, r * SIDE_LEN + 1, r * SIDE_LEN + 2])
        .collect()
}

/// Get board geometry
pub async fn get_board() -> Json<BoardInfo> {
    Json(BoardInfo {
        cells: CELLS,
        rows: rows(),
        lines: WIN_LINES.iter().map(|l| l.cells).collect(),
        line_names: LINE_NAMES.to_vec(),
    })
}
