//! Terminal-state evaluation and scoring

use serde::{Deserialize, Serialize};

use crate::board::{Board, Side, WinLine, WIN_LINES};

/// Base value of a win; depth is subtracted so faster wins score higher
pub const WIN_SCORE: i32 = 10;

/// Verdict on a board for one side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    NoResult,
    Win { line: WinLine, side: Side },
    Draw,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::NoResult)
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Win { side, .. } => Some(*side),
            _ => None,
        }
    }
}

/// First line (rows, columns, diagonals) fully held by `side`
fn winning_line(board: &Board, side: Side) -> Option<WinLine> {
    WIN_LINES
        .iter()
        .find(|line| board.owns_line(line, side))
        .copied()
}

/// Evaluate `board` for `side`.
///
/// `Draw` needs a full board with no completed line for either side, so a
/// full board the opponent has won is `NoResult` for `side`.
pub fn evaluate(board: &Board, side: Side) -> Outcome {
    if let Some(line) = winning_line(board, side) {
        return Outcome::Win { line, side };
    }
    if board.is_full() && winning_line(board, side.opponent()).is_none() {
        return Outcome::Draw;
    }
    Outcome::NoResult
}

/// Evaluate for both sides, human first
pub fn outcome(board: &Board) -> Outcome {
    match evaluate(board, Side::Human) {
        Outcome::NoResult => evaluate(board, Side::Computer),
        verdict => verdict,
    }
}

/// Computer-positive score of a terminal board reached `depth` plies below
/// the search root, or `None` while play continues.
pub fn terminal_score(board: &Board, depth: i32) -> Option<i32> {
    match evaluate(board, Side::Human) {
        Outcome::Win { .. } => return Some(-WIN_SCORE + depth),
        Outcome::Draw => return Some(0),
        Outcome::NoResult => {}
    }
    match evaluate(board, Side::Computer) {
        Outcome::Win { .. } => Some(WIN_SCORE - depth),
        Outcome::Draw => Some(0),
        Outcome::NoResult => None,
    }
}
