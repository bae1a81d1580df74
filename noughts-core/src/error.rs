//! Error types

use crate::ai::Move;
use crate::board::{Board, Side};

/// Rejected game actions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("cell {0} is off the board (expected 0-8)")]
    OutOfRange(usize),

    #[error("cell {0} is already taken")]
    Occupied(usize),

    #[error("the game is over")]
    GameOver,
}

/// Board notation could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseBoardError {
    #[error("expected 9 cells, found {0}")]
    Length(usize),

    #[error("invalid cell symbol {0:?}")]
    InvalidChar(char),

    #[error("no win line {index} with cells {cells:?}")]
    UnknownLine { index: usize, cells: [usize; 3] },
}

/// Exhaustive verification found a counterexample
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error(
        "search variants disagree on {board} ({to_move} to move): \
         minimax {plain:?}, alpha-beta {pruned:?}"
    )]
    Mismatch {
        board: Board,
        to_move: Side,
        plain: Option<Move>,
        pruned: Option<Move>,
    },

    #[error("computer lost after moves {moves:?}")]
    Loss { moves: Vec<usize> },
}
