//! NOUGHTS Core - Tic-tac-toe rules and a perfect-play engine
//!
//! This crate provides:
//! - Board representation and the eight win lines
//! - Terminal-state evaluation with depth-adjusted scoring
//! - Exhaustive minimax search, with and without alpha-beta pruning
//! - Game sessions that pair a human with the engine
//! - Exhaustive verification of the engine over the whole game tree

pub mod board;
pub mod eval;
pub mod ai;
pub mod game;
pub mod explore;
pub mod players;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Cell, Side, WinLine, CELLS, LINE_NAMES, WIN_LINES};
pub use eval::{evaluate, outcome, terminal_score, Outcome, WIN_SCORE};
pub use ai::{choose_move, score_moves, search, Analysis, Engine, Move, SearchMode, SearchStats};
pub use game::{Game, GameConfig, Placement, Turn};
pub use explore::{check_never_loses, check_pruning_equivalence, reachable_positions, side_to_move};
pub use explore::{EquivalenceReport, PlayReport};
pub use players::RandomMover;
pub use error::{GameError, ParseBoardError, VerifyError};
