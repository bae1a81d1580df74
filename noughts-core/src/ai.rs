//! Exhaustive game-tree search
//!
//! Scores are computer-positive: the computer maximises, the human
//! minimises. Both variants walk one board buffer depth-first, placing a mark,
//! recursing, and clearing the mark again before the next candidate is tried.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Side, CELLS};
use crate::eval::terminal_score;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Initial alpha/beta bound, well outside the +/-10 score range
pub const SCORE_BOUND: i32 = 1000;

// ============================================================================
// TYPES
// ============================================================================

/// Which search drives the engine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Minimax with alpha-beta pruning
    #[default]
    AlphaBeta,
    /// Plain minimax, the reference the pruned search must agree with
    Minimax,
}

/// A candidate cell and its score
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub index: usize,
    pub score: i32,
}

/// Node counters collected during one search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Positions visited, root included
    pub nodes: u64,
    /// Early returns taken by alpha-beta
    pub cutoffs: u64,
}

/// Result of a top-level search
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub best: Move,
    pub mode: SearchMode,
    pub stats: SearchStats,
}

/// Node value and the child it came from (`None` at terminal nodes)
#[derive(Clone, Copy, Debug)]
struct Scored {
    score: i32,
    index: Option<usize>,
}

// ============================================================================
// SEARCH
// ============================================================================

struct Searcher<'a> {
    board: &'a mut Board,
    stats: SearchStats,
}

impl<'a> Searcher<'a> {
    fn new(board: &'a mut Board) -> Self {
        Self {
            board,
            stats: SearchStats::default(),
        }
    }

    /// Full-window search of the current position with the chosen variant
    fn run(&mut self, mode: SearchMode, to_move: Side, depth: i32) -> Scored {
        match mode {
            SearchMode::AlphaBeta => self.alpha_beta(to_move, depth, -SCORE_BOUND, SCORE_BOUND),
            SearchMode::Minimax => self.minimax(to_move, depth),
        }
    }

    fn minimax(&mut self, to_move: Side, depth: i32) -> Scored {
        self.stats.nodes += 1;
        if let Some(score) = terminal_score(self.board, depth) {
            return Scored { score, index: None };
        }

        let maximizing = to_move == Side::Computer;
        let mut best = worst_for(maximizing);

        for index in 0..CELLS {
            if !self.board.is_empty_at(index) {
                continue;
            }
            self.board.place(index, to_move);
            let child = self.minimax(to_move.opponent(), depth + 1);
            self.board.clear(index);

            if improves(maximizing, child.score, best.score) {
                best = Scored {
                    score: child.score,
                    index: Some(index),
                };
            }
        }

        best
    }

    fn alpha_beta(&mut self, to_move: Side, depth: i32, mut alpha: i32, mut beta: i32) -> Scored {
        self.stats.nodes += 1;
        if let Some(score) = terminal_score(self.board, depth) {
            return Scored { score, index: None };
        }

        let maximizing = to_move == Side::Computer;
        let mut best = worst_for(maximizing);

        for index in 0..CELLS {
            if !self.board.is_empty_at(index) {
                continue;
            }
            self.board.place(index, to_move);
            let child = self.alpha_beta(to_move.opponent(), depth + 1, alpha, beta);
            self.board.clear(index);

            if improves(maximizing, child.score, best.score) {
                best = Scored {
                    score: child.score,
                    index: Some(index),
                };
            }

            if maximizing {
                // The minimiser above already has something at least this good
                if child.score >= beta {
                    self.stats.cutoffs += 1;
                    return best;
                }
                alpha = alpha.max(child.score);
            } else {
                if child.score <= alpha {
                    self.stats.cutoffs += 1;
                    return best;
                }
                beta = beta.min(child.score);
            }
        }

        best
    }
}

fn worst_for(maximizing: bool) -> Scored {
    Scored {
        score: if maximizing { -SCORE_BOUND } else { SCORE_BOUND },
        index: None,
    }
}

/// Strict comparison keeps the earliest index among equal scores
fn improves(maximizing: bool, candidate: i32, current: i32) -> bool {
    if maximizing {
        candidate > current
    } else {
        candidate < current
    }
}

/// Search `board` for `to_move` starting at depth 0.
///
/// The board is used as the search buffer and is back in its original state
/// when this returns. Returns `None` if the position is already decided.
pub fn search(board: &mut Board, to_move: Side, mode: SearchMode) -> Option<Analysis> {
    if terminal_score(board, 0).is_some() {
        return None;
    }

    let mut searcher = Searcher::new(board);
    let root = searcher.run(mode, to_move, 0);
    let stats = searcher.stats;

    let analysis = Analysis {
        best: Move {
            index: root.index?,
            score: root.score,
        },
        mode,
        stats,
    };

    tracing::debug!(
        board = %board,
        side = %to_move,
        index = analysis.best.index,
        score = analysis.best.score,
        nodes = stats.nodes,
        cutoffs = stats.cutoffs,
        "search finished"
    );

    Some(analysis)
}

/// Best cell for `to_move` using alpha-beta. `None` on a decided board.
pub fn choose_move(board: &mut Board, to_move: Side) -> Option<usize> {
    search(board, to_move, SearchMode::AlphaBeta).map(|a| a.best.index)
}

/// Exact value of every legal move for `to_move`, in index order
pub fn score_moves(board: &Board, to_move: Side, mode: SearchMode) -> Vec<Move> {
    if terminal_score(board, 0).is_some() {
        return Vec::new();
    }

    let mut buffer = *board;
    let mut moves = Vec::new();
    for index in board.empty_cells() {
        buffer.place(index, to_move);
        let child = Searcher::new(&mut buffer).run(mode, to_move.opponent(), 1);
        buffer.clear(index);
        moves.push(Move {
            index,
            score: child.score,
        });
    }
    moves
}

// ============================================================================
// ENGINE
// ============================================================================

/// Move picker used by game sessions
#[derive(Clone, Copy, Debug, Default)]
pub struct Engine {
    pub mode: SearchMode,
}

impl Engine {
    pub fn new(mode: SearchMode) -> Self {
        Self { mode }
    }

    /// Best move for `to_move`; the caller's board is left untouched
    pub fn best_move(&self, board: &Board, to_move: Side) -> Option<Move> {
        self.analyze(board, to_move).map(|a| a.best)
    }

    /// Best move plus search statistics
    pub fn analyze(&self, board: &Board, to_move: Side) -> Option<Analysis> {
        let mut buffer = *board;
        search(&mut buffer, to_move, self.mode)
    }

    /// Let the engine play both sides until the game ends
    pub fn play_out(&self, initial: Board, to_move: Side) -> (Board, Vec<usize>) {
        let mut board = initial;
        let mut side = to_move;
        let mut history = Vec::new();

        while let Some(mv) = self.best_move(&board, side) {
            board.place(mv.index, side);
            history.push(mv.index);
            side = side.opponent();
        }

        (board, history)
    }
}

// ============================================================================
// TESTS
// ============================================================================
