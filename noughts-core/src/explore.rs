//! Exhaustive exploration of the game tree
//!
//! The whole of tic-tac-toe is small enough to check outright: every
//! position reachable from the empty board, and every line of play the human
//! can choose against the engine.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::ai::{search, Engine, SearchMode};
use crate::board::{Board, Side};
use crate::error::VerifyError;
use crate::eval::{outcome, Outcome};

/// Side due to move when turns alternate starting with `first`
pub fn side_to_move(board: &Board, first: Side) -> Side {
    if board.count(first) > board.count(first.opponent()) {
        first.opponent()
    } else {
        first
    }
}

/// Every position reachable from the empty board with `first` opening,
/// decided ones included, in breadth-first order. Play stops at a decided
/// position.
pub fn reachable_positions(first: Side) -> Vec<Board> {
    let mut seen = FxHashSet::default();
    let mut positions = Vec::new();
    let mut queue = VecDeque::new();

    seen.insert(Board::empty());
    queue.push_back(Board::empty());

    while let Some(board) = queue.pop_front() {
        positions.push(board);
        if outcome(&board).is_terminal() {
            continue;
        }
        let side = side_to_move(&board, first);
        for index in board.empty_cells() {
            let mut child = board;
            child.place(index, side);
            if seen.insert(child) {
                queue.push_back(child);
            }
        }
    }

    positions
}

/// Totals from comparing the two search variants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalenceReport {
    /// Open positions searched (each with both sides to move)
    pub positions: usize,
    pub minimax_nodes: u64,
    pub alpha_beta_nodes: u64,
}

/// Check that alpha-beta and plain minimax pick the same move with the same
/// score on every open position reachable with `first` opening, for either
/// side to move.
pub fn check_pruning_equivalence(first: Side) -> Result<EquivalenceReport, VerifyError> {
    let mut report = EquivalenceReport::default();

    for board in reachable_positions(first) {
        if outcome(&board).is_terminal() {
            continue;
        }
        report.positions += 1;

        for to_move in [Side::Human, Side::Computer] {
            let mut buffer = board;
            let plain = search(&mut buffer, to_move, SearchMode::Minimax);
            let pruned = search(&mut buffer, to_move, SearchMode::AlphaBeta);

            report.minimax_nodes += plain.map_or(0, |a| a.stats.nodes);
            report.alpha_beta_nodes += pruned.map_or(0, |a| a.stats.nodes);

            let plain = plain.map(|a| a.best);
            let pruned = pruned.map(|a| a.best);
            if plain.is_none() || plain != pruned || buffer != board {
                return Err(VerifyError::Mismatch {
                    board,
                    to_move,
                    plain,
                    pruned,
                });
            }
        }
    }

    tracing::info!(
        first = %first,
        positions = report.positions,
        minimax_nodes = report.minimax_nodes,
        alpha_beta_nodes = report.alpha_beta_nodes,
        "pruning equivalence holds"
    );

    Ok(report)
}

/// Finished games from [`check_never_loses`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayReport {
    pub games: usize,
    pub computer_wins: usize,
    pub draws: usize,
}

/// Play the engine against every possible sequence of human moves.
///
/// Fails with the move list of the first game the computer loses.
pub fn check_never_loses(
    computer_first: bool,
    mode: SearchMode,
) -> Result<PlayReport, VerifyError> {
    let engine = Engine::new(mode);
    let mut report = PlayReport::default();
    let mut moves = Vec::new();
    let to_move = if computer_first { Side::Computer } else { Side::Human };

    explore_games(&engine, Board::empty(), to_move, &mut moves, &mut report)?;

    tracing::info!(
        computer_first,
        games = report.games,
        computer_wins = report.computer_wins,
        draws = report.draws,
        "computer never loses"
    );

    Ok(report)
}

fn explore_games(
    engine: &Engine,
    board: Board,
    to_move: Side,
    moves: &mut Vec<usize>,
    report: &mut PlayReport,
) -> Result<(), VerifyError> {
    match outcome(&board) {
        Outcome::Win { side: Side::Human, .. } => {
            return Err(VerifyError::Loss {
                moves: moves.clone(),
            });
        }
        Outcome::Win { .. } => {
            report.games += 1;
            report.computer_wins += 1;
            return Ok(());
        }
        Outcome::Draw => {
            report.games += 1;
            report.draws += 1;
            return Ok(());
        }
        Outcome::NoResult => {}
    }

    match to_move {
        Side::Computer => {
            if let Some(mv) = engine.best_move(&board, Side::Computer) {
                let mut child = board;
                child.place(mv.index, Side::Computer);
                moves.push(mv.index);
                explore_games(engine, child, Side::Human, moves, report)?;
                moves.pop();
            }
        }
        Side::Human => {
            for index in board.empty_cells() {
                let mut child = board;
                child.place(index, Side::Human);
                moves.push(index);
                explore_games(engine, child, Side::Computer, moves, report)?;
                moves.pop();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_to_move() {
        let b: Board = "X........".parse().unwrap();
        assert_eq!(side_to_move(&b, Side::Human), Side::Computer);
        assert_eq!(side_to_move(&Board::empty(), Side::Computer), Side::Computer);
        let b: Board = "XO.......".parse().unwrap();
        assert_eq!(side_to_move(&b, Side::Human), Side::Human);
    }

    #[test]
    fn test_reachable_position_count() {
        let positions = reachable_positions(Side::Human);
        assert_eq!(positions.len(), 5478);
        assert_eq!(positions[0], Board::empty());

        let decided = positions
            .iter()
            .filter(|b| outcome(b).is_terminal())
            .count();
        assert_eq!(decided, 958);
    }

    #[test]
    fn test_openers_mirror_each_other() {
        assert_eq!(
            reachable_positions(Side::Computer).len(),
            reachable_positions(Side::Human).len()
        );
    }
}
