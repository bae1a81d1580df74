//! Whole-tree properties of the evaluator and the search engine

use noughts_core::{
    check_never_loses, check_pruning_equivalence, choose_move, evaluate, outcome,
    reachable_positions, search, side_to_move, Board, Cell, Game, GameConfig, GameError, Outcome,
    SearchMode, Side, WIN_LINES,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// All 512 ways to fill the board with the two marks
fn full_boards() -> impl Iterator<Item = Board> {
    (0u16..512).map(|bits| {
        let mut board = Board::empty();
        for i in 0..9 {
            let side = if bits & (1 << i) != 0 {
                Side::Human
            } else {
                Side::Computer
            };
            board.place(i, side);
        }
        board
    })
}

fn lines_held(board: &Board, side: Side) -> Vec<usize> {
    WIN_LINES
        .iter()
        .filter(|line| board.owns_line(line, side))
        .map(|line| line.index)
        .collect()
}

// ============================================================================
// EVALUATOR
// ============================================================================

#[test]
fn test_win_reports_exact_line() {
    for side in [Side::Human, Side::Computer] {
        for line in WIN_LINES {
            let mut board = Board::empty();
            for &i in &line.cells {
                board.place(i, side);
            }
            // A stray opposing mark off the line changes nothing
            let stray = (0..9).find(|i| !line.cells.contains(i)).unwrap();
            board.place(stray, side.opponent());

            assert_eq!(evaluate(&board, side), Outcome::Win { line, side });
            assert_eq!(evaluate(&board, side.opponent()), Outcome::NoResult);
        }
    }
}

#[test]
fn test_full_boards_without_lines_are_draws() {
    let mut draws = 0;
    for board in full_boards() {
        let human = lines_held(&board, Side::Human);
        let computer = lines_held(&board, Side::Computer);
        if human.is_empty() && computer.is_empty() {
            draws += 1;
            assert_eq!(evaluate(&board, Side::Human), Outcome::Draw);
            assert_eq!(evaluate(&board, Side::Computer), Outcome::Draw);
        } else if computer.is_empty() {
            assert_eq!(evaluate(&board, Side::Computer), Outcome::NoResult);
            match evaluate(&board, Side::Human) {
                Outcome::Win { line, side } => {
                    assert_eq!(side, Side::Human);
                    assert_eq!(line.index, human[0]);
                }
                other => panic!("{} should be a human win, got {:?}", board, other),
            }
        }
    }
    assert!(draws > 0);
}

#[test]
fn test_evaluator_is_idempotent() {
    for board in reachable_positions(Side::Human) {
        for side in [Side::Human, Side::Computer] {
            let first = evaluate(&board, side);
            let second = evaluate(&board, side);
            assert_eq!(first, second);
        }
    }
}

// ============================================================================
// SEARCH ENGINE
// ============================================================================

#[test]
fn test_pruning_equivalent_human_first() {
    let report = check_pruning_equivalence(Side::Human).unwrap();
    assert_eq!(report.positions, 4520);
    assert!(report.alpha_beta_nodes < report.minimax_nodes);
}

#[test]
fn test_pruning_equivalent_computer_first() {
    let report = check_pruning_equivalence(Side::Computer).unwrap();
    assert_eq!(report.positions, 4520);
}

#[test]
fn test_choose_move_is_non_destructive() {
    for board in reachable_positions(Side::Human) {
        if outcome(&board).is_terminal() {
            continue;
        }
        let mut buffer = board;
        let to_move = side_to_move(&board, Side::Human);
        let index = choose_move(&mut buffer, to_move).unwrap();
        assert_eq!(buffer, board);
        assert_eq!(board.get(index), Cell::Empty);
    }
}

#[test]
fn test_computer_never_loses_moving_second() {
    for mode in [SearchMode::AlphaBeta, SearchMode::Minimax] {
        let report = check_never_loses(false, mode).unwrap();
        assert!(report.games > 0);
        assert_eq!(report.games, report.draws + report.computer_wins);
    }
}

#[test]
fn test_computer_never_loses_moving_first() {
    let report = check_never_loses(true, SearchMode::AlphaBeta).unwrap();
    assert!(report.computer_wins > 0);
    assert!(report.draws > 0);
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_scenario_forced_diagonal_block() {
    // X holds 4 and 6, O holds 8: only 2 stops the anti-diagonal
    let mut board: Board = "....X.X.O".parse().unwrap();
    assert_eq!(choose_move(&mut board, Side::Computer), Some(2));
}

#[test]
fn test_scenario_empty_board_opening() {
    for mode in [SearchMode::AlphaBeta, SearchMode::Minimax] {
        let mut board = Board::empty();
        let analysis = search(&mut board, Side::Computer, mode).unwrap();
        assert_eq!(analysis.best.score, 0);
        assert!([0, 2, 4, 6, 8].contains(&analysis.best.index));
    }
}

#[test]
fn test_scenario_block_human_row() {
    let mut board: Board = "XX..O....".parse().unwrap();
    assert_eq!(choose_move(&mut board, Side::Computer), Some(2));
}

#[test]
fn test_scenario_full_board_never_searched() {
    let board: Board = "XOXXOOOXX".parse().unwrap();
    assert_eq!(evaluate(&board, Side::Human), Outcome::Draw);
    assert_eq!(evaluate(&board, Side::Computer), Outcome::Draw);

    let mut buffer = board;
    assert_eq!(choose_move(&mut buffer, Side::Computer), None);

    // A session refuses to go on once the board is drawn
    let mut game = Game::new(GameConfig::default());
    for index in [0, 1, 2, 3, 5, 6, 7, 8] {
        if game.is_over() {
            break;
        }
        if game.board().is_empty_at(index) {
            game.play(index).unwrap();
        }
    }
    assert!(game.is_over());
    assert_eq!(game.play(4), Err(GameError::GameOver));
}
