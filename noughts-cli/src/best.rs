//! Best command - ask the engine about one position
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: parse_position(), analyze_position(), report_analysis()
//! - Level 3: (delegated to noughts-core)
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use noughts_core::{evaluate, score_moves, Analysis, Board, Engine, Move, Outcome, Side};

use crate::search_mode;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BestArgs {
    /// Board in compact notation, e.g. "X...O...." (X human, O computer)
    pub board: String,

    /// Side to move
    #[arg(long, value_enum, default_value = "computer")]
    pub side: SideArg,

    /// Use plain minimax instead of alpha-beta
    #[arg(long)]
    pub plain: bool,

    /// Score every legal move, not just the best
    #[arg(long)]
    pub all: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    Human,
    Computer,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::Human => Side::Human,
            SideArg::Computer => Side::Computer,
        }
    }
}

/// Everything the command reports
#[derive(Clone, Debug)]
struct PositionReport {
    board: Board,
    side: Side,
    outcome: Outcome,
    analysis: Option<Analysis>,
    scored: Vec<Move>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run best command
///
/// This function reads like a table of contents:
/// 1. Parse the board
/// 2. Search it
/// 3. Report results
pub fn run(args: BestArgs) -> Result<()> {
    let board = parse_position(&args.board)?;
    let report = analyze_position(board, args.side.into(), &args);
    report_analysis(&report, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn parse_position(text: &str) -> Result<Board> {
    text.parse()
        .with_context(|| format!("Failed to parse board: {:?}", text))
}

fn analyze_position(board: Board, side: Side, args: &BestArgs) -> PositionReport {
    let mode = search_mode(args.plain);
    let outcome = evaluate(&board, side);
    let analysis = Engine::new(mode).analyze(&board, side);
    let scored = if args.all {
        score_moves(&board, side, mode)
    } else {
        Vec::new()
    };

    if let Some(a) = &analysis {
        tracing::debug!(
            board = %board,
            %side,
            index = a.best.index,
            nodes = a.stats.nodes,
            "analysed"
        );
    }

    PositionReport {
        board,
        side,
        outcome,
        analysis,
        scored,
    }
}

fn report_analysis(report: &PositionReport, json: bool) -> Result<()> {
    if json {
        print_json_report(report)
    } else {
        print_text_report(report);
        Ok(())
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_json_report(report: &PositionReport) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        board: Board,
        side: Side,
        outcome: Outcome,
        best: Option<&'a Analysis>,
        #[serde(skip_serializing_if = "<[Move]>::is_empty")]
        moves: &'a [Move],
    }

    let output = JsonOutput {
        board: report.board,
        side: report.side,
        outcome: report.outcome,
        best: report.analysis.as_ref(),
        moves: &report.scored,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_report(report: &PositionReport) {
    println!("{}", report.board.grid());

    let Some(analysis) = &report.analysis else {
        println!("Position is decided: {}", describe_outcome(&report.outcome));
        return;
    };

    println!("Side to move: {}", report.side);
    println!(
        "Best move:    {} (score {:+}, {})",
        analysis.best.index,
        analysis.best.score,
        describe_score(analysis.best.score)
    );
    println!(
        "Search:       {:?}, {} nodes, {} cutoffs",
        analysis.mode, analysis.stats.nodes, analysis.stats.cutoffs
    );

    if !report.scored.is_empty() {
        println!("\nAll moves:");
        for mv in &report.scored {
            println!("  {}: {:+} ({})", mv.index, mv.score, describe_score(mv.score));
        }
    }
}

fn describe_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Win { line, side } => format!("{} holds the {}", side, line.name()),
        Outcome::Draw => "draw".to_string(),
        Outcome::NoResult => "already won by the other side".to_string(),
    }
}

/// Scores are computer-positive
fn describe_score(score: i32) -> &'static str {
    match score {
        s if s > 0 => "computer wins",
        0 => "draw",
        _ => "human wins",
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_core::SearchMode;

    fn args(board: &str, all: bool) -> BestArgs {
        BestArgs {
            board: board.to_string(),
            side: SideArg::Computer,
            plain: false,
            all,
            json: false,
        }
    }

    #[test]
    fn test_parse_position_error() {
        let err = parse_position("XOX").unwrap_err();
        assert!(format!("{:#}", err).contains("expected 9 cells"));
    }

    #[test]
    fn test_analyze_blocks_threat() {
        let a = args("XX..O....", false);
        let board = parse_position(&a.board).unwrap();
        let report = analyze_position(board, Side::Computer, &a);

        assert_eq!(report.outcome, Outcome::NoResult);
        assert_eq!(report.analysis.unwrap().best, Move { index: 2, score: 0 });
        assert!(report.scored.is_empty());
    }

    #[test]
    fn test_analyze_all_moves() {
        let a = args("XX.OO...X", true);
        let board = parse_position(&a.board).unwrap();
        let report = analyze_position(board, Side::Computer, &a);

        assert_eq!(report.analysis.unwrap().best.index, 5);
        assert_eq!(report.scored.len(), 4);
        assert!(report.scored.iter().any(|m| *m == Move { index: 5, score: 9 }));
    }

    #[test]
    fn test_analyze_all_moves_plain() {
        let mut plain = args("X...O....", true);
        plain.side = SideArg::Human;
        plain.plain = true;
        let pruned = args("X...O....", true);
        let board = parse_position(&plain.board).unwrap();

        let plain_report = analyze_position(board, Side::Human, &plain);
        let pruned_report = analyze_position(board, Side::Human, &pruned);

        let analysis = plain_report.analysis.unwrap();
        assert_eq!(analysis.mode, SearchMode::Minimax);
        assert_eq!(analysis.stats.cutoffs, 0);
        assert_eq!(plain_report.scored.len(), 7);
        assert_eq!(plain_report.scored, pruned_report.scored);
    }

    #[test]
    fn test_analyze_decided_board() {
        let a = args("XOXXOOOXX", false);
        let board = parse_position(&a.board).unwrap();
        let report = analyze_position(board, Side::Computer, &a);

        assert_eq!(report.outcome, Outcome::Draw);
        assert!(report.analysis.is_none());
    }

    #[test]
    fn test_side_arg_conversion() {
        assert_eq!(Side::from(SideArg::Human), Side::Human);
        assert_eq!(Side::from(SideArg::Computer), Side::Computer);
    }
}
