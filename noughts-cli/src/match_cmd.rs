//! Match command - play the engine against a random mover
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use noughts_core::{Game, GameConfig, Outcome, RandomMover, SearchMode, Side};

use crate::search_mode;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play (will alternate who opens)
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Use plain minimax instead of alpha-beta
    #[arg(long)]
    pub plain: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    computer_first: bool,
    outcome: Outcome,
    moves: Vec<usize>,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    computer_wins: usize,
    random_wins: usize,
    draws: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// This function reads like a table of contents:
/// 1. Play the match (multiple games)
/// 2. Report results
/// 3. Fail if the engine ever lost
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let mode = search_mode(args.plain);

    tracing::info!("Starting match: {:?} engine vs random ({} games)", mode, args.games);

    let results = play_match(&args, mode, seed)?;

    report_results(&results, &args)?;

    if results.random_wins > 0 {
        anyhow::bail!("engine lost {} of {} games", results.random_wins, results.games.len());
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match
fn play_match(args: &MatchArgs, mode: SearchMode, seed: Option<u64>) -> Result<MatchResults> {
    let mut rng = create_rng(seed);
    let mut mover = RandomMover::with_seed(rng.gen());
    let progress = create_progress(args.games as u64, args.json)?;
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        // Alternate who opens
        let computer_first = game_num % 2 == 1;

        let record = play_single_game(game_num + 1, computer_first, mode, &mut mover)
            .with_context(|| format!("Game {} failed", game_num + 1))?;

        tracing::debug!(
            "Game {}: {:?} ({} moves)",
            record.game_number,
            record.outcome,
            record.moves.len()
        );

        games.push(record);
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) -> Result<()> {
    if args.json {
        print_json_results(results)
    } else {
        print_text_results(results);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game; the random mover takes the human side
fn play_single_game(
    game_number: usize,
    computer_first: bool,
    mode: SearchMode,
    mover: &mut RandomMover,
) -> Result<GameRecord> {
    let mut config = GameConfig::default().with_mode(mode);
    if computer_first {
        config = config.computer_first();
    }
    let mut game = Game::new(config);

    while !game.is_over() {
        let Some(index) = mover.pick(game.board()) else {
            break;
        };
        game.play(index)?;
    }

    Ok(GameRecord {
        game_number,
        computer_first,
        outcome: game.outcome(),
        moves: game.history().iter().map(|p| p.index).collect(),
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let computer_wins = games
        .iter()
        .filter(|g| g.outcome.winner() == Some(Side::Computer))
        .count();
    let random_wins = games
        .iter()
        .filter(|g| g.outcome.winner() == Some(Side::Human))
        .count();
    let draws = games
        .iter()
        .filter(|g| g.outcome == Outcome::Draw)
        .count();

    let total_moves: usize = games.iter().map(|g| g.moves.len()).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults {
        games,
        computer_wins,
        random_wins,
        draws,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Progress bar on stderr, hidden for JSON output
fn create_progress(len: u64, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(len);
    bar.set_style(ProgressStyle::with_template(
        "{spinner} [{bar:40}] {pos}/{len} games ({eta})",
    )?);
    Ok(bar)
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

fn outcome_label(outcome: &Outcome) -> &'static str {
    match outcome.winner() {
        Some(Side::Computer) => "computer",
        Some(Side::Human) => "random",
        None if *outcome == Outcome::Draw => "draw",
        None => "unfinished",
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonGame<'a> {
        game_number: usize,
        computer_first: bool,
        result: &'static str,
        moves: &'a [usize],
    }

    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        total_games: usize,
        computer_wins: usize,
        random_wins: usize,
        draws: usize,
        avg_moves: f32,
        computer_win_rate: f32,
        games: Vec<JsonGame<'a>>,
    }

    let total = results.games.len();
    let output = JsonOutput {
        total_games: total,
        computer_wins: results.computer_wins,
        random_wins: results.random_wins,
        draws: results.draws,
        avg_moves: results.avg_moves,
        computer_win_rate: if total > 0 {
            results.computer_wins as f32 / total as f32
        } else {
            0.0
        },
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                computer_first: g.computer_first,
                result: outcome_label(&g.outcome),
                moves: &g.moves,
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games:   {}", total);
    println!(
        "Computer wins: {} ({:.1}%)",
        results.computer_wins,
        percent(results.computer_wins, total)
    );
    println!(
        "Random wins:   {} ({:.1}%)",
        results.random_wins,
        percent(results.random_wins, total)
    );
    println!("Draws:         {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg moves:     {:.1}", results.avg_moves);

    let computer_first = results.games.iter().filter(|g| g.computer_first).count();
    println!(
        "Computer opened {} games, random opened {}",
        computer_first,
        total - computer_first
    );
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_core::WIN_LINES;

    fn record(game_number: usize, outcome: Outcome, moves: usize) -> GameRecord {
        GameRecord {
            game_number,
            computer_first: game_number % 2 == 0,
            outcome,
            moves: (0..moves).collect(),
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.computer_wins, 0);
        assert_eq!(results.random_wins, 0);
        assert_eq!(results.draws, 0);
        assert_eq!(results.avg_moves, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let win = Outcome::Win {
            line: WIN_LINES[0],
            side: Side::Computer,
        };
        let games = vec![
            record(1, win, 5),
            record(2, Outcome::Draw, 9),
            record(3, win, 7),
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.computer_wins, 2);
        assert_eq!(results.random_wins, 0);
        assert_eq!(results.draws, 1);
        assert_eq!(results.avg_moves, 7.0);
    }

    #[test]
    fn test_play_single_game_never_loses() {
        let mut mover = RandomMover::with_seed(7);
        for n in 0..20 {
            let computer_first = n % 2 == 1;
            let record =
                play_single_game(n + 1, computer_first, SearchMode::AlphaBeta, &mut mover).unwrap();
            assert!(record.outcome.is_terminal());
            assert_ne!(record.outcome.winner(), Some(Side::Human));
            assert!(record.moves.len() >= 5);
        }
    }

    #[test]
    fn test_computer_first_opens_game() {
        let mut mover = RandomMover::with_seed(1);
        let record = play_single_game(1, true, SearchMode::AlphaBeta, &mut mover).unwrap();
        assert_eq!(record.moves[0], 0);
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));

        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }

    #[test]
    fn test_outcome_label() {
        assert_eq!(outcome_label(&Outcome::Draw), "draw");
        assert_eq!(outcome_label(&Outcome::NoResult), "unfinished");
        let loss = Outcome::Win {
            line: WIN_LINES[2],
            side: Side::Human,
        };
        assert_eq!(outcome_label(&loss), "random");
    }
}
