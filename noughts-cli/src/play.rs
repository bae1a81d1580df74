//! Play command - a game against the engine on the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_session()
//! - Level 3: handle_command(), parse_command()
//! - Level 4: rendering utilities

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;

use noughts_core::{Game, GameConfig, Outcome, Side, Turn};

use crate::search_mode;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Let the computer make the first move
    #[arg(long)]
    pub computer_first: bool,

    /// Use plain minimax instead of alpha-beta
    #[arg(long)]
    pub plain: bool,
}

/// One line of player input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Place(usize),
    Hint,
    Quit,
}

/// How a session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionEnd {
    Finished(Outcome),
    Quit,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// This function reads like a table of contents:
/// 1. Configure the game
/// 2. Run the session on stdin/stdout
pub fn run(args: PlayArgs) -> Result<()> {
    let mut config = GameConfig::default().with_mode(search_mode(args.plain));
    if args.computer_first {
        config = config.computer_first();
    }
    let mut game = Game::new(config);

    tracing::info!(
        computer_first = args.computer_first,
        mode = ?game.config().mode,
        "starting game"
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let end = run_session(&mut game, stdin.lock(), &mut stdout)?;

    tracing::info!(?end, moves = game.history().len(), "session ended");
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Read commands until the game ends, the player quits, or input runs out
fn run_session<R: BufRead, W: Write>(game: &mut Game, input: R, out: &mut W) -> Result<SessionEnd> {
    writeln!(out, "You are {}, the computer is {}.", Side::Human.mark(), Side::Computer.mark())?;
    writeln!(out, "Enter a cell 0-8, 'h' for a hint, 'q' to quit.")?;
    if let Some(opening) = game.history().first() {
        writeln!(out, "Computer opens on {}.", opening.index)?;
    }
    write!(out, "\n{}", game.board().grid())?;
    prompt(out)?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let command = match parse_command(&line) {
            Some(command) => command,
            None => {
                writeln!(out, "Unrecognised input {:?}.", line.trim())?;
                prompt(out)?;
                continue;
            }
        };

        if let Some(end) = handle_command(game, command, out)? {
            return Ok(end);
        }
        prompt(out)?;
    }

    Ok(SessionEnd::Quit)
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Apply one command; `Some` once the session is over
fn handle_command<W: Write>(
    game: &mut Game,
    command: Command,
    out: &mut W,
) -> Result<Option<SessionEnd>> {
    match command {
        Command::Quit => {
            writeln!(out, "Bye.")?;
            Ok(Some(SessionEnd::Quit))
        }
        Command::Hint => {
            match game.hint() {
                Some(mv) => {
                    writeln!(out, "Hint: cell {} ({}).", mv.index, describe_score(mv.score))?
                }
                None => writeln!(out, "No hint available.")?,
            }
            Ok(None)
        }
        Command::Place(index) => match game.play(index) {
            Ok(turn) => {
                report_turn(&turn, out)?;
                write!(out, "\n{}", game.board().grid())?;
                if turn.outcome.is_terminal() {
                    writeln!(out, "{}", describe_outcome(&turn.outcome))?;
                    return Ok(Some(SessionEnd::Finished(turn.outcome)));
                }
                Ok(None)
            }
            Err(e) => {
                writeln!(out, "Rejected: {}.", e)?;
                Ok(None)
            }
        },
    }
}

/// Parse a line of input
fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Some(Command::Quit),
        "h" | "hint" | "?" => Some(Command::Hint),
        _ => trimmed.parse().ok().map(Command::Place),
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn prompt<W: Write>(out: &mut W) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

fn report_turn<W: Write>(turn: &Turn, out: &mut W) -> Result<()> {
    if let Some(reply) = turn.computer {
        writeln!(out, "Computer plays {}.", reply)?;
    }
    Ok(())
}

/// Score from the human's point of view (scores are computer-positive)
fn describe_score(score: i32) -> &'static str {
    match score {
        s if s < 0 => "winning",
        0 => "draw with best play",
        _ => "losing",
    }
}

fn describe_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Win { line, side: Side::Human } => format!("You win on the {}!", line.name()),
        Outcome::Win {
            line,
            side: Side::Computer,
        } => format!("Computer wins on the {}.", line.name()),
        Outcome::Draw => "Draw.".to_string(),
        Outcome::NoResult => String::new(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn session(game: &mut Game, input: &str) -> (SessionEnd, String) {
        let mut out = Vec::new();
        let end = run_session(game, input.as_bytes(), &mut out).unwrap();
        (end, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command(" 4 "), Some(Command::Place(4)));
        assert_eq!(parse_command("12"), Some(Command::Place(12)));
        assert_eq!(parse_command("H"), Some(Command::Hint));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("x"), None);
        assert_eq!(parse_command("-1"), None);
    }

    #[test]
    fn test_session_reply_and_quit() {
        let mut game = Game::default();
        let (end, text) = session(&mut game, "0\nq\n");

        assert_eq!(end, SessionEnd::Quit);
        assert!(text.contains("Computer plays 4."));
        assert_eq!(game.board().to_string(), "X...O....");
    }

    #[test]
    fn test_session_rejects_bad_moves() {
        let mut game = Game::default();
        let (_, text) = session(&mut game, "9\n0\n4\nfoo\n");

        assert!(text.contains("Rejected: cell 9 is off the board"));
        assert!(text.contains("Rejected: cell 4 is already taken"));
        assert!(text.contains("Unrecognised input \"foo\"."));
        assert_eq!(game.history().len(), 2);
    }

    #[test]
    fn test_session_hint() {
        let mut game = Game::default();
        let (_, text) = session(&mut game, "h\n");
        assert!(text.contains("Hint: cell 0 (draw with best play)."));
    }

    #[test]
    fn test_session_computer_first() {
        let mut game = Game::new(GameConfig::default().computer_first());
        let (end, text) = session(&mut game, "");

        assert_eq!(end, SessionEnd::Quit);
        assert!(text.contains("Computer opens on 0."));
        assert!(text.contains(" O | 1 | 2 "));
    }

    #[test]
    fn test_session_plays_to_the_end() {
        let mut game = Game::default();
        // Always take the lowest free cell; the engine never loses
        let mut input = String::new();
        for cell in 0..9 {
            input.push_str(&format!("{}\n", cell));
        }
        let (end, text) = session(&mut game, &input);

        match end {
            SessionEnd::Finished(outcome) => {
                assert_ne!(outcome.winner(), Some(Side::Human));
                assert!(text.contains("Computer wins") || text.contains("Draw."));
            }
            SessionEnd::Quit => panic!("game should have finished"),
        }
    }

    #[test]
    fn test_describe_score() {
        assert_eq!(describe_score(-7), "winning");
        assert_eq!(describe_score(0), "draw with best play");
        assert_eq!(describe_score(8), "losing");
    }
}
