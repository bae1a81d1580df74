//! NOUGHTS CLI - Command-line interface
//!
//! Commands:
//! - play: Play a game against the engine in the terminal
//! - best: Ask the engine about a position
//! - verify: Exhaustively check the engine
//! - match: Engine against a random mover
//! - serve: Start the HTTP API

mod best;
mod match_cmd;
mod play;
mod server;
mod verify;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use noughts_core::SearchMode;

#[derive(Parser)]
#[command(name = "noughts")]
#[command(about = "Tic-tac-toe with a perfect-play engine")]
#[command(version)]
struct Cli {
    /// Seed for anything random (match opponents)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer
    Play(play::PlayArgs),
    /// Best move for a position
    Best(best::BestArgs),
    /// Check pruning equivalence and that the computer never loses
    Verify(verify::VerifyArgs),
    /// Engine against a seeded random mover
    Match(match_cmd::MatchArgs),
    /// Start the HTTP API server
    Serve(server::ServerArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("noughts=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Best(args) => best::run(args),
        Commands::Verify(args) => verify::run(args),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Serve(args) => server::run(args),
    }
}

/// Engine selected by a `--plain` flag
pub(crate) fn search_mode(plain: bool) -> SearchMode {
    if plain {
        SearchMode::Minimax
    } else {
        SearchMode::AlphaBeta
    }
}
