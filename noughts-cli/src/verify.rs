//! Verify command - exhaustive engine checks
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_checks(), report_results()
//! - Level 3: (delegated to noughts-core::explore)
//! - Level 4: formatting utilities

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use noughts_core::{
    check_never_loses, check_pruning_equivalence, EquivalenceReport, PlayReport, SearchMode, Side,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct VerifyArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome of every check, by opener
#[derive(Clone, Debug, serde::Serialize)]
struct VerifyResults {
    equivalence: Vec<EquivalenceEntry>,
    never_loses: Vec<NeverLosesEntry>,
    elapsed_ms: u128,
}

#[derive(Clone, Debug, serde::Serialize)]
struct EquivalenceEntry {
    first: Side,
    #[serde(flatten)]
    report: EquivalenceReport,
}

#[derive(Clone, Debug, serde::Serialize)]
struct NeverLosesEntry {
    computer_first: bool,
    mode: SearchMode,
    #[serde(flatten)]
    report: PlayReport,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run verify command
///
/// This function reads like a table of contents:
/// 1. Run every check, stopping at the first failure
/// 2. Report results
pub fn run(args: VerifyArgs) -> Result<()> {
    let results = run_checks()?;
    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn run_checks() -> Result<VerifyResults> {
    let start = Instant::now();

    let mut equivalence = Vec::new();
    for first in [Side::Human, Side::Computer] {
        let report = check_pruning_equivalence(first)
            .with_context(|| format!("Pruning equivalence failed with {} moving first", first))?;
        equivalence.push(EquivalenceEntry { first, report });
    }

    let mut never_loses = Vec::new();
    for mode in [SearchMode::AlphaBeta, SearchMode::Minimax] {
        for computer_first in [false, true] {
            let report = check_never_loses(computer_first, mode).with_context(|| {
                format!("{:?} engine lost (computer first: {})", mode, computer_first)
            })?;
            never_loses.push(NeverLosesEntry {
                computer_first,
                mode,
                report,
            });
        }
    }

    Ok(VerifyResults {
        equivalence,
        never_loses,
        elapsed_ms: start.elapsed().as_millis(),
    })
}

fn report_results(results: &VerifyResults, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    println!("=== Pruning equivalence ===");
    for entry in &results.equivalence {
        println!(
            "  {} first: {} positions agree (minimax {} nodes, alpha-beta {} nodes, {:.1}x fewer)",
            entry.first,
            entry.report.positions,
            entry.report.minimax_nodes,
            entry.report.alpha_beta_nodes,
            node_ratio(&entry.report)
        );
    }

    println!("\n=== Never loses ===");
    for entry in &results.never_loses {
        println!(
            "  {:<10} {:<15} {} games: {} wins, {} draws, 0 losses",
            format!("{:?}", entry.mode),
            if entry.computer_first { "computer first" } else { "human first" },
            entry.report.games,
            entry.report.computer_wins,
            entry.report.draws
        );
    }

    println!("\nAll checks passed in {} ms", results.elapsed_ms);
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn node_ratio(report: &EquivalenceReport) -> f64 {
    if report.alpha_beta_nodes == 0 {
        0.0
    } else {
        report.minimax_nodes as f64 / report.alpha_beta_nodes as f64
    }
}

// ============================================================================
// TESTS
// ============================================================================
