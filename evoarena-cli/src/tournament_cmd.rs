//! Tournament command - repeated round-robin with ranking
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: report_results()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;

use evoarena_tournament::{run_round_robin, TournamentConfig, TournamentResult};

use crate::arena::{print_json, resolve_seed, Arena};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct TournamentArgs {
    /// Game name or abbreviation
    #[arg(long, default_value = "PD")]
    pub game: String,

    /// Participants (default: the config's strategy list)
    #[arg(long = "strategy", value_name = "NAME")]
    pub strategies: Vec<String>,

    /// Rounds per match (default: config default_rounds)
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Times the full pairing matrix is played
    #[arg(long, default_value = "1")]
    pub repeats: u32,

    /// Probability of a move being flipped (0.0-0.2)
    #[arg(long, default_value = "0.0")]
    pub noise: f64,

    /// Run matches on one thread
    #[arg(long)]
    pub sequential: bool,

    /// Print the average pairwise score matrix
    #[arg(long)]
    pub matrix: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run tournament command
///
/// 1. Resolve game and participants
/// 2. Run the round-robin
/// 3. Report standings
pub fn run(args: TournamentArgs, arena: &Arena, seed: Option<u64>) -> Result<()> {
    let game = arena.game(&args.game)?;
    let names = arena.strategy_list(&args.strategies);
    let config = TournamentConfig::round_robin(arena.rounds(args.rounds), args.repeats)
        .with_noise(args.noise)
        .with_seed(resolve_seed(seed))
        .with_parallel(!args.sequential);

    tracing::info!(
        "Starting tournament on {}: {} strategies, {} repeats",
        game.name().unwrap_or("game"),
        names.len(),
        args.repeats
    );

    let result = run_round_robin(&game, &arena.registry, &names, &config).context("Tournament failed")?;

    report_results(&result, &names, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn report_results(result: &TournamentResult, names: &[String], args: &TournamentArgs) -> Result<()> {
    if args.json {
        return print_json(result);
    }

    print_standings(result);
    if args.matrix {
        print_matrix(result, names);
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_standings(result: &TournamentResult) {
    println!("\n=== Tournament Results ===");
    println!(
        "{} matches over {} repeat(s)",
        result.matches_played, result.repeats
    );
    println!("{:<4} {:<20} {:>8}", "Rank", "Strategy", "Score");
    for (rank, standing) in result.standings.iter().enumerate() {
        println!("{:<4} {:<20} {:>8}", rank + 1, standing.name, standing.score);
    }
    if let Some(winner) = result.winner() {
        println!("\nWinner: {}", winner.name);
    }
}

fn print_matrix(result: &TournamentResult, names: &[String]) {
    println!("\nAverage row score per match:");
    print!("{:<20}", "");
    for name in names {
        print!(" {:>10}", abbreviate(name));
    }
    println!();
    for (name, row) in names.iter().zip(&result.average_scores) {
        print!("{:<20}", name);
        for score in row {
            print!(" {:>10.1}", score);
        }
        println!();
    }
}

/// Column headers are cut to ten characters
fn abbreviate(name: &str) -> String {
    name.chars().take(10).collect()
}
