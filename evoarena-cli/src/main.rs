//! EvoArena CLI - Command-line interface
//!
//! Commands:
//! - play: Basic session (strategy and/or human seats)
//! - match: One repeated match between two strategies
//! - tournament: Repeated round-robin with ranking
//! - evolve: Evolutionary population simulation
//! - list: Show configured games and strategies

mod arena;
mod evolve;
mod human;
mod match_cmd;
mod play;
mod tournament_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::arena::Arena;

#[derive(Parser)]
#[command(name = "evoarena")]
#[command(about = "Iterated matrix-game strategy arena")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Arena config JSON (default: built-in PD, HawkDove, StagHunt)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a basic session
    Play(play::PlayArgs),
    /// Play one repeated match between two strategies
    Match(match_cmd::MatchArgs),
    /// Run a repeated round-robin tournament
    Tournament(tournament_cmd::TournamentArgs),
    /// Evolve a population of strategy adopters
    Evolve(evolve::EvolveArgs),
    /// List configured games and strategies
    List,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let arena = Arena::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Play(args) => play::run(args, &arena, cli.seed),
        Commands::Match(args) => match_cmd::run(args, &arena, cli.seed),
        Commands::Tournament(args) => tournament_cmd::run(args, &arena, cli.seed),
        Commands::Evolve(args) => evolve::run(args, &arena, cli.seed),
        Commands::List => {
            list(&arena);
            Ok(())
        }
    }
}

fn list(arena: &Arena) {
    println!("Games:");
    for name in arena.config.game_names() {
        match arena.config.game(&name) {
            Ok(game) => println!("  {:<12} {}", name, game.description()),
            Err(e) => println!("  {:<12} (invalid: {})", name, e),
        }
    }
    println!("Strategies:");
    for name in &arena.config.strategies {
        println!("  {}", name);
    }
}
