//! Match command - one repeated match between two strategies
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: report_results()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;

use evoarena_core::Game;
use evoarena_tournament::{play_named_match, MatchConfig, NamedMatch};

use crate::arena::{print_json, resolve_seed, Arena};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Row (first) strategy
    pub strategy_a: String,

    /// Column (second) strategy
    pub strategy_b: String,

    /// Game name or abbreviation
    #[arg(long, default_value = "PD")]
    pub game: String,

    /// Rounds to play (default: config default_rounds)
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Probability of a move being flipped (0.0-0.2)
    #[arg(long, default_value = "0.0")]
    pub noise: f64,

    /// Print every round
    #[arg(long)]
    pub show_moves: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Resolve the game
/// 2. Play the match
/// 3. Report results
pub fn run(args: MatchArgs, arena: &Arena, seed: Option<u64>) -> Result<()> {
    let game = arena.game(&args.game)?;
    let config = MatchConfig::new(arena.rounds(args.rounds))
        .with_noise(args.noise)
        .with_seed(resolve_seed(seed));

    tracing::info!(
        "Starting match: {} vs {} ({} rounds, noise={})",
        args.strategy_a,
        args.strategy_b,
        config.rounds,
        config.noise
    );

    let outcome = play_named_match(&game, &arena.registry, &args.strategy_a, &args.strategy_b, &config)
        .context("Match failed")?;

    report_results(&game, &outcome, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn report_results(game: &Game, outcome: &NamedMatch, args: &MatchArgs) -> Result<()> {
    if args.json {
        print_json_results(game, outcome)
    } else {
        print_text_results(game, outcome, args.show_moves);
        Ok(())
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_json_results(game: &Game, outcome: &NamedMatch) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonMatch<'a> {
        game: Option<&'a str>,
        strategies: &'a (String, String),
        scores: (i64, i64),
        cooperation_rates: (f64, f64),
        moves: Vec<(String, String)>,
    }

    let result = &outcome.result;
    print_json(&JsonMatch {
        game: game.name(),
        strategies: &outcome.strategies,
        scores: result.scores(),
        cooperation_rates: (result.cooperation_rate_a(), result.cooperation_rate_b()),
        moves: result.labeled_moves(game),
    })
}

fn print_text_results(game: &Game, outcome: &NamedMatch, show_moves: bool) {
    let (a, b) = &outcome.strategies;
    let result = &outcome.result;

    println!("\n=== Match Results ===");
    println!("{}", game.description());
    println!("Rounds: {}", result.round_count());

    if show_moves {
        for (i, (move_a, move_b)) in result.labeled_moves(game).iter().enumerate() {
            println!("  Round {:>3}: {:<5} {:<5}", i + 1, move_a, move_b);
        }
    }

    println!(
        "{:<20} {:>6}  (cooperated {:.1}%)",
        a,
        result.score_a,
        result.cooperation_rate_a() * 100.0
    );
    println!(
        "{:<20} {:>6}  (cooperated {:.1}%)",
        b,
        result.score_b,
        result.cooperation_rate_b() * 100.0
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(a: &str, b: &str) -> MatchArgs {
        MatchArgs {
            strategy_a: a.to_string(),
            strategy_b: b.to_string(),
            game: "sh".to_string(),
            rounds: Some(5),
            noise: 0.0,
            show_moves: true,
            json: false,
        }
    }

    #[test]
    fn test_match_runs() {
        let arena = Arena::load(None).unwrap();
        assert!(run(args("TitForTat", "GrimTrigger"), &arena, Some(42)).is_ok());
    }

    #[test]
    fn test_unknown_strategy() {
        let arena = Arena::load(None).unwrap();
        let err = run(args("TitForTat", "Pavlov"), &arena, Some(42)).unwrap_err();
        assert!(format!("{err:#}").contains("Unknown strategy: Pavlov"));
    }

    #[test]
    fn test_noise_out_of_range() {
        let arena = Arena::load(None).unwrap();
        let mut bad = args("TitForTat", "TitForTat");
        bad.noise = 0.5;
        assert!(run(bad, &arena, Some(42)).is_err());
    }
}
