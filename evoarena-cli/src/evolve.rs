//! Evolution command - evolve a population of strategy adopters
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_evolution_config(), report_results()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;

use evoarena_evolve::{run_evolution, EvolutionConfig, EvolutionReport};

use crate::arena::{print_json, resolve_seed, Arena};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct EvolveArgs {
    /// Game name or abbreviation
    #[arg(long, default_value = "PD")]
    pub game: String,

    /// Strategies genes may take (default: the config's strategy list)
    #[arg(long = "strategy", value_name = "NAME")]
    pub strategies: Vec<String>,

    /// Population size
    #[arg(long, default_value = "50")]
    pub population: usize,

    /// Number of generations to run
    #[arg(long, default_value = "20")]
    pub generations: usize,

    /// Opponents sampled per fitness evaluation
    #[arg(long, default_value = "5")]
    pub opponents: usize,

    /// Full match length; fitness matches use a fifth of it (at least 10)
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Probability of a move being flipped (0.0-0.2)
    #[arg(long, default_value = "0.0")]
    pub noise: f64,

    /// Draws per selection tournament
    #[arg(long, default_value = "3")]
    pub tournament_size: usize,

    /// Crossover rate (0.0-1.0)
    #[arg(long, default_value = "0.5")]
    pub crossover_rate: f64,

    /// Per-gene swap rate inside a crossover (0.0-1.0)
    #[arg(long, default_value = "0.5")]
    pub gene_swap_rate: f64,

    /// Mutation rate (0.0-1.0)
    #[arg(long, default_value = "0.2")]
    pub mutation_rate: f64,

    /// Print the strategy frequency table for every generation
    #[arg(long)]
    pub frequencies: bool,

    /// Evaluate fitness on one thread
    #[arg(long)]
    pub sequential: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run evolution command
///
/// 1. Build the evolution configuration
/// 2. Run the simulation
/// 3. Report generations and the winner
pub fn run(args: EvolveArgs, arena: &Arena, seed: Option<u64>) -> Result<()> {
    let game = arena.game(&args.game)?;
    let names = arena.strategy_list(&args.strategies);
    let config = build_evolution_config(&args);
    let rounds = arena.rounds(args.rounds);

    tracing::info!(
        "Starting evolution: pop={}, gen={}, game={}",
        args.population,
        args.generations,
        game.name().unwrap_or("game")
    );

    let report = run_evolution(
        &game,
        &arena.registry,
        &names,
        &config,
        rounds,
        args.noise,
        Some(resolve_seed(seed)),
    )
    .context("Evolution failed")?;

    report_results(&report, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Build evolution configuration from command arguments
fn build_evolution_config(args: &EvolveArgs) -> EvolutionConfig {
    EvolutionConfig::new(args.population, args.generations)
        .with_opponents(args.opponents)
        .with_tournament_size(args.tournament_size)
        .with_rates(args.crossover_rate, args.gene_swap_rate, args.mutation_rate)
        .with_parallel(!args.sequential)
}

fn report_results(report: &EvolutionReport, args: &EvolveArgs) -> Result<()> {
    if args.json {
        return print_json(report);
    }

    print_generations(report);
    if args.frequencies {
        print_frequency_table(report);
    }
    print_summary(report);
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_generations(report: &EvolutionReport) {
    println!("\n=== Evolution ===");
    println!("{:>4} {:>10} {:>10}  {}", "Gen", "Max", "Avg", "Dominant");
    for snapshot in &report.snapshots {
        let dominant = snapshot
            .dominant()
            .map(|i| report.strategies[i].as_str())
            .unwrap_or("-");
        println!(
            "{:>4} {:>10.2} {:>10.2}  {}",
            snapshot.generation, snapshot.max_fitness, snapshot.avg_fitness, dominant
        );
    }
}

fn print_frequency_table(report: &EvolutionReport) {
    println!("\nStrategy frequencies by generation:");
    print!("{:>4}", "Gen");
    for name in &report.strategies {
        print!(" {:>10}", name.chars().take(10).collect::<String>());
    }
    println!();
    for snapshot in &report.snapshots {
        print!("{:>4}", snapshot.generation);
        for freq in &snapshot.frequencies {
            print!(" {:>9.1}%", freq * 100.0);
        }
        println!();
    }
}

fn print_summary(report: &EvolutionReport) {
    println!("\nFinal population (top 10):");
    for (rank, member) in report.final_ranking.iter().take(10).enumerate() {
        println!("  {:>2}. {:<20} {:>8.2}", rank + 1, member.strategy, member.fitness);
    }
    println!("\nWinner: {}", report.winner);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> EvolveArgs {
        EvolveArgs {
            game: "PD".to_string(),
            strategies: vec![],
            population: 8,
            generations: 2,
            opponents: 2,
            rounds: Some(10),
            noise: 0.0,
            tournament_size: 3,
            crossover_rate: 0.5,
            gene_swap_rate: 0.5,
            mutation_rate: 0.2,
            frequencies: true,
            sequential: true,
            json: false,
        }
    }

    #[test]
    fn test_build_evolution_config() {
        let config = build_evolution_config(&args());
        assert_eq!(config.population_size, 8);
        assert_eq!(config.generations, 2);
        assert_eq!(config.opponents_per_eval, 2);
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_evolve_runs() {
        let arena = Arena::load(None).unwrap();
        assert!(run(args(), &arena, Some(42)).is_ok());
    }

    #[test]
    fn test_zero_population_rejected() {
        let arena = Arena::load(None).unwrap();
        let mut bad = args();
        bad.population = 0;
        let err = run(bad, &arena, Some(42)).unwrap_err();
        assert!(format!("{err:#}").contains("population_size must be positive"));
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let arena = Arena::load(None).unwrap();
        let mut bad = args();
        bad.rounds = Some(0);
        let err = run(bad, &arena, Some(42)).unwrap_err();
        assert!(format!("{err:#}").contains("rounds_per_match must be positive"));
    }
}
