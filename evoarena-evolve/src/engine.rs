//! Evolution loop and the strategy-population simulation
//!
//! Level 1 - Orchestration (run_evolution), Level 2 - Phases (evolve loop)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use evoarena_core::{ArenaError, Game, Result, StrategyRegistry};
use evoarena_tournament::{check_positive, evaluate_fitness, fitness_rounds, EvalConfig, DEFAULT_SEED};

use crate::config::EvolutionConfig;
use crate::crossover::crossover_pairs;
use crate::mutation::mutate_population;
use crate::population::{init_population, Individual};
use crate::selection::tournament_select_many;
use crate::stats::GenerationSnapshot;

/// Final population and history of an evolution run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionOutcome {
    /// Final population sorted by fitness (descending), all evaluated
    pub population: Vec<Individual>,
    /// One snapshot per generation
    pub snapshots: Vec<GenerationSnapshot>,
}

impl EvolutionOutcome {
    /// Top individual
    pub fn best(&self) -> Option<&Individual> {
        self.population.first()
    }
}

/// A ranked member of the final population, by strategy name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedIndividual {
    pub strategy: String,
    pub gene: usize,
    pub fitness: f64,
}

/// Report of a strategy-population simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionReport {
    /// Strategy names, indexed by gene
    pub strategies: Vec<String>,
    pub snapshots: Vec<GenerationSnapshot>,
    /// Final population, best first
    pub final_ranking: Vec<RankedIndividual>,
    /// Strategy of the top individual
    pub winner: String,
}

impl EvolutionReport {
    /// Frequency of `strategy` in every generation, oldest first
    pub fn frequency_history(&self, strategy: &str) -> Option<Vec<f64>> {
        let index = self.strategies.iter().position(|s| s == strategy)?;
        Some(self.snapshots.iter().map(|s| s.frequencies[index]).collect())
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Evolve a population of strategy-adopting individuals (Level 1)
///
/// Fitness is the mean first-player score over `opponents_per_eval` short
/// matches against opponents drawn from `names` with replacement.
///
/// # Arguments
/// * `game` - Payoff model
/// * `registry` - Source of fresh strategy instances
/// * `names` - Strategy list; genes index into it
/// * `config` - Evolution configuration
/// * `rounds_per_match` - Full match length; fitness matches are shorter
/// * `noise` - Flip probability in `[0, 0.2]`
/// * `seed` - Master seed (None = DEFAULT_SEED)
pub fn run_evolution(
    game: &Game,
    registry: &StrategyRegistry,
    names: &[String],
    config: &EvolutionConfig,
    rounds_per_match: u32,
    noise: f64,
    seed: Option<u64>,
) -> Result<EvolutionReport> {
    if names.is_empty() {
        return Err(ArenaError::NoStrategiesAvailable);
    }
    registry.check_all(names)?;
    check_positive("rounds_per_match", rounds_per_match as usize)?;

    let eval_config = EvalConfig::for_match_length(rounds_per_match)
        .with_opponents(config.opponents_per_eval)
        .with_noise(noise);
    eval_config.validate()?;

    tracing::info!(
        "evolution: population {}, {} generations, {} strategies, fitness matches of {} rounds",
        config.population_size,
        config.generations,
        names.len(),
        fitness_rounds(rounds_per_match)
    );

    let fitness_fn = |gene: usize, seed: u64| -> Result<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let result = evaluate_fitness(game, registry, &names[gene], names, &eval_config, &mut rng)?;
        Ok(result.fitness_score)
    };

    let mut rng = ChaCha8Rng::seed_from_u64(seed.unwrap_or(DEFAULT_SEED));
    let outcome = evolve(names.len(), config, fitness_fn, &mut rng)?;

    let final_ranking: Vec<RankedIndividual> = outcome
        .population
        .iter()
        .map(|ind| RankedIndividual {
            strategy: names[ind.gene].clone(),
            gene: ind.gene,
            fitness: ind.fitness_or_min(),
        })
        .collect();
    let winner = final_ranking
        .first()
        .map(|r| r.strategy.clone())
        .ok_or(ArenaError::NoStrategiesAvailable)?;

    tracing::info!("evolution finished: winner {}", winner);

    Ok(EvolutionReport {
        strategies: names.to_vec(),
        snapshots: outcome.snapshots,
        final_ranking,
        winner,
    })
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// Run the evolution loop without a per-generation observer
pub fn evolve<F, R>(
    strategy_count: usize,
    config: &EvolutionConfig,
    fitness_fn: F,
    rng: &mut R,
) -> Result<EvolutionOutcome>
where
    F: Fn(usize, u64) -> Result<f64> + Sync,
    R: Rng + ?Sized,
{
    evolve_with_callback(strategy_count, config, fitness_fn, |_| {}, rng)
}

/// Run the evolution loop, calling `on_generation` after each generation.
///
/// `fitness_fn(gene, seed)` scores one individual; each evaluation gets its
/// own seed drawn from `rng` in population order, so results do not depend
/// on `config.parallel`.
pub fn evolve_with_callback<F, C, R>(
    strategy_count: usize,
    config: &EvolutionConfig,
    fitness_fn: F,
    mut on_generation: C,
    rng: &mut R,
) -> Result<EvolutionOutcome>
where
    F: Fn(usize, u64) -> Result<f64> + Sync,
    C: FnMut(&GenerationSnapshot),
    R: Rng + ?Sized,
{
    if strategy_count == 0 {
        return Err(ArenaError::NoStrategiesAvailable);
    }
    config.validate()?;

    let mut population = init_population(config.population_size, strategy_count, rng);
    evaluate_invalid(&mut population, &fitness_fn, config.parallel, rng)?;

    let mut snapshots = Vec::with_capacity(config.generations);
    for generation in 1..=config.generations {
        population = next_generation(&population, strategy_count, config, rng);
        evaluate_invalid(&mut population, &fitness_fn, config.parallel, rng)?;

        let snapshot = GenerationSnapshot::from_population(generation, &population, strategy_count);
        tracing::info!(
            "generation {}/{}: max {:.2}, avg {:.2}",
            generation,
            config.generations,
            snapshot.max_fitness,
            snapshot.avg_fitness
        );
        on_generation(&snapshot);
        snapshots.push(snapshot);
    }

    evaluate_invalid(&mut population, &fitness_fn, config.parallel, rng)?;
    population.sort_by(|a, b| b.fitness_or_min().total_cmp(&a.fitness_or_min()));

    Ok(EvolutionOutcome {
        population,
        snapshots,
    })
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Select, recombine and mutate into a new population
fn next_generation<R: Rng + ?Sized>(
    population: &[Individual],
    strategy_count: usize,
    config: &EvolutionConfig,
    rng: &mut R,
) -> Vec<Individual> {
    let mut offspring = tournament_select_many(population, population.len(), config.tournament_size, rng);
    let recombined = crossover_pairs(&mut offspring, config.crossover_rate, config.gene_swap_rate, rng);
    let mutated = mutate_population(&mut offspring, config.mutation_rate, strategy_count, rng);
    tracing::debug!("offspring: {} pairs recombined, {} mutated", recombined, mutated);
    offspring
}

/// Score every individual whose fitness is missing
fn evaluate_invalid<F, R>(
    population: &mut [Individual],
    fitness_fn: &F,
    parallel: bool,
    rng: &mut R,
) -> Result<()>
where
    F: Fn(usize, u64) -> Result<f64> + Sync,
    R: Rng + ?Sized,
{
    let pending: Vec<(usize, usize, u64)> = population
        .iter()
        .enumerate()
        .filter(|(_, ind)| !ind.is_valid())
        .map(|(i, ind)| (i, ind.gene, rng.gen::<u64>()))
        .collect();

    let scores: Vec<(usize, f64)> = if parallel {
        pending
            .par_iter()
            .map(|&(i, gene, seed)| fitness_fn(gene, seed).map(|f| (i, f)))
            .collect::<Result<_>>()?
    } else {
        pending
            .iter()
            .map(|&(i, gene, seed)| fitness_fn(gene, seed).map(|f| (i, f)))
            .collect::<Result<_>>()?
    };

    for (i, fitness) in scores {
        population[i].fitness = Some(fitness);
    }
    Ok(())
}
