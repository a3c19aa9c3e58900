//! Fitness evaluation for evolution
//!
//! Level 2 - Phase-level implementation

use rand::Rng;
use serde::{Deserialize, Serialize};

use evoarena_core::{ArenaError, Game, Result, StrategyRegistry};

use crate::config::EvalConfig;
use crate::match_play::play_match;

/// Result of fitness evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitnessResult {
    /// Mean first-player score over the sampled matches
    pub fitness_score: f64,
    /// Sum of first-player scores
    pub total_score: i64,
    /// Pool indices of the opponents faced, in play order
    pub opponents: Vec<usize>,
    /// Rounds in each sampled match
    pub rounds_per_match: u32,
}

impl FitnessResult {
    /// Number of opponents faced
    pub fn opponents_faced(&self) -> usize {
        self.opponents.len()
    }

    /// Mean score per round, comparable across match lengths
    pub fn per_round_score(&self) -> f64 {
        if self.rounds_per_match == 0 {
            0.0
        } else {
            self.fitness_score / self.rounds_per_match as f64
        }
    }
}

/// Evaluate fitness of a candidate against sampled opponents (Level 2 phase)
///
/// Opponents are drawn uniformly from `pool` with replacement, so the
/// candidate may meet itself. Opponent draws and noise share `rng`.
///
/// # Arguments
/// * `game` - Payoff model
/// * `registry` - Source of fresh strategy instances
/// * `candidate` - Strategy name being evaluated, always in seat A
/// * `pool` - Strategy names opponents are drawn from
/// * `config` - Evaluation configuration
/// * `rng` - Source of opponent draws and noise
///
/// # Returns
/// Fitness result with aggregated statistics
pub fn evaluate_fitness<R: Rng + ?Sized>(
    game: &Game,
    registry: &StrategyRegistry,
    candidate: &str,
    pool: &[String],
    config: &EvalConfig,
    rng: &mut R,
) -> Result<FitnessResult> {
    if pool.is_empty() {
        return Err(ArenaError::NoStrategiesAvailable);
    }
    config.validate()?;

    let opponents: Vec<usize> = (0..config.opponents)
        .map(|_| rng.gen_range(0..pool.len()))
        .collect();
    let scores = play_against_opponents(game, registry, candidate, pool, &opponents, config, rng)?;

    Ok(aggregate_fitness(&scores, opponents, config.rounds))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Play the candidate against each drawn opponent, returning its scores
fn play_against_opponents<R: Rng + ?Sized>(
    game: &Game,
    registry: &StrategyRegistry,
    candidate: &str,
    pool: &[String],
    opponents: &[usize],
    config: &EvalConfig,
    rng: &mut R,
) -> Result<Vec<i64>> {
    opponents
        .iter()
        .map(|&opponent| {
            let mut player = registry.create(candidate)?;
            let mut other = registry.create(&pool[opponent])?;
            let result = play_match(game, &mut player, &mut other, config.rounds, config.noise, rng)?;
            Ok(result.score_a)
        })
        .collect()
}

/// Aggregate sampled scores into a fitness result
fn aggregate_fitness(scores: &[i64], opponents: Vec<usize>, rounds_per_match: u32) -> FitnessResult {
    let total_score: i64 = scores.iter().sum();
    let fitness_score = if scores.is_empty() {
        0.0
    } else {
        total_score as f64 / scores.len() as f64
    };

    FitnessResult {
        fitness_score,
        total_score,
        opponents,
        rounds_per_match,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pool(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_aggregate_fitness() {
        let fitness = aggregate_fitness(&[30, 10, 20], vec![0, 1, 0], 10);

        assert_eq!(fitness.total_score, 60);
        assert_eq!(fitness.fitness_score, 20.0);
        assert_eq!(fitness.opponents_faced(), 3);
        assert_eq!(fitness.per_round_score(), 2.0);
    }

    #[test]
    fn test_evaluate_fitness_single_opponent_pool() {
        let game = Game::prisoners_dilemma();
        let registry = StrategyRegistry::builtin();
        let config = EvalConfig::default().with_opponents(4);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let result = evaluate_fitness(
            &game,
            &registry,
            "AlwaysDefect",
            &pool(&["AlwaysCooperate"]),
            &config,
            &mut rng,
        )
        .unwrap();

        // Every draw is ALLC: 10 rounds at 5 each.
        assert_eq!(result.opponents, vec![0; 4]);
        assert_eq!(result.fitness_score, 50.0);
        assert_eq!(result.total_score, 200);
    }

    #[test]
    fn test_evaluate_fitness_mixed_pool_bounds() {
        let game = Game::prisoners_dilemma();
        let registry = StrategyRegistry::builtin();
        let config = EvalConfig::default().with_opponents(20);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let names = pool(&["AlwaysCooperate", "AlwaysDefect"]);

        let result = evaluate_fitness(&game, &registry, "AlwaysCooperate", &names, &config, &mut rng).unwrap();

        // ALLC scores 30 against itself and 0 against ALLD.
        let expected_total: i64 = result
            .opponents
            .iter()
            .map(|&i| if i == 0 { 30 } else { 0 })
            .sum();
        assert_eq!(result.total_score, expected_total);
        assert!(result.fitness_score >= 0.0 && result.fitness_score <= 30.0);
        assert!(result.opponents.iter().all(|&i| i < names.len()));
    }

    #[test]
    fn test_evaluate_fitness_reproducible() {
        let game = Game::prisoners_dilemma();
        let registry = StrategyRegistry::builtin();
        let names = registry.names().to_vec();
        let config = EvalConfig::default().with_noise(0.1);

        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            evaluate_fitness(&game, &registry, "TitForTat", &names, &config, &mut rng).unwrap()
        };

        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_evaluate_fitness_empty_pool() {
        let game = Game::prisoners_dilemma();
        let registry = StrategyRegistry::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let result = evaluate_fitness(&game, &registry, "TitForTat", &[], &EvalConfig::default(), &mut rng);
        assert!(matches!(result, Err(ArenaError::NoStrategiesAvailable)));
    }

    #[test]
    fn test_evaluate_fitness_unknown_candidate() {
        let game = Game::prisoners_dilemma();
        let registry = StrategyRegistry::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let result = evaluate_fitness(
            &game,
            &registry,
            "Pavlov",
            &pool(&["TitForTat"]),
            &EvalConfig::default(),
            &mut rng,
        );
        assert!(matches!(result, Err(ArenaError::UnknownStrategy { .. })));
    }

    #[test]
    fn test_evaluate_fitness_zero_opponents_rejected() {
        let game = Game::prisoners_dilemma();
        let registry = StrategyRegistry::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = EvalConfig::default().with_opponents(0);

        let result = evaluate_fitness(&game, &registry, "TitForTat", &pool(&["TitForTat"]), &config, &mut rng);
        assert!(matches!(result, Err(ArenaError::InvalidParameter(_))));
    }
}
