//! Selection operators for genetic algorithms
//!
//! Implements tournament selection where individuals compete
//! in small tournaments, with the winner being selected for breeding.

use rand::Rng;

use crate::population::Individual;

/// Tournament selection: select an individual by running a tournament.
///
/// Draws `tournament_size` individuals with replacement and returns the one
/// with the highest fitness; on ties the earliest draw wins.
///
/// # Arguments
/// * `population` - Individuals to select from
/// * `tournament_size` - Number of draws in each tournament
/// * `rng` - Random number generator
///
/// # Returns
/// Reference to the winning individual
///
/// # Panics
/// Panics if population is empty or tournament_size is 0
pub fn tournament_select<'a, R: Rng + ?Sized>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual {
    assert!(!population.is_empty(), "Population cannot be empty");
    assert!(tournament_size > 0, "Tournament size must be > 0");

    let mut best = &population[rng.gen_range(0..population.len())];

    for _ in 1..tournament_size {
        let contender = &population[rng.gen_range(0..population.len())];
        if contender.fitness_or_min() > best.fitness_or_min() {
            best = contender;
        }
    }

    best
}

/// Build a new pool of `count` individuals via repeated tournaments.
///
/// Winners are copied, fitness included, so the pool owns its members.
pub fn tournament_select_many<R: Rng + ?Sized>(
    population: &[Individual],
    count: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<Individual> {
    (0..count)
        .map(|_| *tournament_select(population, tournament_size, rng))
        .collect()
}
