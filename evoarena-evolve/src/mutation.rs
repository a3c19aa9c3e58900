//! Mutation operators for strategy genomes
//!
//! Uniform reset: a mutated gene is redrawn uniformly from the valid range,
//! which may give back the same value.

use rand::Rng;

use crate::population::Individual;

/// Redraw `gene` uniformly in `0..strategy_count`
pub fn mutate_uniform<R: Rng + ?Sized>(gene: &mut usize, strategy_count: usize, rng: &mut R) {
    *gene = rng.gen_range(0..strategy_count);
}

/// Mutate each individual with probability `mutation_rate`.
///
/// Mutated individuals lose their fitness. Returns how many were mutated.
pub fn mutate_population<R: Rng + ?Sized>(
    population: &mut [Individual],
    mutation_rate: f64,
    strategy_count: usize,
    rng: &mut R,
) -> usize {
    let mut mutated = 0;
    for individual in population.iter_mut() {
        if rng.gen_bool(mutation_rate) {
            mutate_uniform(&mut individual.gene, strategy_count, rng);
            individual.invalidate();
            mutated += 1;
        }
    }
    mutated
}
