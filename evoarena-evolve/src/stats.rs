//! Per-generation statistics

use serde::{Deserialize, Serialize};

use crate::population::Individual;

/// Summary of one generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationSnapshot {
    /// Generation number, starting at 1
    pub generation: usize,
    pub max_fitness: f64,
    pub avg_fitness: f64,
    /// Share of the population holding each strategy index; sums to 1
    pub frequencies: Vec<f64>,
}

impl GenerationSnapshot {
    /// Summarize an evaluated population.
    ///
    /// Unevaluated individuals count toward frequencies but not fitness.
    pub fn from_population(generation: usize, population: &[Individual], strategy_count: usize) -> Self {
        let fitness: Vec<f64> = population.iter().filter_map(|i| i.fitness).collect();
        let (max_fitness, avg_fitness) = if fitness.is_empty() {
            (0.0, 0.0)
        } else {
            let max = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let avg = fitness.iter().sum::<f64>() / fitness.len() as f64;
            (max, avg)
        };

        Self {
            generation,
            max_fitness,
            avg_fitness,
            frequencies: gene_frequencies(population, strategy_count),
        }
    }

    /// Index of the most frequent strategy, lowest index on ties
    pub fn dominant(&self) -> Option<usize> {
        self.frequencies
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &f)| match best {
                Some((_, bf)) if bf >= f => best,
                _ => Some((i, f)),
            })
            .map(|(i, _)| i)
    }
}

/// Fraction of the population holding each gene in `0..strategy_count`
pub fn gene_frequencies(population: &[Individual], strategy_count: usize) -> Vec<f64> {
    let mut counts = vec![0usize; strategy_count];
    for individual in population {
        if let Some(count) = counts.get_mut(individual.gene) {
            *count += 1;
        }
    }

    if population.is_empty() {
        return vec![0.0; strategy_count];
    }
    let total = population.len() as f64;
    counts.into_iter().map(|c| c as f64 / total).collect()
}
