//! Individuals and population initialization

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A population member carrying one strategy index
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Index into the strategy list
    pub gene: usize,
    /// Fitness, `None` until evaluated or after the gene was touched
    pub fitness: Option<f64>,
}

impl Individual {
    /// Create an unevaluated individual
    pub fn new(gene: usize) -> Self {
        Self { gene, fitness: None }
    }

    pub fn is_valid(&self) -> bool {
        self.fitness.is_some()
    }

    /// Drop the fitness after the gene was changed
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Fitness for comparisons; unevaluated individuals rank last
    pub fn fitness_or_min(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }
}

/// Population of `size` individuals with genes uniform in `0..strategy_count`
pub fn init_population<R: Rng + ?Sized>(size: usize, strategy_count: usize, rng: &mut R) -> Vec<Individual> {
    (0..size)
        .map(|_| Individual::new(rng.gen_range(0..strategy_count)))
        .collect()
}
