//! Evolution configuration

use evoarena_core::{ArenaError, Result};

/// Evolution configuration
#[derive(Clone, Debug, PartialEq)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Draws per selection tournament
    pub tournament_size: usize,
    /// Probability an adjacent pair is recombined
    pub crossover_rate: f64,
    /// Per-position swap probability inside a recombined pair
    pub gene_swap_rate: f64,
    /// Probability an individual's gene is redrawn
    pub mutation_rate: f64,
    /// Opponents sampled per fitness evaluation
    pub opponents_per_eval: usize,
    /// Evaluate fitness in parallel
    pub parallel: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 20,
            tournament_size: 3,
            crossover_rate: 0.5,
            gene_swap_rate: 0.5,
            mutation_rate: 0.2,
            opponents_per_eval: 5,
            parallel: true,
        }
    }
}

impl EvolutionConfig {
    /// Config with the given population size and generation count
    pub fn new(population_size: usize, generations: usize) -> Self {
        Self {
            population_size,
            generations,
            ..Default::default()
        }
    }

    pub fn with_opponents(mut self, opponents_per_eval: usize) -> Self {
        self.opponents_per_eval = opponents_per_eval;
        self
    }

    pub fn with_tournament_size(mut self, tournament_size: usize) -> Self {
        self.tournament_size = tournament_size;
        self
    }

    /// Set crossover, gene swap and mutation rates
    pub fn with_rates(mut self, crossover_rate: f64, gene_swap_rate: f64, mutation_rate: f64) -> Self {
        self.crossover_rate = crossover_rate;
        self.gene_swap_rate = gene_swap_rate;
        self.mutation_rate = mutation_rate;
        self
    }

    /// Enable or disable parallel fitness evaluation
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("population_size", self.population_size),
            ("generations", self.generations),
            ("tournament_size", self.tournament_size),
            ("opponents_per_eval", self.opponents_per_eval),
        ];
        for (what, value) in counts {
            if value == 0 {
                return Err(ArenaError::InvalidParameter(format!("{what} must be positive")));
            }
        }

        let rates = [
            ("crossover_rate", self.crossover_rate),
            ("gene_swap_rate", self.gene_swap_rate),
            ("mutation_rate", self.mutation_rate),
        ];
        for (what, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(ArenaError::InvalidParameter(format!(
                    "{what} must be in [0, 1], got {value}"
                )));
            }
        }

        Ok(())
    }
}
