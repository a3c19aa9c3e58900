//! EvoArena Evolution - Genetic algorithm over strategy populations
//!
//! This crate provides the evolutionary simulation:
//! - Population management
//! - Selection (tournament)
//! - Crossover (uniform, adjacent pairs)
//! - Mutation (uniform reset)
//! - Per-generation frequency tracking
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_evolution (orchestration)
//! - Level 2: evolve, evolve_with_callback (phases)
//! - Level 3: selection, crossover, mutation operators (steps)
//! - Level 4: configuration, statistics

mod config;
mod crossover;
mod engine;
mod mutation;
mod population;
mod selection;
mod stats;

pub use config::EvolutionConfig;
pub use crossover::{crossover_pairs, uniform_crossover};
pub use engine::{
    evolve, evolve_with_callback, run_evolution, EvolutionOutcome, EvolutionReport, RankedIndividual,
};
pub use mutation::{mutate_population, mutate_uniform};
pub use population::{init_population, Individual};
pub use selection::{tournament_select, tournament_select_many};
pub use stats::{gene_frequencies, GenerationSnapshot};
