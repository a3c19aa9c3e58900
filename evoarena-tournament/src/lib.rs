//! EvoArena Tournament - Strategy evaluation through repeated play
//!
//! This crate provides match and tournament infrastructure:
//! - Repeated matches between move sources, with move noise
//! - Basic sessions with external (e.g. human) seats
//! - Repeated round-robin tournaments with ranking
//! - Sampled fitness evaluation for evolution
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_round_robin (orchestration)
//! - Level 2: play_match, play_session, evaluate_fitness (phases)
//! - Level 3: play_round, execute_match, aggregate_fitness (steps)
//! - Level 4: utilities, configuration

mod config;
mod fitness;
mod match_play;
mod session;
mod tournament;

pub use config::{
    check_positive, fitness_rounds, EvalConfig, MatchConfig, TournamentConfig, DEFAULT_SEED, FITNESS_ROUND_DIVISOR,
    MIN_FITNESS_ROUNDS,
};
pub use fitness::{evaluate_fitness, FitnessResult};
pub use match_play::{play_match, play_named_match, MatchResult, MoveSource, NamedMatch, RoundRecord};
pub use session::{play_session, Seat, SessionMode};
pub use tournament::{run_round_robin, Standing, TournamentResult};
