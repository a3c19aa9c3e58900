//! EvoArena Core - Games, strategies and noise
//!
//! This crate provides the building blocks shared by every simulation:
//! - Matrix games with validated payoff lookup
//! - Declarative game specs and the arena configuration schema
//! - The strategy decision interface and built-in strategies
//! - The strategy registry
//! - The move-noise model
//! - The error taxonomy

pub mod config;
pub mod error;
pub mod game;
pub mod noise;
pub mod registry;
pub mod strategy;

// Re-exports for convenient access
pub use config::{resolve_game_name, ArenaConfig, DEFAULT_ROUNDS};
pub use error::{ArenaError, Result};
pub use game::{parse_action_pair, Action, Game, GameSpec, Payoff};
pub use noise::{apply_noise, validate_noise, NoiseModel, MAX_NOISE};
pub use registry::{
    build_registry, builtin_factories, DuplicatePolicy, RegistryBuilder, StrategyFactory,
    StrategyRegistry,
};
pub use strategy::{
    AlwaysCooperate, AlwaysDefect, ForgivingTitForTat, GrimTrigger, Strategy, TitForTat,
};
