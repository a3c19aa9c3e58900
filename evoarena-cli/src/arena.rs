//! Arena setup shared by every command: config file, game, registry, seed

use std::path::Path;

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use evoarena_core::{ArenaConfig, Game, StrategyRegistry};

/// Everything a command needs to start simulating
pub struct Arena {
    pub config: ArenaConfig,
    pub registry: StrategyRegistry,
}

impl Arena {
    /// Load the arena from a JSON file, or the built-in arena without one
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => load_config(path)?,
            None => ArenaConfig::builtin(),
        };

        let registry = StrategyRegistry::builtin();
        registry
            .check_all(&config.strategies)
            .context("Config lists a strategy that is not registered")?;

        tracing::debug!(
            "arena: games {:?}, strategies {:?}",
            config.game_names(),
            config.strategies
        );

        Ok(Self { config, registry })
    }

    /// Build a game from a possibly abbreviated name
    pub fn game(&self, name: &str) -> Result<Game> {
        self.config
            .resolve_game(name)
            .with_context(|| format!("Failed to resolve game '{name}'"))
    }

    /// Round count from the command line or the config default
    pub fn rounds(&self, rounds: Option<u32>) -> u32 {
        self.config.rounds_or_default(rounds)
    }

    /// Explicit strategy list, or the config's list when empty
    pub fn strategy_list(&self, requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            self.config.strategies.clone()
        } else {
            requested.to_vec()
        }
    }
}

/// Read and parse an arena config file
pub fn load_config(path: &Path) -> Result<ArenaConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    ArenaConfig::from_json(&text)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Use the given seed, or draw one and log it so the run can be repeated
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(s) => s,
        None => {
            let s: u64 = ChaCha8Rng::from_entropy().gen();
            tracing::info!("no --seed given, using {}", s);
            s
        }
    }
}

/// Print a serializable value as pretty JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
