//! Arena configuration schema
//!
//! The on-disk file is read by the CLI; this module only defines the shape
//! and turns game entries into `Game` values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};
use crate::game::{Game, GameSpec};

/// Round count used when neither the caller nor the config provides one
pub const DEFAULT_ROUNDS: u32 = 10;

/// Declarative arena description: games, strategy list, default round count
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub games: BTreeMap<String, GameSpec>,
    pub strategies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rounds: Option<u32>,
}

impl ArenaConfig {
    /// Parse from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ArenaConfig = serde_json::from_str(text)
            .map_err(|e| ArenaError::InvalidGameSpec(format!("config parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Prisoner's Dilemma, Hawk-Dove and Stag Hunt with the built-in strategies
    pub fn builtin() -> Self {
        let mut games = BTreeMap::new();
        games.insert(
            "PD".to_string(),
            spec(
                ["C", "D"],
                [[3, 3], [0, 5], [5, 0], [1, 1]],
                "Prisoner's Dilemma: mutual cooperation pays, but defection tempts",
            ),
        );
        games.insert(
            "HawkDove".to_string(),
            spec(
                ["Dove", "Hawk"],
                [[2, 2], [1, 3], [3, 1], [0, 0]],
                "Hawk-Dove: escalating against an aggressor is costly for both",
            ),
        );
        games.insert(
            "StagHunt".to_string(),
            spec(
                ["Stag", "Hare"],
                [[5, 5], [0, 3], [3, 0], [3, 3]],
                "Stag Hunt: cooperation pays most but hunting hare is safe",
            ),
        );

        Self {
            games,
            strategies: vec![
                "AlwaysCooperate".to_string(),
                "AlwaysDefect".to_string(),
                "TitForTat".to_string(),
                "GrimTrigger".to_string(),
                "ForgivingTitForTat".to_string(),
            ],
            default_rounds: Some(DEFAULT_ROUNDS),
        }
    }

    /// Check the round count and that every game builds
    pub fn validate(&self) -> Result<()> {
        if self.default_rounds == Some(0) {
            return Err(ArenaError::invalid_parameter("default_rounds must be positive"));
        }
        for (name, spec) in &self.games {
            Game::from_spec(Some(name), spec)?;
        }
        Ok(())
    }

    /// Game names in sorted order
    pub fn game_names(&self) -> Vec<String> {
        self.games.keys().cloned().collect()
    }

    /// Build the named game
    pub fn game(&self, name: &str) -> Result<Game> {
        let spec = self.games.get(name).ok_or_else(|| ArenaError::UnknownGame {
            name: name.to_string(),
            available: self.game_names(),
        })?;
        Game::from_spec(Some(name), spec)
    }

    /// Resolve a possibly abbreviated game name, then build it
    pub fn resolve_game(&self, input: &str) -> Result<Game> {
        let names = self.game_names();
        match resolve_game_name(input, &names) {
            Some(name) => self.game(&name),
            None => Err(ArenaError::UnknownGame {
                name: input.to_string(),
                available: names,
            }),
        }
    }

    /// Round count to use when the caller leaves it unspecified
    pub fn rounds_or_default(&self, rounds: Option<u32>) -> u32 {
        rounds.or(self.default_rounds).unwrap_or(DEFAULT_ROUNDS)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Map user input onto a known game name.
///
/// Exact names win; otherwise input is compared case-insensitively with
/// spaces, dashes, underscores and apostrophes removed, against both the
/// known names and a table of common abbreviations.
pub fn resolve_game_name(input: &str, known: &[String]) -> Option<String> {
    if known.iter().any(|k| k == input) {
        return Some(input.to_string());
    }

    let norm = normalize(input);
    if let Some(k) = known.iter().find(|k| normalize(k) == norm) {
        return Some(k.clone());
    }

    let canonical = match norm.as_str() {
        "pd" | "prisoners" | "prisonersdilemma" => "PD",
        "hd" | "hawkdove" | "hawk" | "dove" => "HawkDove",
        "sh" | "stag" | "staghunt" | "hare" => "StagHunt",
        _ => return None,
    };
    known.iter().find(|k| k.as_str() == canonical).cloned()
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '\''))
        .flat_map(char::to_lowercase)
        .collect()
}

fn spec(actions: [&str; 2], values: [[i32; 2]; 4], description: &str) -> GameSpec {
    let [a, b] = actions;
    let keys = [(a, a), (a, b), (b, a), (b, b)];
    let payoffs = keys
        .iter()
        .zip(values)
        .map(|((x, y), v)| (format!("('{x}', '{y}')"), v))
        .collect();

    GameSpec {
        payoffs,
        valid_actions: vec![a.to_string(), b.to_string()],
        description: Some(description.to_string()),
    }
}
