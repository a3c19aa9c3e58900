//! Configuration types for match, tournament and fitness play
//!
//! Level 4 - Utilities and configuration

use evoarena_core::{validate_noise, ArenaError, Result};

/// Seed used when a config carries none
pub const DEFAULT_SEED: u64 = 42;

/// Fitness matches are this fraction of the full match length...
pub const FITNESS_ROUND_DIVISOR: u32 = 5;

/// ...but never shorter than this
pub const MIN_FITNESS_ROUNDS: u32 = 10;

/// Configuration for a single repeated match
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// Rounds per match
    pub rounds: u32,
    /// Probability of a chosen move being flipped
    pub noise: f64,
    /// Random seed for reproducibility (None = DEFAULT_SEED)
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rounds: 100,
            noise: 0.0,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Create config for the given round count
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds,
            ..Default::default()
        }
    }

    /// Set noise probability
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("rounds", self.rounds as usize)?;
        validate_noise(self.noise)?;
        Ok(())
    }
}

/// Round-robin tournament configuration
#[derive(Clone, Debug, PartialEq)]
pub struct TournamentConfig {
    /// Rounds in each match
    pub rounds_per_match: u32,
    /// How many times the full pairing matrix is played
    pub repeats: u32,
    /// Probability of a chosen move being flipped
    pub noise: f64,
    /// Base seed; match `k` uses `seed + k`
    pub seed: Option<u64>,
    /// Whether to run matches in parallel
    pub parallel: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            rounds_per_match: 100,
            repeats: 1,
            noise: 0.0,
            seed: None,
            parallel: true,
        }
    }
}

impl TournamentConfig {
    /// Create round-robin config
    pub fn round_robin(rounds_per_match: u32, repeats: u32) -> Self {
        Self {
            rounds_per_match,
            repeats,
            ..Default::default()
        }
    }

    /// Set noise probability
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable parallel match execution
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("rounds_per_match", self.rounds_per_match as usize)?;
        check_positive("repeats", self.repeats as usize)?;
        validate_noise(self.noise)?;
        Ok(())
    }
}

/// Configuration for sampled fitness evaluation
#[derive(Clone, Debug, PartialEq)]
pub struct EvalConfig {
    /// Opponents drawn (with replacement) per evaluation
    pub opponents: usize,
    /// Rounds in each fitness match
    pub rounds: u32,
    /// Probability of a chosen move being flipped
    pub noise: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            opponents: 5,
            rounds: MIN_FITNESS_ROUNDS,
            noise: 0.0,
        }
    }
}

impl EvalConfig {
    /// Config whose match length is derived from the full match length
    pub fn for_match_length(rounds_per_match: u32) -> Self {
        Self {
            rounds: fitness_rounds(rounds_per_match),
            ..Default::default()
        }
    }

    /// Set opponents sampled per evaluation
    pub fn with_opponents(mut self, opponents: usize) -> Self {
        self.opponents = opponents;
        self
    }

    /// Set noise probability
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("opponents", self.opponents)?;
        check_positive("rounds", self.rounds as usize)?;
        validate_noise(self.noise)?;
        Ok(())
    }
}

/// Short match length used for fitness sampling
pub fn fitness_rounds(rounds_per_match: u32) -> u32 {
    (rounds_per_match / FITNESS_ROUND_DIVISOR).max(MIN_FITNESS_ROUNDS)
}

/// Fail with `InvalidParameter` unless `value` is at least 1
pub fn check_positive(what: &str, value: usize) -> Result<()> {
    if value == 0 {
        Err(ArenaError::InvalidParameter(format!("{what} must be positive")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_config_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.rounds, 100);
        assert_eq!(config.noise, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_match_config_rejects_zero_rounds() {
        assert!(matches!(
            MatchConfig::new(0).validate(),
            Err(ArenaError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_match_config_rejects_high_noise() {
        assert!(matches!(
            MatchConfig::new(10).with_noise(0.5).validate(),
            Err(ArenaError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_tournament_config_defaults() {
        let config = TournamentConfig::default();
        assert_eq!(config.repeats, 1);
        assert!(config.parallel);
    }

    #[test]
    fn test_tournament_config_rejects_zero_repeats() {
        let config = TournamentConfig::round_robin(10, 0);
        assert!(matches!(config.validate(), Err(ArenaError::InvalidParameter(_))));
    }

    #[test]
    fn test_fitness_rounds() {
        assert_eq!(fitness_rounds(100), 20);
        assert_eq!(fitness_rounds(50), 10);
        assert_eq!(fitness_rounds(10), MIN_FITNESS_ROUNDS);
        assert_eq!(fitness_rounds(1), MIN_FITNESS_ROUNDS);
    }

    #[test]
    fn test_eval_config_for_match_length() {
        let config = EvalConfig::for_match_length(200).with_opponents(3);
        assert_eq!(config.rounds, 40);
        assert_eq!(config.opponents, 3);
        assert!(config.validate().is_ok());
        assert!(config.with_opponents(0).validate().is_err());
    }
}
