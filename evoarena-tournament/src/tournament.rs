//! Tournament execution - repeated round-robin over a strategy list
//!
//! Level 1 - Orchestration and Level 2 - Phases

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use evoarena_core::{ArenaError, Game, Result, StrategyRegistry};

use crate::config::{TournamentConfig, DEFAULT_SEED};
use crate::match_play::play_match;

/// Standing of a participant in the tournament
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// Index of the strategy in the original name list
    pub index: usize,
    /// Strategy name
    pub name: String,
    /// Accumulated row-player score
    pub score: i64,
}

/// Result of a tournament
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentResult {
    /// Final standings sorted by score (descending), ties in list order
    pub standings: Vec<Standing>,
    /// Strategy name -> accumulated row-player score
    pub total_scores: BTreeMap<String, i64>,
    /// Average row score of `[row][column]` over all repeats
    pub average_scores: Vec<Vec<f64>>,
    /// Number of matches played
    pub matches_played: usize,
    /// Number of times the full pairing matrix was played
    pub repeats: u32,
}

impl TournamentResult {
    /// Get winner (top standing)
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }

    /// Get top N performers
    pub fn top_n(&self, n: usize) -> &[Standing] {
        let n = n.min(self.standings.len());
        &self.standings[..n]
    }

    /// Get standing for a specific strategy index
    pub fn standing_for(&self, index: usize) -> Option<&Standing> {
        self.standings.iter().find(|s| s.index == index)
    }

    pub fn total_score(&self, name: &str) -> Option<i64> {
        self.total_scores.get(name).copied()
    }

    /// (name, score) pairs in ranking order
    pub fn ranking(&self) -> Vec<(&str, i64)> {
        self.standings
            .iter()
            .map(|s| (s.name.as_str(), s.score))
            .collect()
    }
}

/// One scheduled match: seat indices plus its position in the schedule
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pairing {
    index: u64,
    row: usize,
    column: usize,
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Run a repeated round-robin tournament (Level 1 orchestration)
///
/// Every repeat plays every ordered pair of `names`, self-play included, and
/// credits the row player with its score.
///
/// # Arguments
/// * `game` - Payoff model
/// * `registry` - Source of fresh strategy instances
/// * `names` - Participants, in tie-break order
/// * `config` - Tournament configuration
///
/// # Returns
/// Tournament results with final standings
pub fn run_round_robin(
    game: &Game,
    registry: &StrategyRegistry,
    names: &[String],
    config: &TournamentConfig,
) -> Result<TournamentResult> {
    check_participants(registry, names)?;
    config.validate()?;

    let n = names.len();
    tracing::info!(
        "round-robin: {} strategies, {} repeats, {} rounds per match",
        n,
        config.repeats,
        config.rounds_per_match
    );

    let pairings = generate_round_robin_pairings(n, config.repeats);
    let row_scores = execute_all_matches(game, registry, names, &pairings, config)?;
    let (totals, matrix) = accumulate_scores(n, &pairings, &row_scores);
    let standings = compute_standings(names, &totals);

    let average_scores = matrix
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|sum| sum as f64 / config.repeats as f64)
                .collect()
        })
        .collect();

    if let Some(top) = standings.first() {
        tracing::info!("round-robin finished: {} leads with {}", top.name, top.score);
    }

    Ok(TournamentResult {
        total_scores: names.iter().cloned().zip(totals).collect(),
        standings,
        average_scores,
        matches_played: row_scores.len(),
        repeats: config.repeats,
    })
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// Reject empty, duplicated or unknown participant lists
fn check_participants(registry: &StrategyRegistry, names: &[String]) -> Result<()> {
    if names.is_empty() {
        return Err(ArenaError::NoStrategiesAvailable);
    }

    let mut seen = FxHashSet::default();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(ArenaError::InvalidParameter(format!(
                "strategy '{name}' listed more than once"
            )));
        }
    }

    registry.check_all(names)
}

/// Execute every scheduled match, returning the row score of each
fn execute_all_matches(
    game: &Game,
    registry: &StrategyRegistry,
    names: &[String],
    pairings: &[Pairing],
    config: &TournamentConfig,
) -> Result<Vec<i64>> {
    let base_seed = config.seed.unwrap_or(DEFAULT_SEED);

    if config.parallel {
        pairings
            .par_iter()
            .map(|p| execute_match(game, registry, names, p, config, base_seed))
            .collect()
    } else {
        pairings
            .iter()
            .map(|p| execute_match(game, registry, names, p, config, base_seed))
            .collect()
    }
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Generate all ordered pairings, self-play included, for every repeat
fn generate_round_robin_pairings(n: usize, repeats: u32) -> Vec<Pairing> {
    let mut pairings = Vec::with_capacity(n * n * repeats as usize);
    let mut index = 0u64;
    for _ in 0..repeats {
        for row in 0..n {
            for column in 0..n {
                pairings.push(Pairing { index, row, column });
                index += 1;
            }
        }
    }
    pairings
}

/// Play one match with fresh instances and its own noise stream
fn execute_match(
    game: &Game,
    registry: &StrategyRegistry,
    names: &[String],
    pairing: &Pairing,
    config: &TournamentConfig,
    base_seed: u64,
) -> Result<i64> {
    let mut row = registry.create(&names[pairing.row])?;
    let mut column = registry.create(&names[pairing.column])?;
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(pairing.index));

    let result = play_match(
        game,
        &mut row,
        &mut column,
        config.rounds_per_match,
        config.noise,
        &mut rng,
    )?;
    Ok(result.score_a)
}

/// Fold row scores into per-strategy totals and the pairwise sum matrix
fn accumulate_scores(
    n: usize,
    pairings: &[Pairing],
    row_scores: &[i64],
) -> (Vec<i64>, Vec<Vec<i64>>) {
    let mut totals = vec![0i64; n];
    let mut matrix = vec![vec![0i64; n]; n];

    for (pairing, &score) in pairings.iter().zip(row_scores) {
        totals[pairing.row] += score;
        matrix[pairing.row][pairing.column] += score;
    }

    (totals, matrix)
}

/// Compute final standings: descending score, stable on list order
fn compute_standings(names: &[String], totals: &[i64]) -> Vec<Standing> {
    let mut standings: Vec<Standing> = names
        .iter()
        .zip(totals)
        .enumerate()
        .map(|(index, (name, &score))| Standing {
            index,
            name: name.clone(),
            score,
        })
        .collect();

    standings.sort_by(|a, b| b.score.cmp(&a.score));
    standings
}
