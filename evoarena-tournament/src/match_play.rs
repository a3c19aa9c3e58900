//! Match play - one repeated game between two move sources
//!
//! Level 2 - Phase-level implementation

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use evoarena_core::{Action, Game, NoiseModel, Payoff, Result, Strategy, StrategyRegistry};

use crate::config::{check_positive, MatchConfig, DEFAULT_SEED};

/// Anything that can supply a move for one seat of a match.
///
/// Every `Strategy` is a move source; external sources (a human at a
/// terminal, a scripted replay) implement this directly. Sources returning an
/// action outside the game make the match fail with `InvalidMove`.
pub trait MoveSource {
    /// Display label for logs and summaries
    fn label(&self) -> &str;

    /// Produce the next move given the opponent's moves so far
    fn next_move(&mut self, game: &Game, opponent_history: &[Action]) -> Result<Action>;
}

impl<S: Strategy + ?Sized> MoveSource for S {
    fn label(&self) -> &str {
        self.name()
    }

    fn next_move(&mut self, _game: &Game, opponent_history: &[Action]) -> Result<Action> {
        Ok(self.decide(opponent_history))
    }
}

/// One round of play, after noise
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub move_a: Action,
    pub move_b: Action,
    pub payoff_a: Payoff,
    pub payoff_b: Payoff,
}

/// Result of a match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Cumulative score for seat A
    pub score_a: i64,
    /// Cumulative score for seat B
    pub score_b: i64,
    /// Per-round trace, in play order
    pub rounds: Vec<RoundRecord>,
}

impl MatchResult {
    /// Both cumulative scores
    pub fn scores(&self) -> (i64, i64) {
        (self.score_a, self.score_b)
    }

    /// Move pairs in play order
    pub fn moves(&self) -> Vec<(Action, Action)> {
        self.rounds.iter().map(|r| (r.move_a, r.move_b)).collect()
    }

    /// Move pairs rendered with the game's labels
    pub fn labeled_moves(&self, game: &Game) -> Vec<(String, String)> {
        let label = |a: Action| game.label(a).unwrap_or("?").to_string();
        self.rounds
            .iter()
            .map(|r| (label(r.move_a), label(r.move_b)))
            .collect()
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Fraction of rounds in which seat A played the cooperative-like action
    pub fn cooperation_rate_a(&self) -> f64 {
        cooperation_rate(self.rounds.iter().map(|r| r.move_a))
    }

    /// Fraction of rounds in which seat B played the cooperative-like action
    pub fn cooperation_rate_b(&self) -> f64 {
        cooperation_rate(self.rounds.iter().map(|r| r.move_b))
    }
}

/// Match between two registry strategies, tagged with their names
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedMatch {
    pub strategies: (String, String),
    pub result: MatchResult,
}

/// Play a repeated game between two move sources (Level 2 phase)
///
/// Each round both sides decide from the opponent's history as of the start
/// of the round, noise is applied to each move independently, and the played
/// moves are scored and appended to the histories.
///
/// # Arguments
/// * `game` - Payoff model
/// * `player_a`, `player_b` - Seat A (row) and seat B (column)
/// * `rounds` - Number of rounds, at least 1
/// * `noise` - Flip probability in `[0, 0.2]`
/// * `rng` - Source of noise draws
pub fn play_match<A, B, R>(
    game: &Game,
    player_a: &mut A,
    player_b: &mut B,
    rounds: u32,
    noise: f64,
    rng: &mut R,
) -> Result<MatchResult>
where
    A: MoveSource + ?Sized,
    B: MoveSource + ?Sized,
    R: Rng + ?Sized,
{
    check_positive("rounds", rounds as usize)?;
    let noise = NoiseModel::new(noise)?;

    let mut history_a: Vec<Action> = Vec::with_capacity(rounds as usize);
    let mut history_b: Vec<Action> = Vec::with_capacity(rounds as usize);
    let mut records: Vec<RoundRecord> = Vec::with_capacity(rounds as usize);
    let mut score_a = 0i64;
    let mut score_b = 0i64;

    for _ in 0..rounds {
        let (move_a, move_b) = play_round(game, player_a, player_b, &history_a, &history_b, &noise, rng)?;

        let (payoff_a, payoff_b) = game.get_payoff(move_a, move_b)?;
        score_a += payoff_a as i64;
        score_b += payoff_b as i64;

        records.push(RoundRecord {
            move_a,
            move_b,
            payoff_a,
            payoff_b,
        });
        history_a.push(move_a);
        history_b.push(move_b);
    }

    tracing::debug!(
        "match {} vs {}: {} rounds, scores ({}, {})",
        player_a.label(),
        player_b.label(),
        rounds,
        score_a,
        score_b
    );

    Ok(MatchResult {
        score_a,
        score_b,
        rounds: records,
    })
}

/// Play a match between two registry strategies (Level 2 phase)
///
/// Fresh instances are created for both seats, so self-play is allowed.
pub fn play_named_match(
    game: &Game,
    registry: &StrategyRegistry,
    name_a: &str,
    name_b: &str,
    config: &MatchConfig,
) -> Result<NamedMatch> {
    config.validate()?;
    let mut strategy_a = registry.create(name_a)?;
    let mut strategy_b = registry.create(name_b)?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED));

    let result = play_match(game, &mut strategy_a, &mut strategy_b, config.rounds, config.noise, &mut rng)?;

    Ok(NamedMatch {
        strategies: (name_a.to_string(), name_b.to_string()),
        result,
    })
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Collect both moves for one round and apply noise
fn play_round<A, B, R>(
    game: &Game,
    player_a: &mut A,
    player_b: &mut B,
    history_a: &[Action],
    history_b: &[Action],
    noise: &NoiseModel,
    rng: &mut R,
) -> Result<(Action, Action)>
where
    A: MoveSource + ?Sized,
    B: MoveSource + ?Sized,
    R: Rng + ?Sized,
{
    let chosen_a = game.check_action(player_a.next_move(game, history_b)?)?;
    let chosen_b = game.check_action(player_b.next_move(game, history_a)?)?;

    let n = game.action_count();
    Ok((noise.apply(chosen_a, n, rng), noise.apply(chosen_b, n, rng)))
}

fn cooperation_rate(moves: impl ExactSizeIterator<Item = Action>) -> f64 {
    let total = moves.len();
    if total == 0 {
        return 0.0;
    }
    let cooperative = moves.filter(|a| a.is_cooperative()).count();
    cooperative as f64 / total as f64
}
