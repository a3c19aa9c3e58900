//! Integration tests for the EvoArena strategy arena
//!
//! Tests the full stack: config-driven games, the registry, match play,
//! tournaments, evolution, and the `evoarena` binary itself

use std::process::Command;

use evoarena_core::{
    Action, ArenaConfig, ArenaError, DuplicatePolicy, Game, GameSpec, RegistryBuilder, Strategy,
    StrategyRegistry, TitForTat,
};
use evoarena_evolve::{evolve_with_callback, run_evolution, EvolutionConfig};
use evoarena_tournament::{
    play_match, play_named_match, run_round_robin, MatchConfig, TournamentConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

const ARENA_JSON: &str = r#"{
    "games": {
        "PD": {
            "payoffs": {
                "('C', 'C')": [3, 3],
                "('C', 'D')": [0, 5],
                "('D', 'C')": [5, 0],
                "('D', 'D')": [1, 1]
            },
            "valid_actions": ["C", "D"],
            "description": "Prisoner's Dilemma"
        },
        "RPS": {
            "payoffs": {
                "R,R": [0, 0], "R,P": [-1, 1], "R,S": [1, -1],
                "P,R": [1, -1], "P,P": [0, 0], "P,S": [-1, 1],
                "S,R": [-1, 1], "S,P": [1, -1], "S,S": [0, 0]
            },
            "valid_actions": ["R", "P", "S"]
        }
    },
    "strategies": ["AlwaysCooperate", "AlwaysDefect", "TitForTat", "GrimTrigger"],
    "default_rounds": 6
}"#;

fn arena() -> ArenaConfig {
    ArenaConfig::from_json(ARENA_JSON).expect("fixture config parses")
}

/// Defects on even rounds, cooperates otherwise
#[derive(Default)]
struct Alternator;

impl Strategy for Alternator {
    fn name(&self) -> &str {
        "Alternator"
    }

    fn decide(&self, opponent_history: &[Action]) -> Action {
        if opponent_history.len() % 2 == 0 {
            Action::DEFECT
        } else {
            Action::COOPERATE
        }
    }
}

// ============================================================================
// CONFIG + GAME
// ============================================================================

#[test]
fn test_config_games_build() {
    let config = arena();
    let pd = config.resolve_game("prisoners").unwrap();
    assert_eq!(pd.description(), "Prisoner's Dilemma");
    assert_eq!(pd.label_payoff("D", "C").unwrap(), (5, 0));

    let rps = config.game("RPS").unwrap();
    assert_eq!(rps.action_count(), 3);
    assert_eq!(rps.description(), "RPS payoff matrix");
    assert_eq!(config.rounds_or_default(None), 6);
}

#[test]
fn test_incomplete_game_rejected() {
    let mut spec: GameSpec = arena().games["PD"].clone();
    spec.payoffs.remove("('D', 'D')");
    assert!(matches!(
        Game::from_spec(Some("PD"), &spec),
        Err(ArenaError::InvalidGameSpec(_))
    ));
}

// ============================================================================
// MATCH + TOURNAMENT
// ============================================================================

#[test]
fn test_three_action_match_with_noise() {
    let game = arena().game("RPS").unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let result = play_match(&game, &mut TitForTat, &mut Alternator, 200, 0.2, &mut rng).unwrap();

    assert_eq!(result.round_count(), 200);
    // Noise never produces an action outside the game
    assert!(result.rounds.iter().all(|r| r.move_a.index() < 3 && r.move_b.index() < 3));
    let zero_sum = result.rounds.iter().all(|r| r.payoff_a + r.payoff_b == 0);
    assert!(zero_sum);
}

#[test]
fn test_custom_strategy_in_tournament() {
    let game = Game::prisoners_dilemma();
    let mut builder = RegistryBuilder::new(DuplicatePolicy::Reject);
    builder.register_type::<TitForTat>("TitForTat").unwrap();
    builder.register_type::<Alternator>("Alternator").unwrap();
    let registry = builder.build();

    let names = registry.names().to_vec();
    let config = TournamentConfig::round_robin(10, 2).with_seed(3);
    let result = run_round_robin(&game, &registry, &names, &config).unwrap();

    assert_eq!(result.matches_played, 8);
    assert_eq!(result.standings.len(), 2);
    let sum: i64 = result.total_scores.values().sum();
    assert_eq!(sum, result.standings.iter().map(|s| s.score).sum::<i64>());
}

#[test]
fn test_named_match_on_config_game() {
    let config = arena();
    let game = config.game("PD").unwrap();
    let registry = StrategyRegistry::builtin();

    let outcome = play_named_match(
        &game,
        &registry,
        "GrimTrigger",
        "AlwaysDefect",
        &MatchConfig::new(config.rounds_or_default(None)),
    )
    .unwrap();

    // Grim cooperates once, then defects: 0 + 5 * 1 vs 5 + 5 * 1
    assert_eq!(outcome.result.scores(), (5, 10));
}

// ============================================================================
// EVOLUTION
// ============================================================================

#[test]
fn test_evolution_on_config_arena() {
    let config = arena();
    let game = config.game("PD").unwrap();
    let registry = StrategyRegistry::builtin();
    let evo = EvolutionConfig::new(12, 4).with_opponents(3);

    let report = run_evolution(&game, &registry, &config.strategies, &evo, 50, 0.05, Some(8)).unwrap();

    assert_eq!(report.snapshots.len(), 4);
    for snapshot in &report.snapshots {
        let total: f64 = snapshot.frequencies.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(snapshot.max_fitness >= snapshot.avg_fitness);
    }
    assert_eq!(report.final_ranking.len(), 12);
    assert!(config.strategies.contains(&report.winner));
}

#[test]
fn test_evolution_observer_sees_each_generation() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut maxima = Vec::new();

    let outcome = evolve_with_callback(
        3,
        &EvolutionConfig::new(10, 5).with_parallel(false),
        |gene, _seed| Ok(gene as f64 * 2.0),
        |snapshot| maxima.push(snapshot.max_fitness),
        &mut rng,
    )
    .unwrap();

    assert_eq!(maxima.len(), 5);
    assert!(maxima.iter().all(|&m| m <= 4.0));
    assert_eq!(outcome.snapshots.len(), 5);
}

// ============================================================================
// BINARY
// ============================================================================

fn evoarena(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_evoarena"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch evoarena")
}

#[test]
fn test_binary_list() {
    let output = evoarena(&["list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("HawkDove"));
    assert!(stdout.contains("ForgivingTitForTat"));
}

#[test]
fn test_binary_match_json() {
    let output = evoarena(&[
        "match", "TitForTat", "AlwaysDefect", "--rounds", "3", "--json", "--seed", "1",
    ]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["scores"], serde_json::json!([2, 7]));
    assert_eq!(json["moves"][0], serde_json::json!(["C", "D"]));
}

#[test]
fn test_binary_tournament_json_is_deterministic() {
    let args = [
        "tournament", "--game", "sh", "--rounds", "8", "--repeats", "2", "--noise", "0.1", "--json", "--seed", "5",
    ];
    let first = evoarena(&args);
    let second = evoarena(&args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let json: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    assert_eq!(json["matches_played"], 50);
}

#[test]
fn test_binary_rejects_unknown_game() {
    let output = evoarena(&["match", "TitForTat", "TitForTat", "--game", "chess"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown game"));
}
