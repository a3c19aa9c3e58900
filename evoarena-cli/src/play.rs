//! Play command - a basic session with strategy and/or human seats
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_seats(), report_session()
//! - Level 4: formatting utilities

use anyhow::{bail, Context, Result};
use clap::Args;

use evoarena_core::Game;
use evoarena_tournament::{play_session, MatchConfig, MatchResult, Seat, SessionMode};

use crate::arena::{print_json, resolve_seed, Arena};
use crate::human::StdinMoveSource;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Game name or abbreviation (PD, HawkDove, StagHunt, ...)
    #[arg(long, default_value = "PD")]
    pub game: String,

    /// 0 = strategy vs strategy, 1 = human vs strategy, 2 = human vs human
    #[arg(long, default_value = "0")]
    pub mode: u8,

    /// Strategy for seat one (mode 0)
    #[arg(long)]
    pub p1: Option<String>,

    /// Strategy for seat two (modes 0 and 1)
    #[arg(long)]
    pub p2: Option<String>,

    /// Rounds to play (default: config default_rounds)
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Probability of a move being flipped (0.0-0.2)
    #[arg(long, default_value = "0.0")]
    pub noise: f64,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Resolve game and mode
/// 2. Seat strategies and console players
/// 3. Play and report
pub fn run(args: PlayArgs, arena: &Arena, seed: Option<u64>) -> Result<()> {
    let game = arena.game(&args.game)?;
    let mode = SessionMode::from_id(args.mode).context("Invalid --mode")?;
    let config = MatchConfig::new(arena.rounds(args.rounds))
        .with_noise(args.noise)
        .with_seed(resolve_seed(seed));

    tracing::info!("Starting {:?} session of {}", mode, game.description());

    let mut human_one = StdinMoveSource::stdin("P1");
    let mut human_two = StdinMoveSource::stdin("P2");
    let (seat_one, seat_two) = match mode {
        SessionMode::Auto => (
            Seat::Strategy(required(&args.p1, "--p1", mode)?),
            Seat::Strategy(required(&args.p2, "--p2", mode)?),
        ),
        SessionMode::Single => (
            Seat::External(&mut human_one),
            Seat::Strategy(required(&args.p2, "--p2", mode)?),
        ),
        SessionMode::Multi => (Seat::External(&mut human_one), Seat::External(&mut human_two)),
    };

    let labels = seat_labels(&args, mode);
    let result = play_session(&game, &arena.registry, mode, seat_one, seat_two, &config)
        .context("Session failed")?;

    report_session(&game, &labels, &result, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn report_session(game: &Game, labels: &(String, String), result: &MatchResult, json: bool) -> Result<()> {
    if json {
        #[derive(serde::Serialize)]
        struct JsonSession<'a> {
            players: &'a (String, String),
            scores: (i64, i64),
            moves: Vec<(String, String)>,
        }

        return print_json(&JsonSession {
            players: labels,
            scores: result.scores(),
            moves: result.labeled_moves(game),
        });
    }

    println!("\n=== Session Results ===");
    for (i, (a, b)) in result.labeled_moves(game).iter().enumerate() {
        println!("  Round {:>3}: {} {}  {} {}", i + 1, labels.0, a, labels.1, b);
    }
    println!("Final scores: {} {}, {} {}", labels.0, result.score_a, labels.1, result.score_b);
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn required(value: &Option<String>, flag: &str, mode: SessionMode) -> Result<String> {
    match value {
        Some(v) => Ok(v.clone()),
        None => bail!("{flag} is required in {mode:?} mode"),
    }
}

fn seat_labels(args: &PlayArgs, mode: SessionMode) -> (String, String) {
    let strategy = |v: &Option<String>| v.clone().unwrap_or_default();
    match mode {
        SessionMode::Auto => (strategy(&args.p1), strategy(&args.p2)),
        SessionMode::Single => ("P1".to_string(), strategy(&args.p2)),
        SessionMode::Multi => ("P1".to_string(), "P2".to_string()),
    }
}
