//! Basic game sessions - strategy and external seats
//!
//! Level 2 - Phase-level implementation

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use evoarena_core::{ArenaError, Game, Result, Strategy, StrategyRegistry};

use crate::config::{MatchConfig, DEFAULT_SEED};
use crate::match_play::{play_match, MatchResult, MoveSource};

/// Who plays which seat in a basic session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMode {
    /// Strategy vs strategy
    Auto,
    /// External source in seat one vs strategy in seat two
    Single,
    /// External source in both seats
    Multi,
}

impl SessionMode {
    /// Map a numeric mode id (0, 1, 2) to a mode
    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(SessionMode::Auto),
            1 => Ok(SessionMode::Single),
            2 => Ok(SessionMode::Multi),
            other => Err(ArenaError::InvalidParameter(format!(
                "mode must be 0 (auto), 1 (single), 2 (multi), got {other}"
            ))),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            SessionMode::Auto => 0,
            SessionMode::Single => 1,
            SessionMode::Multi => 2,
        }
    }
}

/// One seat of a session
pub enum Seat<'a> {
    /// A registry strategy, by name
    Strategy(String),
    /// An external move source such as a console player
    External(&'a mut dyn MoveSource),
}

impl Seat<'_> {
    fn is_strategy(&self) -> bool {
        matches!(self, Seat::Strategy(_))
    }
}

/// Play a basic session (Level 2 phase)
///
/// The seats must agree with `mode`: `Auto` takes two strategies, `Single`
/// an external seat one and a strategy seat two, `Multi` two external seats.
pub fn play_session(
    game: &Game,
    registry: &StrategyRegistry,
    mode: SessionMode,
    seat_one: Seat<'_>,
    seat_two: Seat<'_>,
    config: &MatchConfig,
) -> Result<MatchResult> {
    check_seats(mode, &seat_one, &seat_two)?;
    config.validate()?;

    tracing::info!(
        "starting session: mode={:?}, rounds={}, noise={}",
        mode,
        config.rounds,
        config.noise
    );

    let mut owned_one: Box<dyn Strategy>;
    let mut owned_two: Box<dyn Strategy>;

    let source_one: &mut dyn MoveSource = match seat_one {
        Seat::Strategy(name) => {
            owned_one = registry.create(&name)?;
            &mut owned_one
        }
        Seat::External(source) => source,
    };
    let source_two: &mut dyn MoveSource = match seat_two {
        Seat::Strategy(name) => {
            owned_two = registry.create(&name)?;
            &mut owned_two
        }
        Seat::External(source) => source,
    };

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED));
    play_match(game, source_one, source_two, config.rounds, config.noise, &mut rng)
}

fn check_seats(mode: SessionMode, one: &Seat<'_>, two: &Seat<'_>) -> Result<()> {
    let ok = match mode {
        SessionMode::Auto => one.is_strategy() && two.is_strategy(),
        SessionMode::Single => !one.is_strategy() && two.is_strategy(),
        SessionMode::Multi => !one.is_strategy() && !two.is_strategy(),
    };
    if ok {
        return Ok(());
    }

    let message = match mode {
        SessionMode::Auto => "auto mode requires a strategy in both seats",
        SessionMode::Single => "single mode requires an external seat one and a strategy seat two",
        SessionMode::Multi => "multi mode requires external sources in both seats",
    };
    Err(ArenaError::invalid_parameter(message))
}
