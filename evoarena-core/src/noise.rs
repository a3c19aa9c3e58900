//! Execution-error model for chosen moves

use rand::Rng;

use crate::error::{ArenaError, Result};
use crate::game::Action;

/// Largest accepted flip probability
pub const MAX_NOISE: f64 = 0.2;

/// Validate a noise probability (must lie in `[0, MAX_NOISE]`)
pub fn validate_noise(probability: f64) -> Result<f64> {
    if (0.0..=MAX_NOISE).contains(&probability) {
        Ok(probability)
    } else {
        Err(ArenaError::InvalidParameter(format!(
            "noise probability must be in [0, {MAX_NOISE}], got {probability}"
        )))
    }
}

/// Possibly replace `chosen` by another action.
///
/// Flips when `draw < probability`; the replacement is the first action in
/// declared order that differs from `chosen`. With `probability == 0` this
/// is the identity.
pub fn apply_noise(chosen: Action, action_count: usize, probability: f64, draw: f64) -> Result<Action> {
    let probability = validate_noise(probability)?;
    if draw < probability {
        Ok(first_alternative(chosen, action_count))
    } else {
        Ok(chosen)
    }
}

fn first_alternative(chosen: Action, action_count: usize) -> Action {
    (0..action_count)
        .map(|i| Action(i as u8))
        .find(|&a| a != chosen)
        .unwrap_or(chosen)
}

/// Validated noise probability, applied with an RNG
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct NoiseModel {
    probability: f64,
}

impl NoiseModel {
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: validate_noise(probability)?,
        })
    }

    /// Noise-free model
    pub fn none() -> Self {
        Self { probability: 0.0 }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Apply noise to one chosen move, consuming one draw from `rng`
    pub fn apply<R: Rng + ?Sized>(&self, chosen: Action, action_count: usize, rng: &mut R) -> Action {
        if self.probability == 0.0 {
            return chosen;
        }
        if rng.gen::<f64>() < self.probability {
            first_alternative(chosen, action_count)
        } else {
            chosen
        }
    }
}
