//! Strategy decision interface and the built-in strategies
//!
//! Strategies see only the opponent's past moves, oldest first, and speak in
//! terms of cooperative-like (`Action::COOPERATE`) and defective-like
//! (`Action::DEFECT`) actions so that the same strategy plays every game.

use crate::game::Action;

/// A decision unit: opponent history in, next move out.
///
/// Implementations must not depend on state carried between calls; anything
/// they need has to be derivable from `opponent_history`.
pub trait Strategy: Send + Sync {
    /// Registry name of this strategy
    fn name(&self) -> &str;

    /// Choose the next move given the opponent's moves so far
    fn decide(&self, opponent_history: &[Action]) -> Action;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decide(&self, opponent_history: &[Action]) -> Action {
        (**self).decide(opponent_history)
    }
}

// ============================================================================
// SYSTEM STRATEGIES
// ============================================================================

/// Cooperates unconditionally
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysCooperate;

impl Strategy for AlwaysCooperate {
    fn name(&self) -> &str {
        "AlwaysCooperate"
    }

    fn decide(&self, _opponent_history: &[Action]) -> Action {
        Action::COOPERATE
    }
}

/// Defects unconditionally
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysDefect;

impl Strategy for AlwaysDefect {
    fn name(&self) -> &str {
        "AlwaysDefect"
    }

    fn decide(&self, _opponent_history: &[Action]) -> Action {
        Action::DEFECT
    }
}

/// Cooperates first, then mirrors the opponent's last move
#[derive(Clone, Copy, Debug, Default)]
pub struct TitForTat;

impl Strategy for TitForTat {
    fn name(&self) -> &str {
        "TitForTat"
    }

    fn decide(&self, opponent_history: &[Action]) -> Action {
        opponent_history.last().copied().unwrap_or(Action::COOPERATE)
    }
}

/// Cooperates until the opponent defects once, then defects forever
#[derive(Clone, Copy, Debug, Default)]
pub struct GrimTrigger;

impl Strategy for GrimTrigger {
    fn name(&self) -> &str {
        "GrimTrigger"
    }

    fn decide(&self, opponent_history: &[Action]) -> Action {
        if opponent_history.contains(&Action::DEFECT) {
            Action::DEFECT
        } else {
            Action::COOPERATE
        }
    }
}

// ============================================================================
// CUSTOM STRATEGIES
// ============================================================================

/// Tit-for-tat that forgives a double defection.
///
/// Cooperates when the opponent's two most recent moves were both
/// defective-like, otherwise mirrors like `TitForTat`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForgivingTitForTat;

impl Strategy for ForgivingTitForTat {
    fn name(&self) -> &str {
        "ForgivingTitForTat"
    }

    fn decide(&self, opponent_history: &[Action]) -> Action {
        match opponent_history {
            [] => Action::COOPERATE,
            [.., Action::DEFECT, Action::DEFECT] => Action::COOPERATE,
            [.., last] => *last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: Action = Action::COOPERATE;
    const D: Action = Action::DEFECT;

    #[test]
    fn test_always_cooperate() {
        assert_eq!(AlwaysCooperate.decide(&[]), C);
        assert_eq!(AlwaysCooperate.decide(&[D, C, D]), C);
        assert_eq!(AlwaysCooperate.decide(&[C; 10]), C);
    }

    #[test]
    fn test_always_defect() {
        assert_eq!(AlwaysDefect.decide(&[]), D);
        assert_eq!(AlwaysDefect.decide(&[C, D]), D);
        assert_eq!(AlwaysDefect.decide(&[D; 5]), D);
    }

    #[test]
    fn test_tit_for_tat() {
        assert_eq!(TitForTat.decide(&[]), C);
        assert_eq!(TitForTat.decide(&[C]), C);
        assert_eq!(TitForTat.decide(&[D]), D);
        assert_eq!(TitForTat.decide(&[C, D, C]), C);
    }

    #[test]
    fn test_tit_for_tat_mirrors_other_actions() {
        assert_eq!(TitForTat.decide(&[C, Action(2)]), Action(2));
    }

    #[test]
    fn test_grim_trigger() {
        assert_eq!(GrimTrigger.decide(&[]), C);
        assert_eq!(GrimTrigger.decide(&[C, C]), C);
        assert_eq!(GrimTrigger.decide(&[C, D]), D);
        assert_eq!(GrimTrigger.decide(&[D]), D);
        assert_eq!(GrimTrigger.decide(&[C, D, C, C]), D);
    }

    #[test]
    fn test_forgiving_tit_for_tat() {
        assert_eq!(ForgivingTitForTat.decide(&[]), C);
        assert_eq!(ForgivingTitForTat.decide(&[D]), D);
        assert_eq!(ForgivingTitForTat.decide(&[D, D]), C);
        assert_eq!(ForgivingTitForTat.decide(&[C, D, D]), C);
        assert_eq!(ForgivingTitForTat.decide(&[D, D, C]), C);
        assert_eq!(ForgivingTitForTat.decide(&[D, C, D]), D);
    }

    #[test]
    fn test_names() {
        let strategies: [&dyn Strategy; 5] = [
            &AlwaysCooperate,
            &AlwaysDefect,
            &TitForTat,
            &GrimTrigger,
            &ForgivingTitForTat,
        ];
        let names: Vec<&str> = strategies.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            ["AlwaysCooperate", "AlwaysDefect", "TitForTat", "GrimTrigger", "ForgivingTitForTat"]
        );
    }

    mod props {
        use super::{C, D};
        use crate::game::Action;
        use crate::strategy::{GrimTrigger, Strategy as _, TitForTat};
        use proptest::prelude::*;

        fn history() -> impl Strategy<Value = Vec<Action>> {
            proptest::collection::vec((0u8..2).prop_map(Action), 0..40)
        }

        proptest! {
            #[test]
            fn grim_trigger_never_forgives(prefix in history(), suffix in history()) {
                let mut h = prefix;
                h.push(D);
                h.extend(suffix);
                prop_assert_eq!(GrimTrigger.decide(&h), D);
            }

            #[test]
            fn tit_for_tat_mirrors_last(h in history()) {
                let expected = h.last().copied().unwrap_or(C);
                prop_assert_eq!(TitForTat.decide(&h), expected);
            }
        }
    }
}
