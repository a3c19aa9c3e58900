//! Matrix game payoff model

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Description used when neither the `GameSpec` nor the game name provides one
pub const FALLBACK_DESCRIPTION: &str = "Game payoff matrix";

/// Payoff value for one player in one round
pub type Payoff = i32;

// ============================================================================
// CORE TYPES
// ============================================================================

/// An action, stored as its index into the game's `valid_actions`.
///
/// Index 0 is the cooperative-like action and index 1 the defective-like
/// action, so generic strategies can play any game without knowing labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Action(pub u8);

impl Action {
    pub const COOPERATE: Action = Action(0);
    pub const DEFECT: Action = Action(1);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_cooperative(self) -> bool {
        self == Action::COOPERATE
    }

    pub fn is_defective(self) -> bool {
        self == Action::DEFECT
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declarative game description, as found in the arena configuration file.
///
/// Payoff keys encode an ordered action pair; `"('C', 'D')"`, `"(C, D)"` and
/// `"C,D"` are all accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSpec {
    pub payoffs: BTreeMap<String, [Payoff; 2]>,
    pub valid_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Immutable payoff model over a finite action alphabet
#[derive(Clone, Debug)]
pub struct Game {
    name: Option<String>,
    valid_actions: Vec<String>,
    payoffs: FxHashMap<(Action, Action), (Payoff, Payoff)>,
    description: String,
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl Game {
    /// Build a game from labels and a label-pair payoff table.
    ///
    /// Fails with `InvalidGameSpec` when there are fewer than two actions,
    /// duplicate labels, payoff entries for unknown labels, or any ordered
    /// pair without an entry.
    pub fn new<I, K>(valid_actions: Vec<String>, payoffs: I) -> Result<Self>
    where
        I: IntoIterator<Item = ((K, K), (Payoff, Payoff))>,
        K: AsRef<str>,
    {
        if valid_actions.len() < 2 {
            return Err(ArenaError::InvalidGameSpec(format!(
                "at least two valid actions required, got {}",
                valid_actions.len()
            )));
        }
        if valid_actions.len() > u8::MAX as usize {
            return Err(ArenaError::InvalidGameSpec(format!(
                "too many valid actions: {}",
                valid_actions.len()
            )));
        }
        for (i, label) in valid_actions.iter().enumerate() {
            if valid_actions[..i].contains(label) {
                return Err(ArenaError::InvalidGameSpec(format!(
                    "duplicate action label: {label}"
                )));
            }
        }

        let lookup = |label: &str| -> Result<Action> {
            valid_actions
                .iter()
                .position(|a| a == label)
                .map(|i| Action(i as u8))
                .ok_or_else(|| {
                    ArenaError::InvalidGameSpec(format!("payoff entry uses unknown action: {label}"))
                })
        };

        let mut table = FxHashMap::default();
        for ((a, b), payoff) in payoffs {
            let key = (lookup(a.as_ref())?, lookup(b.as_ref())?);
            if table.insert(key, payoff).is_some() {
                return Err(ArenaError::InvalidGameSpec(format!(
                    "duplicate payoff entry for ({}, {})",
                    a.as_ref(),
                    b.as_ref()
                )));
            }
        }

        let n = valid_actions.len() as u8;
        for a in 0..n {
            for b in 0..n {
                if !table.contains_key(&(Action(a), Action(b))) {
                    return Err(ArenaError::InvalidGameSpec(format!(
                        "missing payoff for ({}, {})",
                        valid_actions[a as usize], valid_actions[b as usize]
                    )));
                }
            }
        }

        Ok(Self {
            name: None,
            valid_actions,
            payoffs: table,
            description: FALLBACK_DESCRIPTION.to_string(),
        })
    }

    /// Build a game from its declarative spec. `name`, when present, feeds
    /// the default description.
    pub fn from_spec(name: Option<&str>, spec: &GameSpec) -> Result<Self> {
        let entries = spec
            .payoffs
            .iter()
            .map(|(key, value)| parse_action_pair(key).map(|pair| (pair, (value[0], value[1]))))
            .collect::<Result<Vec<_>>>()?;

        let mut game = Game::new(spec.valid_actions.clone(), entries)?;
        game.name = name.map(str::to_string);
        game.description = match (&spec.description, name) {
            (Some(desc), _) => desc.clone(),
            (None, Some(name)) => format!("{name} payoff matrix"),
            (None, None) => FALLBACK_DESCRIPTION.to_string(),
        };
        Ok(game)
    }

    /// Set the display description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the game name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Classic Prisoner's Dilemma: C/C=(3,3), C/D=(0,5), D/C=(5,0), D/D=(1,1)
    pub fn prisoners_dilemma() -> Self {
        let (c, d) = (Action::COOPERATE, Action::DEFECT);
        let payoffs = [((c, c), (3, 3)), ((c, d), (0, 5)), ((d, c), (5, 0)), ((d, d), (1, 1))];

        Self {
            name: Some("PD".to_string()),
            valid_actions: vec!["C".to_string(), "D".to_string()],
            payoffs: payoffs.into_iter().collect(),
            description: "Prisoner's Dilemma: mutual cooperation pays, defection tempts".to_string(),
        }
    }
}

// ============================================================================
// QUERIES
// ============================================================================

impl Game {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn valid_actions(&self) -> &[String] {
        &self.valid_actions
    }

    pub fn action_count(&self) -> usize {
        self.valid_actions.len()
    }

    /// Iterate over all actions in declared order
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        (0..self.valid_actions.len()).map(|i| Action(i as u8))
    }

    /// The cooperative-like action (index 0)
    pub fn cooperative(&self) -> Action {
        Action::COOPERATE
    }

    /// The defective-like action (index 1)
    pub fn defective(&self) -> Action {
        Action::DEFECT
    }

    /// Label for an action, if it belongs to this game
    pub fn label(&self, action: Action) -> Option<&str> {
        self.valid_actions.get(action.index()).map(String::as_str)
    }

    /// Validate a move label, returning its action
    pub fn validate_move(&self, label: &str) -> Result<Action> {
        self.valid_actions
            .iter()
            .position(|a| a == label)
            .map(|i| Action(i as u8))
            .ok_or_else(|| ArenaError::InvalidMove {
                action: label.to_string(),
                valid: self.valid_actions.clone(),
            })
    }

    /// Check that an action belongs to this game
    pub fn check_action(&self, action: Action) -> Result<Action> {
        if action.index() < self.valid_actions.len() {
            Ok(action)
        } else {
            Err(ArenaError::InvalidMove {
                action: action.to_string(),
                valid: self.valid_actions.clone(),
            })
        }
    }

    /// Payoff pair for the ordered pair `(a, b)`. Both moves are validated
    /// before the table lookup.
    pub fn get_payoff(&self, a: Action, b: Action) -> Result<(Payoff, Payoff)> {
        self.check_action(a)?;
        self.check_action(b)?;
        self.payoffs.get(&(a, b)).copied().ok_or_else(|| {
            ArenaError::InvalidGameSpec(format!("missing payoff for ({a}, {b})"))
        })
    }

    /// Payoff pair looked up by labels
    pub fn label_payoff(&self, a: &str, b: &str) -> Result<(Payoff, Payoff)> {
        let a = self.validate_move(a)?;
        let b = self.validate_move(b)?;
        self.get_payoff(a, b)
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

/// Parse an action-pair key such as `"('C', 'D')"` into its two labels
pub fn parse_action_pair(key: &str) -> Result<(String, String)> {
    let inner = key.trim();
    let inner = inner
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(inner);

    let parts: Vec<&str> = inner.split(',').collect();
    if parts.len() != 2 {
        return Err(ArenaError::InvalidGameSpec(format!(
            "payoff key must name two actions: {key}"
        )));
    }

    let clean = |s: &str| s.trim().trim_matches(|c| c == '\'' || c == '"').trim().to_string();
    let (a, b) = (clean(parts[0]), clean(parts[1]));
    if a.is_empty() || b.is_empty() {
        return Err(ArenaError::InvalidGameSpec(format!(
            "payoff key has an empty action: {key}"
        )));
    }
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pd_spec() -> GameSpec {
        let mut payoffs = BTreeMap::new();
        payoffs.insert("('C', 'C')".to_string(), [3, 3]);
        payoffs.insert("('C', 'D')".to_string(), [0, 5]);
        payoffs.insert("('D', 'C')".to_string(), [5, 0]);
        payoffs.insert("('D', 'D')".to_string(), [1, 1]);
        GameSpec {
            payoffs,
            valid_actions: vec!["C".to_string(), "D".to_string()],
            description: None,
        }
    }

    #[test]
    fn test_from_spec_parsing() {
        let game = Game::from_spec(None, &pd_spec()).unwrap();
        assert_eq!(game.valid_actions(), &["C".to_string(), "D".to_string()]);
        assert_eq!(game.label_payoff("C", "C").unwrap(), (3, 3));
        assert_eq!(game.label_payoff("D", "C").unwrap(), (5, 0));
    }

    #[test]
    fn test_get_payoff_all_outcomes() {
        let game = Game::prisoners_dilemma();
        assert_eq!(game.get_payoff(Action::COOPERATE, Action::COOPERATE).unwrap(), (3, 3));
        assert_eq!(game.get_payoff(Action::COOPERATE, Action::DEFECT).unwrap(), (0, 5));
        assert_eq!(game.get_payoff(Action::DEFECT, Action::COOPERATE).unwrap(), (5, 0));
        assert_eq!(game.get_payoff(Action::DEFECT, Action::DEFECT).unwrap(), (1, 1));
    }

    #[test]
    fn test_invalid_moves() {
        let game = Game::prisoners_dilemma();

        let err = game.label_payoff("X", "C").unwrap_err();
        assert!(matches!(err, ArenaError::InvalidMove { ref action, .. } if action == "X"));
        assert!(err.to_string().contains("Invalid move: X"));

        assert!(matches!(game.validate_move(""), Err(ArenaError::InvalidMove { .. })));
        assert!(matches!(game.label_payoff("C", "Invalid"), Err(ArenaError::InvalidMove { .. })));
        assert!(matches!(game.validate_move("Cooperate"), Err(ArenaError::InvalidMove { .. })));
    }

    #[test]
    fn test_out_of_range_action_is_invalid_move() {
        let game = Game::prisoners_dilemma();
        assert!(matches!(
            game.get_payoff(Action(2), Action::COOPERATE),
            Err(ArenaError::InvalidMove { .. })
        ));
        assert!(matches!(
            game.get_payoff(Action::COOPERATE, Action(7)),
            Err(ArenaError::InvalidMove { .. })
        ));
    }

    #[test]
    fn test_validate_move() {
        let game = Game::prisoners_dilemma();
        assert_eq!(game.validate_move("C").unwrap(), Action::COOPERATE);
        assert_eq!(game.validate_move("D").unwrap(), Action::DEFECT);
    }

    #[test]
    fn test_description_from_spec_and_fallbacks() {
        let mut spec = pd_spec();
        spec.description = Some("Hawk-Dove test".to_string());
        assert_eq!(Game::from_spec(Some("HD"), &spec).unwrap().description(), "Hawk-Dove test");

        spec.description = None;
        assert_eq!(Game::from_spec(Some("PD"), &spec).unwrap().description(), "PD payoff matrix");
        assert!(Game::from_spec(None, &spec)
            .unwrap()
            .description()
            .contains("Game payoff matrix"));
    }

    #[test]
    fn test_missing_pair_rejected() {
        let mut spec = pd_spec();
        spec.payoffs.remove("('D', 'D')");
        let err = Game::from_spec(None, &spec).unwrap_err();
        assert!(matches!(err, ArenaError::InvalidGameSpec(ref m) if m.contains("missing payoff")));
    }

    #[test]
    fn test_unknown_label_in_payoffs_rejected() {
        let mut spec = pd_spec();
        spec.payoffs.insert("('C', 'Z')".to_string(), [0, 0]);
        assert!(matches!(Game::from_spec(None, &spec), Err(ArenaError::InvalidGameSpec(_))));
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let result = Game::new(
            vec!["C".to_string(), "C".to_string()],
            [(("C", "C"), (1, 1))],
        );
        assert!(matches!(result, Err(ArenaError::InvalidGameSpec(_))));
    }

    #[test]
    fn test_single_action_rejected() {
        let result = Game::new(vec!["C".to_string()], [(("C", "C"), (1, 1))]);
        assert!(matches!(result, Err(ArenaError::InvalidGameSpec(_))));
    }

    #[test]
    fn test_parse_action_pair_encodings() {
        let expected = ("Stag".to_string(), "Hare".to_string());
        assert_eq!(parse_action_pair("('Stag', 'Hare')").unwrap(), expected);
        assert_eq!(parse_action_pair("(Stag, Hare)").unwrap(), expected);
        assert_eq!(parse_action_pair("Stag,Hare").unwrap(), expected);
        assert_eq!(parse_action_pair("(\"Stag\", \"Hare\")").unwrap(), expected);
        assert!(parse_action_pair("Stag").is_err());
        assert!(parse_action_pair("(a, b, c)").is_err());
        assert!(parse_action_pair("(, b)").is_err());
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_valid_pair_has_payoff(a in 0u8..2, b in 0u8..2) {
                let game = Game::prisoners_dilemma();
                prop_assert!(game.get_payoff(Action(a), Action(b)).is_ok());
            }

            #[test]
            fn invalid_action_fails_in_either_seat(x in 2u8..=255, other in 0u8..2) {
                let game = Game::prisoners_dilemma();
                let left = matches!(game.get_payoff(Action(x), Action(other)), Err(ArenaError::InvalidMove { .. }));
                let right = matches!(game.get_payoff(Action(other), Action(x)), Err(ArenaError::InvalidMove { .. }));
                prop_assert!(left && right);
            }

            #[test]
            fn unknown_label_is_invalid_move(label in "[a-zA-Z]{1,6}") {
                prop_assume!(label != "C" && label != "D");
                let game = Game::prisoners_dilemma();
                let rejected = matches!(game.label_payoff(&label, "C"), Err(ArenaError::InvalidMove { .. }));
                prop_assert!(rejected);
            }
        }
    }

    #[test]
    fn test_three_action_game() {
        let labels = ["R", "P", "S"];
        let mut entries = Vec::new();
        for a in labels {
            for b in labels {
                entries.push(((a, b), (0, 0)));
            }
        }
        let game = Game::new(labels.iter().map(|s| s.to_string()).collect(), entries).unwrap();
        assert_eq!(game.action_count(), 3);
        assert_eq!(game.label(Action(2)), Some("S"));
        assert_eq!(game.actions().count(), 3);
    }
}
