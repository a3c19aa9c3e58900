//! Strategy registry - name to factory lookup
//!
//! The registry is assembled once by a `RegistryBuilder` before any match is
//! played. Everything downstream only resolves names against the finished
//! `StrategyRegistry`.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::{ArenaError, Result};
use crate::game::Action;
use crate::strategy::{
    AlwaysCooperate, AlwaysDefect, ForgivingTitForTat, GrimTrigger, Strategy, TitForTat,
};

/// Produces a fresh strategy instance
pub type StrategyFactory = Arc<dyn Fn() -> Box<dyn Strategy> + Send + Sync>;

/// What to do when a name is registered twice
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail the build with `DuplicateStrategy`
    Reject,
    /// Keep the first registration and log a warning
    #[default]
    SkipAndWarn,
}

/// Finished name -> factory mapping, in registration order
#[derive(Clone)]
pub struct StrategyRegistry {
    names: Vec<String>,
    factories: Vec<StrategyFactory>,
    index: FxHashMap<String, usize>,
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry").field("names", &self.names).finish()
    }
}

impl StrategyRegistry {
    /// Registry with the system strategies followed by the custom ones
    pub fn builtin() -> Self {
        let mut builder = RegistryBuilder::new(DuplicatePolicy::SkipAndWarn);
        for (name, factory) in builtin_factories() {
            builder.insert(name.to_string(), factory);
        }
        builder.build()
    }

    /// All known names in registration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up the factory for `name`
    pub fn resolve(&self, name: &str) -> Result<&StrategyFactory> {
        self.index
            .get(name)
            .map(|&i| &self.factories[i])
            .ok_or_else(|| ArenaError::UnknownStrategy {
                name: name.to_string(),
                available: self.names.clone(),
            })
    }

    /// Instantiate a fresh strategy by name
    ///
    /// The instance always reports `name` as its own name, so a type
    /// registered under an alias is labelled by the alias in match output.
    pub fn create(&self, name: &str) -> Result<Box<dyn Strategy>> {
        let strategy = (self.resolve(name)?)();
        if strategy.name() == name {
            return Ok(strategy);
        }
        Ok(Box::new(Aliased {
            name: name.to_string(),
            inner: strategy,
        }))
    }

    /// Check that every name resolves, returning the first failure
    pub fn check_all<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        for name in names {
            self.resolve(name.as_ref())?;
        }
        Ok(())
    }
}

/// Builds a `StrategyRegistry` from `(name, factory)` pairs
pub struct RegistryBuilder {
    policy: DuplicatePolicy,
    names: Vec<String>,
    factories: Vec<StrategyFactory>,
    index: FxHashMap<String, usize>,
}

impl RegistryBuilder {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            names: Vec::new(),
            factories: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Register a factory under `name`, applying the duplicate policy
    pub fn register(&mut self, name: impl Into<String>, factory: StrategyFactory) -> Result<&mut Self> {
        let name = name.into();
        if self.policy == DuplicatePolicy::Reject && self.index.contains_key(&name) {
            return Err(ArenaError::DuplicateStrategy(name));
        }
        self.insert(name, factory);
        Ok(self)
    }

    /// Add an entry, keeping the first registration of a repeated name
    fn insert(&mut self, name: String, factory: StrategyFactory) {
        if self.index.contains_key(&name) {
            tracing::warn!("duplicate strategy '{}' (skipping)", name);
            return;
        }

        tracing::debug!("registered strategy: {}", name);
        self.index.insert(name.clone(), self.names.len());
        self.names.push(name);
        self.factories.push(factory);
    }

    /// Register a default-constructible strategy type
    pub fn register_type<S>(&mut self, name: impl Into<String>) -> Result<&mut Self>
    where
        S: Strategy + Default + 'static,
    {
        self.register(name, Arc::new(|| Box::new(S::default()) as Box<dyn Strategy>))
    }

    pub fn build(self) -> StrategyRegistry {
        StrategyRegistry {
            names: self.names,
            factories: self.factories,
            index: self.index,
        }
    }
}

/// Build a registry from a list of entries in one step
pub fn build_registry<I, S>(entries: I, policy: DuplicatePolicy) -> Result<StrategyRegistry>
where
    I: IntoIterator<Item = (S, StrategyFactory)>,
    S: Into<String>,
{
    let mut builder = RegistryBuilder::new(policy);
    for (name, factory) in entries {
        builder.register(name, factory)?;
    }
    Ok(builder.build())
}

/// A strategy instance labelled with the name it was registered under
struct Aliased {
    name: String,
    inner: Box<dyn Strategy>,
}

impl Strategy for Aliased {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, opponent_history: &[Action]) -> Action {
        self.inner.decide(opponent_history)
    }
}

/// Factories for the built-in strategies, system first then custom
pub fn builtin_factories() -> Vec<(&'static str, StrategyFactory)> {
    fn factory<S: Strategy + Default + 'static>() -> StrategyFactory {
        Arc::new(|| Box::new(S::default()) as Box<dyn Strategy>)
    }

    vec![
        ("AlwaysCooperate", factory::<AlwaysCooperate>()),
        ("AlwaysDefect", factory::<AlwaysDefect>()),
        ("TitForTat", factory::<TitForTat>()),
        ("GrimTrigger", factory::<GrimTrigger>()),
        ("ForgivingTitForTat", factory::<ForgivingTitForTat>()),
    ]
}
