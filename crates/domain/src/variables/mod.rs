//! Scoped variable storage
//!
//! Variables live in four scopes. Lookups walk them from the narrowest to
//! the widest: step (innermost step first), scenario, story, batch. A key
//! that no scope knows falls back to the process environment.

mod key;

use std::collections::HashMap;

pub use key::VariableKey;

use crate::value::Value;

/// The scope a variable is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VariableScope {
    /// Variables shared by every story of a batch - widest scope.
    Batch = 0,
    /// Variables of the running story.
    Story = 1,
    /// Variables of the running scenario.
    Scenario = 2,
    /// Variables of the running step - narrowest scope.
    Step = 3,
}

impl VariableScope {
    /// Returns a human-readable name for the scope.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Batch => "Batch",
            Self::Story => "Story",
            Self::Scenario => "Scenario",
            Self::Step => "Step",
        }
    }
}

/// Variable storage for one test execution thread.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    batch: HashMap<String, Value>,
    story: HashMap<String, Value>,
    scenario: HashMap<String, Value>,
    steps: Vec<HashMap<String, Value>>,
}

impl Variables {
    /// Creates storage seeded with batch variables.
    #[must_use]
    pub fn new(batch: HashMap<String, Value>) -> Self {
        Self {
            batch,
            ..Self::default()
        }
    }

    /// Looks a variable up by key.
    ///
    /// The key may address nested data (`list[0].field`) and may carry a
    /// default value after its first colon (`name:default`).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        let variable_key = VariableKey::parse(key);
        self.scopes()
            .find_map(|scope| Self::get_in_scope(scope, &variable_key))
            .or_else(|| variable_key.default_value.map(Value::from))
            .or_else(|| Self::get_environment_variable(key))
    }

    fn get_in_scope(scope: &HashMap<String, Value>, key: &VariableKey<'_>) -> Option<Value> {
        scope
            .get(key.key)
            .or_else(|| key.default_value.and_then(|_| scope.get(key.name)))
            .cloned()
            .or_else(|| key::resolve_compound(scope, key.key))
            .filter(|value| !value.is_null())
    }

    fn get_environment_variable(key: &str) -> Option<Value> {
        if key.trim().is_empty() {
            return None;
        }
        std::env::var(key).ok().map(Value::from)
    }

    fn scopes(&self) -> impl Iterator<Item = &HashMap<String, Value>> {
        self.steps
            .iter()
            .rev()
            .chain([&self.scenario, &self.story, &self.batch])
    }

    /// Returns all variables flattened; narrower scopes win on conflicts.
    #[must_use]
    pub fn merged(&self) -> HashMap<String, Value> {
        let mut merged = HashMap::new();
        let scopes: Vec<_> = self.scopes().collect();
        for scope in scopes.into_iter().rev() {
            merged.extend(scope.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    /// Stores a variable in the given scope.
    ///
    /// Storing a step variable outside of any step opens a step scope.
    pub fn put(&mut self, scope: VariableScope, key: impl Into<String>, value: impl Into<Value>) {
        let (key, value) = (key.into(), value.into());
        match scope {
            VariableScope::Batch => {
                self.batch.insert(key, value);
            }
            VariableScope::Story => {
                self.story.insert(key, value);
            }
            VariableScope::Scenario => {
                self.scenario.insert(key, value);
            }
            VariableScope::Step => {
                if self.steps.is_empty() {
                    self.init_step_variables();
                }
                if let Some(step) = self.steps.last_mut() {
                    step.insert(key, value);
                }
            }
        }
    }

    /// Opens a new step scope.
    pub fn init_step_variables(&mut self) {
        self.steps.push(HashMap::new());
    }

    /// Closes the innermost step scope; does nothing if none is open.
    pub fn clear_step_variables(&mut self) {
        self.steps.pop();
    }

    /// Removes all scenario variables.
    pub fn clear_scenario_variables(&mut self) {
        self.scenario.clear();
    }

    /// Removes all story variables.
    pub fn clear_story_variables(&mut self) {
        self.story.clear();
    }
}
