//! Thread-safe variable storage shared between the engine and step code

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use stepwise_application::ports::VariableStore;
use stepwise_domain::{Value, VariableScope, Variables};

/// A cloneable handle to one [`Variables`] store.
///
/// Clones share the same storage, so steps can save variables that later
/// resolutions will see.
#[derive(Debug, Clone, Default)]
pub struct SharedVariables {
    inner: Arc<RwLock<Variables>>,
}

impl SharedVariables {
    /// Creates storage seeded with batch variables.
    #[must_use]
    pub fn new(batch: HashMap<String, Value>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Variables::new(batch))),
        }
    }

    /// Stores a variable in the given scope.
    pub fn put(&self, scope: VariableScope, key: impl Into<String>, value: impl Into<Value>) {
        self.inner.write().put(scope, key, value);
    }

    /// Returns all variables flattened; narrower scopes win on conflicts.
    #[must_use]
    pub fn merged(&self) -> HashMap<String, Value> {
        self.inner.read().merged()
    }

    /// Opens a new step scope.
    pub fn init_step_variables(&self) {
        self.inner.write().init_step_variables();
    }

    /// Closes the innermost step scope.
    pub fn clear_step_variables(&self) {
        self.inner.write().clear_step_variables();
    }

    /// Clears the scenario scope.
    pub fn clear_scenario_variables(&self) {
        self.inner.write().clear_scenario_variables();
    }

    /// Clears the story scope.
    pub fn clear_story_variables(&self) {
        self.inner.write().clear_story_variables();
    }
}

impl VariableStore for SharedVariables {
    fn get(&self, name: &str) -> Option<Value> {
        self.inner.read().get(name)
    }
}
