//! Variable store port

use std::collections::HashMap;

use stepwise_domain::{Value, Variables};

/// Read access to the variables of the running test.
///
/// The engine treats the store as a flat synchronous lookup and re-reads it
/// on every resolution call.
pub trait VariableStore: Send + Sync {
    /// Returns the value stored under `name`, or `None` if it is unknown.
    fn get(&self, name: &str) -> Option<Value>;
}

impl VariableStore for Variables {
    fn get(&self, name: &str) -> Option<Value> {
        Self::get(self, name)
    }
}

impl VariableStore for HashMap<String, Value> {
    fn get(&self, name: &str) -> Option<Value> {
        Self::get(self, name).filter(|value| !value.is_null()).cloned()
    }
}
