//! Dynamic variable registry

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use stepwise_domain::Value;

use super::builtins::BuiltinVariables;
use super::naming;
use crate::ports::{DynamicVariable, DynamicVariableError};

/// Maps names to on-demand value providers.
///
/// Lookups accept both the registered name and its kebab-case/camelCase
/// alias.
#[derive(Clone, Default)]
pub struct DynamicVariables {
    variables: IndexMap<String, Arc<dyn DynamicVariable>>,
}

impl DynamicVariables {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in dynamic variables.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        BuiltinVariables::register_all(&mut registry);
        registry
    }

    /// Registers a provider, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, variable: impl DynamicVariable + 'static) {
        self.variables.insert(name.into(), Arc::new(variable));
    }

    /// Registers a closure as a provider.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, provider: F)
    where
        F: Fn() -> Result<Value, DynamicVariableError> + Send + Sync + 'static,
    {
        self.register(name, provider);
    }

    /// Returns the provider for `name` or its alias.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn DynamicVariable>> {
        self.variables.get(name).or_else(|| {
            naming::alias(name).and_then(|alias| self.variables.get(alias.as_str()))
        })
    }

    /// Returns the registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Returns the number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl fmt::Debug for DynamicVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicVariables")
            .field("names", &self.variables.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn constant(value: &'static str) -> impl DynamicVariable {
        move || Ok::<_, DynamicVariableError>(Value::from(value))
    }

    #[test]
    fn test_lookup_by_alias() {
        let mut registry = DynamicVariables::new();
        registry.register("dynamic-key", constant("kebab"));
        registry.register("otherKey", constant("camel"));

        let value = |name: &str| registry.get(name).map(|v| v.calculate_value().unwrap());
        assert_eq!(value("dynamic-key"), Some(Value::from("kebab")));
        assert_eq!(value("dynamicKey"), Some(Value::from("kebab")));
        assert_eq!(value("other-key"), Some(Value::from("camel")));
        assert_eq!(value("missing"), None);
    }

    #[test]
    fn test_exact_name_wins_over_alias() {
        let mut registry = DynamicVariables::new();
        registry.register("some-name", constant("kebab"));
        registry.register("someName", constant("camel"));

        let value = registry.get("someName").unwrap().calculate_value().unwrap();
        assert_eq!(value, Value::from("camel"));
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = DynamicVariables::with_builtins();
        assert!(registry.get("random-uuid").is_some());
        assert!(registry.get("randomUuid").is_some());
        assert_eq!(registry.len(), BuiltinVariables::available().len());
    }
}
