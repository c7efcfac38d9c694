//! Variable key parsing
//!
//! A key may carry a default value after the first colon
//! (`name:default`) and may address nested data (`name[0].key.sub`).

use std::collections::HashMap;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::value::Value;

static COMPOUND_KEY: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^([^\[\].:]+):?(?:\[(\d+)])?:?(?:\.([^:]+))?:?")
        .expect("compound key pattern is valid")
});

/// A variable key split into its name and optional default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableKey<'a> {
    /// The full key as written.
    pub key: &'a str,
    /// The key without the default value part.
    pub name: &'a str,
    /// The text after the first colon, if any.
    pub default_value: Option<&'a str>,
}

impl<'a> VariableKey<'a> {
    /// Parses a key.
    #[must_use]
    pub fn parse(key: &'a str) -> Self {
        match key.split_once(':') {
            Some((name, default_value)) => Self {
                key,
                name,
                default_value: Some(default_value),
            },
            None => Self {
                key,
                name: key,
                default_value: None,
            },
        }
    }
}

/// Nested access parsed from a compound key.
struct CompoundKey<'a> {
    name: &'a str,
    index: Option<usize>,
    field: Option<&'a str>,
}

impl<'a> CompoundKey<'a> {
    fn parse(key: &'a str) -> Option<Self> {
        let captures = COMPOUND_KEY.captures(key)?;
        let name = captures.get(1)?.as_str();
        let index = match captures.get(2) {
            Some(index) => Some(index.as_str().parse().ok()?),
            None => None,
        };
        Some(Self {
            name,
            index,
            field: captures.get(3).map(|field| field.as_str()),
        })
    }

    fn resolve(&self, variable: &Value) -> Option<Value> {
        let item = match (self.index, variable) {
            (Some(index), Value::List(items)) => items.get(index)?,
            _ => variable,
        };
        match (self.field, item) {
            (None, _) => Some(item.clone()),
            (Some(field), Value::Map(entries)) => resolve_in_map(entries, field),
            // Field access on anything else yields the value itself.
            (Some(_), other) => Some(other.clone()),
        }
    }
}

/// Resolves a compound key against one variable scope.
pub(crate) fn resolve_compound(scope: &HashMap<String, Value>, key: &str) -> Option<Value> {
    let compound = CompoundKey::parse(key)?;
    let variable = scope.get(compound.name)?;
    compound.resolve(variable)
}

fn resolve_in_map(entries: &IndexMap<String, Value>, key: &str) -> Option<Value> {
    if let Some(value) = entries.get(key) {
        return Some(value.clone());
    }
    let compound = CompoundKey::parse(key)?;
    compound.resolve(entries.get(compound.name)?)
}
