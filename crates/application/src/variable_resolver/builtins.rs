//! Built-in dynamic variables
//!
//! A handful of generators registered under kebab-case names. Every lookup
//! produces a fresh value; dry runs never reach them.

use chrono::Utc;
use rand::Rng;
use stepwise_domain::Value;
use uuid::Uuid;

use super::dynamic::DynamicVariables;

/// A built-in generator and the name it is registered under.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinInfo {
    /// Registered (kebab-case) name.
    pub name: &'static str,
    /// Shape of the generated value.
    pub description: &'static str,
    generate: fn() -> Value,
}

impl BuiltinInfo {
    /// Produces a fresh value.
    #[must_use]
    pub fn generate(&self) -> Value {
        (self.generate)()
    }
}

const BUILTINS: &[BuiltinInfo] = &[
    BuiltinInfo {
        name: "random-uuid",
        description: "hyphenated UUID v4 text",
        generate: random_uuid,
    },
    BuiltinInfo {
        name: "random-int",
        description: "integer in 0..=1000",
        generate: random_int,
    },
    BuiltinInfo {
        name: "current-timestamp",
        description: "seconds since the Unix epoch, as an integer",
        generate: current_timestamp,
    },
    BuiltinInfo {
        name: "current-date",
        description: "UTC date as YYYY-MM-DD text",
        generate: current_date,
    },
];

fn random_uuid() -> Value {
    Value::from(Uuid::new_v4().to_string())
}

fn random_int() -> Value {
    Value::Integer(rand::rng().random_range(0..=1000))
}

fn current_timestamp() -> Value {
    Value::Integer(Utc::now().timestamp())
}

fn current_date() -> Value {
    Value::from(Utc::now().date_naive().to_string())
}

/// Entry point to the built-in generators.
pub struct BuiltinVariables;

impl BuiltinVariables {
    /// Generates the value of the built-in registered as `name`.
    ///
    /// Aliases are not accepted here; they are handled by the registry.
    #[must_use]
    pub fn resolve(name: &str) -> Option<Value> {
        BUILTINS
            .iter()
            .find(|info| info.name == name)
            .map(BuiltinInfo::generate)
    }

    /// Registers every built-in into `registry`.
    pub fn register_all(registry: &mut DynamicVariables) {
        for info in BUILTINS {
            let info = *info;
            registry.register_fn(info.name, move || Ok(info.generate()));
        }
    }

    /// Returns the built-ins in registration order.
    #[must_use]
    pub const fn available() -> &'static [BuiltinInfo] {
        BUILTINS
    }
}
