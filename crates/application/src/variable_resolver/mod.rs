//! Variable resolution module
//!
//! Provides parsing and resolution of `${variable}` placeholders against a
//! [`VariableStore`](crate::ports::VariableStore) and a registry of dynamic
//! variables.
//!
//! # Usage
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use stepwise_application::variable_resolver::{DynamicVariables, VariableResolver};
//! use stepwise_domain::Value;
//!
//! let store = HashMap::from([("host".to_string(), Value::from("localhost"))]);
//! let resolver = VariableResolver::new(
//!     Arc::new(store),
//!     Arc::new(DynamicVariables::new()),
//!     Arc::new(false),
//! );
//!
//! let result = resolver.resolve("http://${host}/api").unwrap();
//! assert_eq!(result, Value::from("http://localhost/api"));
//! ```

pub mod builtins;
pub mod dynamic;
pub mod engine;
pub mod naming;
pub mod parser;

pub use builtins::{BuiltinInfo, BuiltinVariables};
pub use dynamic::DynamicVariables;
pub use engine::{DEFAULT_MAX_PASSES, DEFAULT_MAX_RESOLVED_LEN, VariableResolver};
pub use parser::{
    PlaceholderReference, extract_placeholder_names, has_placeholders, parse_placeholders,
};
