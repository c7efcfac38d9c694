//! Stepwise Domain - Core step parameter types
//!
//! This crate defines the data model shared by the resolution engine:
//! dynamically typed values, conversion targets, examples tables, raw data
//! payloads and the scoped variable store.
//! All types here are pure Rust with no I/O dependencies.

pub mod data;
pub mod error;
pub mod parameter;
pub mod table;
pub mod value;
pub mod variables;

pub use data::DataWrapper;
pub use error::{DomainError, DomainResult};
pub use parameter::{Parameter, SubSteps, TargetType};
pub use table::{ExamplesTable, Row};
pub use value::Value;
pub use variables::{VariableKey, VariableScope, Variables};
