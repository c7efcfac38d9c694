//! Step parameter conversion
//!
//! [`ParameterConverters`] is the base chain turning text into typed
//! parameters. [`ParameterConvertersDecorator`] sits in front of it and
//! resolves placeholders before anything is converted.

mod chain;
mod decorator;
mod table;

pub use chain::{FunctionalConverter, ParameterConverter, ParameterConverters};
pub use decorator::ParameterConvertersDecorator;
pub use table::ExamplesTableConverter;
