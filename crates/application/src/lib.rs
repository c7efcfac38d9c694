//! Stepwise Application - Step parameter resolution
//!
//! This crate defines the resolution engine with:
//! - Port traits (interfaces for variable stores, resources and monitoring)
//! - `${...}` variable resolution and `#{...}` expression evaluation
//! - The placeholder resolver interleaving both to a fixpoint
//! - Placeholder-aware conversion of raw step arguments to typed parameters

pub mod converters;
pub mod error;
pub mod expression;
pub mod placeholder;
pub mod ports;
pub mod variable_resolver;

pub use converters::{
    ExamplesTableConverter, FunctionalConverter, ParameterConverter, ParameterConverters,
    ParameterConvertersDecorator,
};
pub use error::{ResolutionError, ResolutionResult, ResolutionStage};
pub use expression::{
    DelegatingExpressionProcessor, ExpressionAdaptor, FunctionalExpressionProcessor,
    string_expression_processors,
};
pub use placeholder::{DEFAULT_MAX_ROUNDS, PlaceholderResolver};
pub use ports::{
    DynamicVariable, DynamicVariableError, ExecutionMode, ExpressionError, ExpressionProcessor,
    SilentStepMonitor, StepMonitor, StoryLoader, StoryLoaderError, VariableStore,
};
pub use variable_resolver::{BuiltinVariables, DynamicVariables, VariableResolver};
