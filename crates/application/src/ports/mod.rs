//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the resolution engine and the
//! surrounding test-execution context. Each port is a trait that can be
//! implemented by adapters in the infrastructure layer or by test fakes.

mod dynamic_variable;
mod execution_mode;
mod expression_processor;
mod step_monitor;
mod story_loader;
mod variable_store;

pub use dynamic_variable::{DynamicVariable, DynamicVariableError};
pub use execution_mode::ExecutionMode;
pub use expression_processor::{ExpressionError, ExpressionProcessor};
pub use step_monitor::{SilentStepMonitor, StepMonitor};
pub use story_loader::{StoryLoader, StoryLoaderError};
pub use variable_store::VariableStore;
