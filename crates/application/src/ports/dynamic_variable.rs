//! Dynamic variable port

use stepwise_domain::Value;

/// Failure reported by a dynamic variable calculation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct DynamicVariableError(pub String);

impl DynamicVariableError {
    /// Creates an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A named value computed on demand rather than stored.
pub trait DynamicVariable: Send + Sync {
    /// Computes the current value.
    ///
    /// # Errors
    /// Returns `DynamicVariableError` if the value cannot be calculated.
    fn calculate_value(&self) -> Result<Value, DynamicVariableError>;
}

impl<F> DynamicVariable for F
where
    F: Fn() -> Result<Value, DynamicVariableError> + Send + Sync,
{
    fn calculate_value(&self) -> Result<Value, DynamicVariableError> {
        self()
    }
}
