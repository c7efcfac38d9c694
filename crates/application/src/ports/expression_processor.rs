//! Expression processor port

use stepwise_domain::Value;

/// Errors raised by an expression processor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    /// The expression was claimed but its arguments are malformed.
    #[error("{0}")]
    InvalidArguments(String),

    /// Evaluation failed.
    #[error("{0}")]
    Failed(String),
}

impl ExpressionError {
    /// Builds the error for a function called with the wrong number of arguments.
    #[must_use]
    pub fn argument_count(name: &str, expected: usize, args: &[String]) -> Self {
        let noun = if args.len() == 1 { "argument" } else { "arguments" };
        Self::InvalidArguments(format!(
            "The expected number of arguments for '{name}' expression is {expected}, but found {} {noun}: '{}'",
            args.len(),
            args.join(", ")
        ))
    }
}

/// A pluggable strategy evaluating `#{...}` expressions.
///
/// `expression` is the whole body between `#{` and the closing `}`, for
/// example `trim( text )`. A processor that does not recognise the body
/// returns `Ok(None)` so the next processor can try it.
pub trait ExpressionProcessor: Send + Sync {
    /// Evaluates `expression` if this processor claims it.
    ///
    /// # Errors
    /// Returns `ExpressionError` if the expression is claimed but cannot be
    /// evaluated.
    fn execute(&self, expression: &str) -> Result<Option<Value>, ExpressionError>;
}
