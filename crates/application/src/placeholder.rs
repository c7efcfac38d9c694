//! Placeholder resolution
//!
//! Interleaves variable resolution and expression evaluation until the text
//! stops changing. Either stage can unlock the other: `${var#{expr}}` needs
//! the expression before the variable, `#{eval(${var} + 1)}` the reverse.

use stepwise_domain::Value;
use tracing::{debug, trace};

use crate::error::{ResolutionError, ResolutionResult, ResolutionStage};
use crate::expression::ExpressionAdaptor;
use crate::variable_resolver::{DEFAULT_MAX_RESOLVED_LEN, VariableResolver};

/// Default ceiling on variable/expression rounds for one input.
pub const DEFAULT_MAX_ROUNDS: usize = 16;

const NULL_EXPRESSION: &str = "#{null}";

/// Resolves `${...}` and `#{...}` references to a fixpoint.
#[derive(Clone)]
pub struct PlaceholderResolver {
    variables: VariableResolver,
    expressions: ExpressionAdaptor,
    max_rounds: usize,
    max_resolved_len: usize,
}

impl PlaceholderResolver {
    /// Creates a resolver over the two stages.
    #[must_use]
    pub const fn new(variables: VariableResolver, expressions: ExpressionAdaptor) -> Self {
        Self {
            variables,
            expressions,
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_resolved_len: DEFAULT_MAX_RESOLVED_LEN,
        }
    }

    /// Sets the round ceiling.
    #[must_use]
    pub const fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Sets the byte budget for the text between rounds.
    ///
    /// The variable stage keeps its own budget, see
    /// [`VariableResolver::with_max_resolved_len`].
    #[must_use]
    pub const fn with_max_resolved_len(mut self, max_resolved_len: usize) -> Self {
        self.max_resolved_len = max_resolved_len;
        self
    }

    /// Resolves every reference in `input`.
    ///
    /// One round runs variable resolution and then expression evaluation.
    /// Rounds repeat until one leaves the text unchanged. A non-string
    /// result of either stage is returned at once. Text that reads
    /// `#{null}` after variable resolution yields `Value::Null`.
    ///
    /// # Errors
    /// Returns `ResolutionError::IterationLimitExceeded` if the text is
    /// still changing after the configured number of rounds,
    /// `ResolutionError::ResolvedTextTooLong` if a round leaves more bytes
    /// than the budget allows, and propagates failures of either stage.
    pub fn resolve(&self, input: &str) -> ResolutionResult<Value> {
        let mut current = input.to_string();

        for round in 1..=self.max_rounds {
            let resolved = match self.variables.resolve(&current)? {
                Value::String(text) => text,
                Value::Bytes(bytes) => match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(e) => return Ok(Value::Bytes(e.into_bytes())),
                },
                other => return Ok(other),
            };

            if resolved.trim() == NULL_EXPRESSION {
                return Ok(Value::Null);
            }

            let processed = match self.expressions.process_raw_expression(&resolved)? {
                Value::String(text) => text,
                other => return Ok(other),
            };

            if processed == current {
                trace!(round, "Placeholder resolution reached a fixpoint");
                return Ok(Value::String(processed));
            }
            if processed.len() > self.max_resolved_len {
                debug!(
                    input,
                    round,
                    limit = self.max_resolved_len,
                    "Placeholder resolution exceeded the length budget"
                );
                return Err(ResolutionError::ResolvedTextTooLong {
                    stage: ResolutionStage::Placeholders,
                    limit: self.max_resolved_len,
                    input: input.to_string(),
                });
            }
            current = processed;
        }

        debug!(
            input,
            limit = self.max_rounds,
            "Placeholder resolution did not converge"
        );
        Err(ResolutionError::IterationLimitExceeded {
            stage: ResolutionStage::Placeholders,
            limit: self.max_rounds,
            input: input.to_string(),
        })
    }
}
