//! Variable resolution engine
//!
//! Resolves `${variable}` references innermost-first. Each pass substitutes
//! every innermost reference it can look up; the next pass sees the outer
//! references the substitutions completed. Resolution stops at the first
//! pass that substitutes nothing.
//!
//! Two limits bound the work for one input: a pass ceiling for references
//! that never settle, and a byte budget for references that grow the text
//! faster than the ceiling can stop them (`g = "${g}${g}"`).

use std::sync::Arc;

use stepwise_domain::Value;
use tracing::{error, trace};

use super::dynamic::DynamicVariables;
use super::parser::{PlaceholderReference, parse_placeholders};
use crate::error::{ResolutionError, ResolutionResult, ResolutionStage};
use crate::ports::{ExecutionMode, VariableStore};

/// Default ceiling on substitution passes for one input.
pub const DEFAULT_MAX_PASSES: usize = 64;

/// Default budget, in bytes, for text produced while resolving one input.
pub const DEFAULT_MAX_RESOLVED_LEN: usize = 16 * 1024 * 1024;

const EXPRESSION_OPEN: &str = "#{";

/// The variable resolution engine.
///
/// Holds no per-call state: every `resolve` re-reads the store.
#[derive(Clone)]
pub struct VariableResolver {
    store: Arc<dyn VariableStore>,
    dynamic_variables: Arc<DynamicVariables>,
    execution_mode: Arc<dyn ExecutionMode>,
    max_passes: usize,
    max_resolved_len: usize,
}

impl VariableResolver {
    /// Creates a resolver over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn VariableStore>,
        dynamic_variables: Arc<DynamicVariables>,
        execution_mode: Arc<dyn ExecutionMode>,
    ) -> Self {
        Self {
            store,
            dynamic_variables,
            execution_mode,
            max_passes: DEFAULT_MAX_PASSES,
            max_resolved_len: DEFAULT_MAX_RESOLVED_LEN,
        }
    }

    /// Sets the substitution pass ceiling.
    #[must_use]
    pub const fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Sets the byte budget for resolved text.
    #[must_use]
    pub const fn with_max_resolved_len(mut self, max_resolved_len: usize) -> Self {
        self.max_resolved_len = max_resolved_len;
        self
    }

    /// Resolves all `${...}` references in `input`.
    ///
    /// Unknown references are kept literally. If the input (ignoring
    /// surrounding whitespace) is exactly one reference whose value is not a
    /// string, that value is returned as-is.
    ///
    /// # Errors
    /// Returns `ResolutionError::IterationLimitExceeded` if the text keeps
    /// changing after the configured number of passes, and
    /// `ResolutionError::ResolvedTextTooLong` as soon as a pass would produce
    /// more bytes than the budget allows.
    pub fn resolve(&self, input: &str) -> ResolutionResult<Value> {
        if !input.contains("${") {
            return Ok(Value::from(input));
        }

        let mut current = input.to_string();
        for pass in 1..=self.max_passes {
            match self.resolve_pass(&current) {
                Pass::Unchanged => return Ok(Value::String(current)),
                Pass::Whole(value) => return Ok(value),
                Pass::Substituted(next) => {
                    trace!(pass, resolved = %next, "Variable pass substituted references");
                    current = next;
                }
                Pass::TooLong => {
                    error!(
                        pass,
                        limit = self.max_resolved_len,
                        "Variable resolution exceeded the length budget"
                    );
                    return Err(ResolutionError::ResolvedTextTooLong {
                        stage: ResolutionStage::Variables,
                        limit: self.max_resolved_len,
                        input: input.to_string(),
                    });
                }
            }
        }

        Err(ResolutionError::IterationLimitExceeded {
            stage: ResolutionStage::Variables,
            limit: self.max_passes,
            input: input.to_string(),
        })
    }

    fn resolve_pass(&self, text: &str) -> Pass {
        let references = parse_placeholders(text);
        let trimmed = text.trim();

        let mut output = String::with_capacity(text.len());
        let mut last_end = 0;
        let mut substituted = false;

        for PlaceholderReference { name, span } in references {
            // Bodies holding an expression wait for the expression stage.
            if name.contains(EXPRESSION_OPEN) {
                continue;
            }
            let Some(value) = self.lookup(&name) else {
                continue;
            };
            if !value.is_string() && &text[span.clone()] == trimmed {
                return Pass::Whole(value);
            }
            let value = value.to_string();
            let prefix = &text[last_end..span.start];
            if output.len() + prefix.len() + value.len() > self.max_resolved_len {
                return Pass::TooLong;
            }
            output.push_str(prefix);
            output.push_str(&value);
            last_end = span.end;
            substituted = true;
        }

        if !substituted {
            return Pass::Unchanged;
        }
        let rest = &text[last_end..];
        if output.len() + rest.len() > self.max_resolved_len {
            return Pass::TooLong;
        }
        output.push_str(rest);
        Pass::Substituted(output)
    }

    fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.get(name).filter(|value| !value.is_null()) {
            return Some(value);
        }
        if self.execution_mode.is_dry_run() {
            return None;
        }
        let variable = self.dynamic_variables.get(name)?;
        match variable.calculate_value() {
            Ok(value) => Some(value).filter(|value| !value.is_null()),
            Err(e) => {
                error!("Unable to resolve dynamic variable ${{{name}}}: {e}");
                None
            }
        }
    }
}

enum Pass {
    Unchanged,
    Whole(Value),
    Substituted(String),
    TooLong,
}
