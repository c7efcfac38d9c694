//! Expression adaptor
//!
//! Evaluates `#{...}` expressions innermost-first by dispatching each body
//! to an ordered list of processors.

use std::sync::Arc;

use stepwise_domain::Value;
use tracing::error;

use super::scanner::{find_expression, is_table};
use crate::error::{ResolutionError, ResolutionResult};
use crate::ports::{ExecutionMode, ExpressionProcessor};

/// Dispatches expressions to the registered processors.
///
/// The first processor returning a value wins; expressions nobody claims
/// are left in the text literally.
#[derive(Clone)]
pub struct ExpressionAdaptor {
    processors: Vec<Arc<dyn ExpressionProcessor>>,
    execution_mode: Arc<dyn ExecutionMode>,
}

impl ExpressionAdaptor {
    /// Creates an adaptor over `processors`, tried in order.
    #[must_use]
    pub fn new(
        processors: Vec<Arc<dyn ExpressionProcessor>>,
        execution_mode: Arc<dyn ExecutionMode>,
    ) -> Self {
        Self {
            processors,
            execution_mode,
        }
    }

    /// Processes every expression in `input`, returning the resulting text.
    ///
    /// # Errors
    /// Returns `ResolutionError::Expression` if a processor fails.
    pub fn process(&self, input: &str) -> ResolutionResult<String> {
        self.process_text(input, false).map(|value| value.to_string())
    }

    /// Processes every expression in `input`.
    ///
    /// If the input (ignoring surrounding whitespace) is a single expression
    /// that evaluates to a non-string value, that value is returned as-is.
    ///
    /// # Errors
    /// Returns `ResolutionError::Expression` if a processor fails.
    pub fn process_raw_expression(&self, input: &str) -> ResolutionResult<Value> {
        self.process_text(input, true)
    }

    /// Evaluates a single expression body such as `trim( x )`.
    ///
    /// Returns `None` if no processor claims the body.
    ///
    /// # Errors
    /// Returns `ResolutionError::Expression` if a processor fails.
    pub fn process_expression(&self, body: &str) -> ResolutionResult<Option<Value>> {
        self.evaluate(body, &format!("#{{{body}}}"))
    }

    fn process_text(&self, text: &str, keep_raw: bool) -> ResolutionResult<Value> {
        if self.execution_mode.is_dry_run() || !text.contains("#{") {
            return Ok(Value::from(text));
        }

        let table_mode = is_table(text);
        let trimmed = text.trim();
        let mut output = String::with_capacity(text.len());
        let mut last_end = 0;

        while let Some(expression) = find_expression(text, last_end, table_mode) {
            let raw = &text[expression.span.clone()];
            let body = self
                .process_text(&text[expression.body.clone()], false)?
                .to_string();

            output.push_str(&text[last_end..expression.span.start]);
            match self.evaluate(&body, raw)? {
                Some(value) if keep_raw && !value.is_string() && raw == trimmed => {
                    return Ok(value);
                }
                Some(value) => output.push_str(&value.to_string()),
                None => {
                    output.push_str("#{");
                    output.push_str(&body);
                    output.push('}');
                }
            }
            last_end = expression.span.end;
        }

        output.push_str(&text[last_end..]);
        Ok(Value::String(output))
    }

    fn evaluate(&self, body: &str, raw: &str) -> ResolutionResult<Option<Value>> {
        for processor in &self.processors {
            match processor.execute(body) {
                Ok(Some(value)) => return Ok(Some(value)),
                Ok(None) => {}
                Err(source) => {
                    error!(error = %source, "Unable to process expression '{raw}'");
                    return Err(ResolutionError::Expression {
                        expression: raw.to_string(),
                        source,
                    });
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ports::ExpressionError;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Records every body it sees and answers from a fixed table.
    struct Recording {
        answers: Vec<(&'static str, Value)>,
        seen: Mutex<Vec<String>>,
    }

    impl Recording {
        fn answering(answers: Vec<(&'static str, Value)>) -> Arc<Self> {
            Arc::new(Self {
                answers,
                seen: Mutex::default(),
            })
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl ExpressionProcessor for Recording {
        fn execute(&self, expression: &str) -> Result<Option<Value>, ExpressionError> {
            self.seen.lock().unwrap().push(expression.to_string());
            Ok(self
                .answers
                .iter()
                .find(|(body, _)| *body == expression)
                .map(|(_, value)| value.clone()))
        }
    }

    struct Failing;

    impl ExpressionProcessor for Failing {
        fn execute(&self, _: &str) -> Result<Option<Value>, ExpressionError> {
            Err(ExpressionError::Failed("boom".to_string()))
        }
    }

    fn adaptor(processor: Arc<dyn ExpressionProcessor>) -> ExpressionAdaptor {
        ExpressionAdaptor::new(vec![processor], Arc::new(false))
    }

    #[test]
    fn test_whole_body_is_passed() {
        let processor = Recording::answering(vec![("target", Value::from("result"))]);
        let adaptor = adaptor(processor.clone());
        assert_eq!(adaptor.process("#{target}").unwrap(), "result");
        assert_eq!(processor.seen(), vec!["target"]);
    }

    #[test]
    fn test_brace_inside_parentheses() {
        let processor = Recording::answering(vec![("target(})", Value::from("ok"))]);
        assert_eq!(adaptor(processor).process("a #{target(})} b").unwrap(), "a ok b");
    }

    #[test]
    fn test_innermost_first() {
        let processor = Recording::answering(vec![
            ("toLowerCase( STEPWISE )", Value::from(" stepwise ")),
            ("trim( stepwise )", Value::from("stepwise")),
            ("capitalize(stepwise)", Value::from("Stepwise")),
        ]);
        let adaptor = adaptor(processor.clone());
        assert_eq!(
            adaptor
                .process("#{capitalize(#{trim(#{toLowerCase( STEPWISE )})})}")
                .unwrap(),
            "Stepwise"
        );
        assert_eq!(
            processor.seen(),
            vec!["toLowerCase( STEPWISE )", "trim( stepwise )", "capitalize(stepwise)"]
        );
    }

    #[test]
    fn test_unsupported_expression_stays_literal() {
        let processor = Recording::answering(vec![]);
        let adaptor = adaptor(processor);
        assert_eq!(adaptor.process("x #{unknown(1)} y").unwrap(), "x #{unknown(1)} y");
    }

    #[test]
    fn test_unsupported_outer_keeps_processed_inner() {
        let processor = Recording::answering(vec![("inner()", Value::from("1"))]);
        assert_eq!(
            adaptor(processor).process("#{outer(#{inner()})}").unwrap(),
            "#{outer(1)}"
        );
    }

    #[test]
    fn test_first_processor_wins() {
        let first = Recording::answering(vec![("x", Value::from("first"))]);
        let second = Recording::answering(vec![("x", Value::from("second"))]);
        let adaptor = ExpressionAdaptor::new(
            vec![first as Arc<dyn ExpressionProcessor>, second.clone()],
            Arc::new(false),
        );
        assert_eq!(adaptor.process("#{x}").unwrap(), "first");
        assert!(second.seen().is_empty());
    }

    #[test]
    fn test_processor_error_is_propagated() {
        let error = adaptor(Arc::new(Failing)).process("#{exp(any)}").unwrap_err();
        match error {
            ResolutionError::Expression { expression, source } => {
                assert_eq!(expression, "#{exp(any)}");
                assert_eq!(source, ExpressionError::Failed("boom".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dry_run_skips_expressions() {
        let processor = Recording::answering(vec![("x", Value::from("y"))]);
        let adaptor = ExpressionAdaptor::new(
            vec![processor.clone() as Arc<dyn ExpressionProcessor>],
            Arc::new(true),
        );
        assert_eq!(adaptor.process("#{x}").unwrap(), "#{x}");
        assert!(processor.seen().is_empty());
    }

    #[test]
    fn test_raw_result_at_top_level() {
        let processor = Recording::answering(vec![("number()", Value::from(42))]);
        let adaptor = adaptor(processor);
        assert_eq!(
            adaptor.process_raw_expression(" #{number()}\n").unwrap(),
            Value::from(42)
        );
        assert_eq!(
            adaptor.process_raw_expression("n=#{number()}").unwrap(),
            Value::from("n=42")
        );
        assert_eq!(adaptor.process("#{number()}").unwrap(), "42");
    }

    #[test]
    fn test_nested_non_string_is_stringified() {
        let processor = Recording::answering(vec![
            ("string(42)", Value::from(42)),
            ("sum(42)", Value::from(66)),
        ]);
        let adaptor = adaptor(processor);
        assert_eq!(
            adaptor.process_raw_expression("#{sum(#{string(42)})}").unwrap(),
            Value::from(66)
        );
    }

    #[test]
    fn test_table_cells_processed_independently() {
        let processor = Recording::answering(vec![("target", Value::from("value"))]);
        let adaptor = adaptor(processor);
        let table = "|col1|col2|\n|#{target}|plain|";
        assert_eq!(adaptor.process(table).unwrap(), "|col1|col2|\n|value|plain|");
    }

    #[test]
    fn test_table_cell_expression_spans_line_break() {
        let processor = Recording::answering(vec![
            ("target", Value::from("R")),
            ("tar\nget", Value::from("R")),
        ]);
        let adaptor = adaptor(processor.clone());
        assert_eq!(
            adaptor.process("|v1|v2|\n|#{target}|#{tar\nget}|").unwrap(),
            "|v1|v2|\n|R|R|"
        );
        assert_eq!(processor.seen(), vec!["target", "tar\nget"]);
    }

    #[test]
    fn test_table_with_unsupported_cells_is_unchanged() {
        let processor = Recording::answering(vec![]);
        let adaptor = adaptor(processor.clone());
        let table = "|col1|col2|col3|\n|#{unsupported}|simple|#{unsupported}|";
        assert_eq!(adaptor.process(table).unwrap(), table);
        assert_eq!(processor.seen(), vec!["unsupported", "unsupported"]);
    }

    #[test]
    fn test_table_with_mixed_cells() {
        let target = Recording::answering(vec![
            ("target", Value::from("value")),
            ("tar\nget", Value::from("value")),
        ]);
        let another = Recording::answering(vec![("another", Value::from("another value"))]);
        let adaptor = ExpressionAdaptor::new(
            vec![target as Arc<dyn ExpressionProcessor>, another],
            Arc::new(false),
        );
        let header = "|c1|c2|c3|c4|c5|\n";
        assert_eq!(
            adaptor
                .process_raw_expression(&format!(
                    "{header}|#{{unsupported}}|simple|#{{target}}|#{{tar\nget}}|#{{another}}|"
                ))
                .unwrap(),
            Value::from(format!(
                "{header}|#{{unsupported}}|simple|value|value|another value|"
            ))
        );
    }

    #[test]
    fn test_process_expression() {
        let processor = Recording::answering(vec![("x", Value::from("y"))]);
        let adaptor = adaptor(processor);
        assert_eq!(adaptor.process_expression("x").unwrap(), Some(Value::from("y")));
        assert_eq!(adaptor.process_expression("z").unwrap(), None);
    }
}
