//! Function-style expression processors
//!
//! A function processor claims bodies of the form `name(arguments)`, with
//! the name matched case-insensitively. Arguments are either handed over as
//! raw text or split on unescaped commas:
//!
//! - `\,` is a literal comma;
//! - `"""..."""` quotes an argument verbatim, commas and backslashes included;
//! - unquoted arguments are trimmed.

use std::fmt;
use std::sync::Arc;

use stepwise_domain::Value;

use crate::ports::{ExpressionError, ExpressionProcessor};

const QUOTES: &str = "\"\"\"";

type Function = dyn Fn(&[String]) -> Result<Value, ExpressionError> + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    /// The raw argument text as a single argument.
    Raw,
    /// Exactly this many split arguments.
    Exactly(usize),
    /// Any number of split arguments.
    Any,
}

/// A named function evaluated over its arguments.
pub struct FunctionalExpressionProcessor {
    name: String,
    arity: Arity,
    function: Box<Function>,
}

impl FunctionalExpressionProcessor {
    /// Creates a processor receiving the raw argument text.
    pub fn unary<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::new(name, Arity::Raw, move |args: &[String]| {
            Ok(Value::from(function(args.first().map_or("", String::as_str))))
        })
    }

    /// Creates a processor receiving exactly `count` split arguments.
    pub fn with_arguments<F>(name: impl Into<String>, count: usize, function: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        Self::new(name, Arity::Exactly(count), move |args: &[String]| {
            Ok(Value::from(function(args)))
        })
    }

    /// Creates a processor receiving any number of split arguments.
    pub fn variadic<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        Self::new(name, Arity::Any, move |args: &[String]| {
            Ok(Value::from(function(args)))
        })
    }

    /// Creates a processor from a fallible function over split arguments.
    pub fn fallible<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[String]) -> Result<Value, ExpressionError> + Send + Sync + 'static,
    {
        Self::new(name, Arity::Any, function)
    }

    fn new<F>(name: impl Into<String>, arity: Arity, function: F) -> Self
    where
        F: Fn(&[String]) -> Result<Value, ExpressionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            function: Box::new(function),
        }
    }

    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the argument text if `expression` calls this function.
    fn match_call<'a>(&self, expression: &'a str) -> Option<&'a str> {
        let name = expression.get(..self.name.len())?;
        if !name.eq_ignore_ascii_case(&self.name) {
            return None;
        }
        expression[self.name.len()..]
            .strip_prefix('(')?
            .strip_suffix(')')
    }
}

impl ExpressionProcessor for FunctionalExpressionProcessor {
    fn execute(&self, expression: &str) -> Result<Option<Value>, ExpressionError> {
        let Some(arguments) = self.match_call(expression) else {
            return Ok(None);
        };
        let args = match self.arity {
            Arity::Raw => vec![arguments.to_string()],
            Arity::Exactly(count) => {
                let args = parse_arguments(arguments);
                if args.len() != count {
                    return Err(ExpressionError::argument_count(&self.name, count, &args));
                }
                args
            }
            Arity::Any => parse_arguments(arguments),
        };
        (self.function)(&args).map(Some)
    }
}

impl fmt::Debug for FunctionalExpressionProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionalExpressionProcessor")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Groups processors; the first one claiming an expression wins.
#[derive(Clone, Default)]
pub struct DelegatingExpressionProcessor {
    processors: Vec<Arc<dyn ExpressionProcessor>>,
}

impl DelegatingExpressionProcessor {
    /// Creates a group over `processors`, tried in order.
    #[must_use]
    pub fn new(processors: Vec<Arc<dyn ExpressionProcessor>>) -> Self {
        Self { processors }
    }

    /// Appends a processor to the group.
    pub fn push(&mut self, processor: impl ExpressionProcessor + 'static) {
        self.processors.push(Arc::new(processor));
    }

    /// Returns the number of grouped processors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Returns true if the group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl ExpressionProcessor for DelegatingExpressionProcessor {
    fn execute(&self, expression: &str) -> Result<Option<Value>, ExpressionError> {
        for processor in &self.processors {
            if let Some(value) = processor.execute(expression)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

/// Splits function arguments on unescaped commas.
#[must_use]
pub fn parse_arguments(arguments: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut rest = arguments;

    loop {
        if let Some((quoted, after)) = split_quoted(rest) {
            args.push(quoted.to_string());
            match find_unescaped_comma(after) {
                Some(comma) => rest = &after[comma + 1..],
                None => return args,
            }
            continue;
        }
        match find_unescaped_comma(rest) {
            Some(comma) => {
                args.push(unescape(rest[..comma].trim()));
                rest = &rest[comma + 1..];
            }
            None => {
                args.push(unescape(rest.trim()));
                return args;
            }
        }
    }
}

/// Splits `"""quoted""" rest` into the quoted text and what follows it.
fn split_quoted(text: &str) -> Option<(&str, &str)> {
    let inner = text.trim_start().strip_prefix(QUOTES)?;
    let end = inner.find(QUOTES)?;
    Some((&inner[..end], &inner[end + QUOTES.len()..]))
}

fn find_unescaped_comma(text: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, ch) in text.char_indices() {
        match ch {
            ',' if !escaped => return Some(i),
            '\\' => escaped = !escaped,
            _ => escaped = false,
        }
    }
    None
}

fn unescape(argument: &str) -> String {
    argument.replace("\\,", ",")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn echo() -> FunctionalExpressionProcessor {
        FunctionalExpressionProcessor::unary("echo", str::to_string)
    }

    #[test]
    fn test_name_is_case_insensitive() {
        let processor = echo();
        assert_eq!(processor.execute("ECHO(x)").unwrap(), Some(Value::from("x")));
        assert_eq!(processor.execute("eChO( x )").unwrap(), Some(Value::from(" x ")));
    }

    #[test]
    fn test_non_matching_bodies() {
        let processor = echo();
        for body in ["echoes(x)", "echo", "echo(x", "other(x)", "ech", "x echo(x)"] {
            assert_eq!(processor.execute(body).unwrap(), None, "body: {body}");
        }
    }

    #[test]
    fn test_raw_arguments_keep_commas_and_newlines() {
        let processor = echo();
        assert_eq!(
            processor.execute("echo(a, b\nc)").unwrap(),
            Some(Value::from("a, b\nc"))
        );
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_arguments("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_arguments(""), vec![""]);
        assert_eq!(parse_arguments(","), vec!["", ""]);
        assert_eq!(parse_arguments("\\,"), vec![","]);
        assert_eq!(parse_arguments("three\\, or,x"), vec!["three, or", "x"]);
        assert_eq!(parse_arguments("\"\"\"a,b\\,c\"\"\""), vec!["a,b\\,c"]);
        assert_eq!(parse_arguments("\"\"\" \"\"\""), vec![" "]);
        assert_eq!(
            parse_arguments("a\\,b\\,c\\,b\\,a, \"\"\",c\"\"\""),
            vec!["a,b,c,b,a", ",c"]
        );
    }

    #[test]
    fn test_argument_count_is_checked() {
        let processor =
            FunctionalExpressionProcessor::with_arguments("pair", 2, |args| args.join("+"));
        assert_eq!(processor.execute("pair(1, 2)").unwrap(), Some(Value::from("1+2")));
        let error = processor.execute("pair(1, 2, 3)").unwrap_err();
        assert_eq!(
            error.to_string(),
            "The expected number of arguments for 'pair' expression is 2, but found 3 arguments: '1, 2, 3'"
        );
    }

    #[test]
    fn test_fallible_function() {
        let processor = FunctionalExpressionProcessor::fallible("fail", |_| {
            Err(ExpressionError::Failed("nope".to_string()))
        });
        assert!(processor.execute("fail()").is_err());
        assert_eq!(processor.execute("other()").unwrap(), None);
    }

    #[test]
    fn test_delegating_first_claim_wins() {
        let mut group = DelegatingExpressionProcessor::default();
        group.push(FunctionalExpressionProcessor::unary("a", |_| "first".to_string()));
        group.push(FunctionalExpressionProcessor::unary("a", |_| "second".to_string()));
        group.push(echo());
        assert_eq!(group.len(), 3);
        assert_eq!(group.execute("a()").unwrap(), Some(Value::from("first")));
        assert_eq!(group.execute("echo(z)").unwrap(), Some(Value::from("z")));
        assert_eq!(group.execute("none()").unwrap(), None);
    }
}
