//! Expression evaluation module
//!
//! Provides the balanced scanner for `#{...}` expressions, the adaptor that
//! evaluates them innermost-first, and the built-in function processors.

pub mod adaptor;
pub mod processors;
pub mod scanner;
pub mod string_processors;

pub use adaptor::ExpressionAdaptor;
pub use processors::{DelegatingExpressionProcessor, FunctionalExpressionProcessor, parse_arguments};
pub use scanner::{ExpressionSpan, find_expression, is_table};
pub use string_processors::string_expression_processors;
