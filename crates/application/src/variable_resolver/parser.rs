//! Placeholder parser for `${variable}` syntax
//!
//! Finds the innermost placeholder references of a string together with
//! their positions. Outer references become visible once the inner ones
//! have been substituted.

use std::ops::Range;

const OPEN: &str = "${";

/// A parsed `${...}` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderReference {
    /// The verbatim body between `${` and `}`.
    pub name: String,

    /// Byte range in the original string, braces included.
    pub span: Range<usize>,
}

impl PlaceholderReference {
    /// Creates a new placeholder reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

enum Frame {
    Placeholder { start: usize, has_child: bool },
    Brace,
}

/// Parses `input` and returns its innermost placeholder references in order.
///
/// A reference is innermost when its body holds no other reference. Empty
/// bodies (`${}`), a bare `$`, stray braces and unclosed `${` are not
/// references. Braces inside a body are balanced, so `${a{b}c}` is a single
/// reference named `a{b}c`.
///
/// # Examples
///
/// ```
/// use stepwise_application::variable_resolver::parser::parse_placeholders;
///
/// let refs = parse_placeholders("${var${index}} and ${other}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "index");
/// assert_eq!(refs[1].name, "other");
/// ```
#[must_use]
pub fn parse_placeholders(input: &str) -> Vec<PlaceholderReference> {
    let mut references = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        match ch {
            '$' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                stack.push(Frame::Placeholder {
                    start: i,
                    has_child: false,
                });
            }
            '{' if !stack.is_empty() => stack.push(Frame::Brace),
            '}' => match stack.pop() {
                Some(Frame::Placeholder { start, has_child }) => {
                    let body = &input[start + OPEN.len()..i];
                    if body.is_empty() {
                        continue;
                    }
                    if !has_child {
                        references.push(PlaceholderReference::new(body, start..i + 1));
                    }
                    mark_parent(&mut stack);
                }
                Some(Frame::Brace) | None => {}
            },
            _ => {}
        }
    }

    references
}

fn mark_parent(stack: &mut [Frame]) {
    let parent = stack.iter_mut().rev().find_map(|frame| match frame {
        Frame::Placeholder { has_child, .. } => Some(has_child),
        Frame::Brace => None,
    });
    if let Some(has_child) = parent {
        *has_child = true;
    }
}

/// Returns true if the input contains at least one placeholder reference.
#[must_use]
pub fn has_placeholders(input: &str) -> bool {
    input.contains(OPEN) && !parse_placeholders(input).is_empty()
}

/// Extracts the names of the innermost references.
#[must_use]
pub fn extract_placeholder_names(input: &str) -> Vec<String> {
    parse_placeholders(input)
        .into_iter()
        .map(|r| r.name)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_placeholder() {
        let refs = parse_placeholders("${name}");
        assert_eq!(refs, vec![PlaceholderReference::new("name", 0..7)]);
    }

    #[test]
    fn test_body_is_verbatim() {
        assert_eq!(extract_placeholder_names("${var:0}"), vec!["var:0"]);
        assert_eq!(extract_placeholder_names("${ spaced }"), vec![" spaced "]);
        assert_eq!(
            extract_placeholder_names("${list[0].field:default}"),
            vec!["list[0].field:default"]
        );
    }

    #[test]
    fn test_nested_returns_innermost_only() {
        let input = "${var${varPartName}}";
        let refs = parse_placeholders(input);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "varPartName");
        assert_eq!(&input[refs[0].span.clone()], "${varPartName}");
    }

    #[test]
    fn test_siblings_inside_outer() {
        let names = extract_placeholder_names("${a${b}${c}}");
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_deep_nesting() {
        assert_eq!(extract_placeholder_names("${x${y${z}}}"), vec!["z"]);
    }

    #[test]
    fn test_non_references() {
        for input in ["${}", "$", "{}", "$}{", "${unclosed", "plain text", "$ {a}"] {
            assert!(parse_placeholders(input).is_empty(), "input: {input}");
            assert!(!has_placeholders(input), "input: {input}");
        }
    }

    #[test]
    fn test_empty_inner_does_not_block_outer() {
        assert_eq!(extract_placeholder_names("${a${}}"), vec!["a${}"]);
    }

    #[test]
    fn test_braces_inside_body_are_balanced() {
        assert_eq!(extract_placeholder_names("${a{b}c}"), vec!["a{b}c"]);
    }

    #[test]
    fn test_expression_inside_body_is_part_of_name() {
        let refs = parse_placeholders("${var#{eval(1 + 1)}}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "var#{eval(1 + 1)}");
    }

    #[test]
    fn test_placeholder_inside_expression() {
        let input = "#{eval(${var} + 1)}";
        let refs = parse_placeholders(input);
        assert_eq!(refs.len(), 1);
        assert_eq!(&input[refs[0].span.clone()], "${var}");
    }

    #[test]
    fn test_placeholder_inside_expression_inside_placeholder() {
        let names = extract_placeholder_names("${var#{eval(${nestedVar} + 1)}}");
        assert_eq!(names, vec!["nestedVar"]);
    }

    #[test]
    fn test_multibyte_text_spans() {
        let input = "zażółć ${gęś} jaźń";
        let refs = parse_placeholders(input);
        assert_eq!(&input[refs[0].span.clone()], "${gęś}");
    }
}
