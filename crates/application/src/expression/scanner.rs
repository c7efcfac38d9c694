//! Balanced scanner for `#{...}` expressions
//!
//! Expression bodies may contain nested expressions, placeholders and
//! literal parentheses, so spans are matched by tracking brace and
//! parenthesis depth instead of with a pattern.

use std::ops::Range;

const OPEN: &str = "#{";
const CELL_SEPARATOR: char = '|';
const ESCAPE: char = '\\';

/// Position of one expression in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionSpan {
    /// Byte range of the whole expression, `#{` and `}` included.
    pub span: Range<usize>,
    /// Byte range of the body between the delimiters.
    pub body: Range<usize>,
}

/// Finds the first complete expression starting at or after byte `from`.
///
/// A `}` met inside parentheses at the outermost brace level belongs to the
/// arguments, so `#{target(})}` is one expression with body `target(})`.
/// In table mode an expression may not cross an unescaped `|`, which keeps
/// every table cell independent. Line breaks inside a cell are allowed.
#[must_use]
pub fn find_expression(text: &str, from: usize, table_mode: bool) -> Option<ExpressionSpan> {
    let mut search = from;
    while let Some(offset) = text.get(search..)?.find(OPEN) {
        let start = search + offset;
        let body_start = start + OPEN.len();
        if let Some(body_end) = match_body(text, body_start, table_mode) {
            return Some(ExpressionSpan {
                span: start..body_end + 1,
                body: body_start..body_end,
            });
        }
        search = body_start;
    }
    None
}

/// Returns the byte index of the `}` closing the body starting at `body_start`.
fn match_body(text: &str, body_start: usize, table_mode: bool) -> Option<usize> {
    let mut braces = 1_usize;
    let mut parens = 0_usize;
    let mut previous = None;

    for (offset, ch) in text[body_start..].char_indices() {
        match ch {
            '(' => parens += 1,
            ')' => parens = parens.saturating_sub(1),
            '{' => braces += 1,
            '}' if parens > 0 && braces == 1 => {}
            '}' => {
                braces -= 1;
                if braces == 0 {
                    return Some(body_start + offset);
                }
            }
            CELL_SEPARATOR if table_mode && previous != Some(ESCAPE) => return None,
            _ => {}
        }
        previous = Some(ch);
    }
    None
}

/// Returns true if `text` is laid out as a pipe-delimited table.
#[must_use]
pub fn is_table(text: &str) -> bool {
    text.trim_start().starts_with(CELL_SEPARATOR) && text.contains('\n')
}
