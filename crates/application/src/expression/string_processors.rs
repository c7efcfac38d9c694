//! Built-in string expression processors

use rand::Rng;

use super::processors::{DelegatingExpressionProcessor, FunctionalExpressionProcessor};

/// Creates the group of built-in string functions.
///
/// | Function | Result |
/// |----------|--------|
/// | `trim(x)` | `x` without surrounding whitespace |
/// | `toLowerCase(x)`, `toUpperCase(x)` | case-converted `x` |
/// | `capitalize(x)`, `capitalizeFirstWord(x)` | first character upper-cased |
/// | `capitalizeWords(x)` | first character of every word upper-cased |
/// | `capitalizeWordsFully(x)` | every word lower-cased, then capitalized |
/// | `uncapitalizeFirstWord(x)`, `uncapitalizeWords(x)` | the lower-case counterparts |
/// | `removeWrappingDoubleQuotes(x)` | `x` without one pair of wrapping `"` |
/// | `escapeHTML(x)`, `escapeJSON(x)`, `quoteRegExp(x)` | escaped `x` |
/// | `substringBefore(x, sep)`, `substringAfter(x, sep)` | the part of `x` around the first `sep` |
/// | `anyOf(a, b, ...)` | one of the arguments, picked at random |
#[must_use]
pub fn string_expression_processors() -> DelegatingExpressionProcessor {
    let mut processors = DelegatingExpressionProcessor::default();
    processors.push(FunctionalExpressionProcessor::unary("trim", |s| s.trim().to_string()));
    processors.push(FunctionalExpressionProcessor::unary("toLowerCase", str::to_lowercase));
    processors.push(FunctionalExpressionProcessor::unary("toUpperCase", str::to_uppercase));
    processors.push(FunctionalExpressionProcessor::unary("capitalize", capitalize_first_word));
    processors.push(FunctionalExpressionProcessor::unary(
        "capitalizeFirstWord",
        capitalize_first_word,
    ));
    processors.push(FunctionalExpressionProcessor::unary("capitalizeWords", |s| {
        map_words(s, capitalize_first_word)
    }));
    processors.push(FunctionalExpressionProcessor::unary("capitalizeWordsFully", |s| {
        map_words(&s.to_lowercase(), capitalize_first_word)
    }));
    processors.push(FunctionalExpressionProcessor::unary(
        "uncapitalizeFirstWord",
        uncapitalize_first_word,
    ));
    processors.push(FunctionalExpressionProcessor::unary("uncapitalizeWords", |s| {
        map_words(s, uncapitalize_first_word)
    }));
    processors.push(FunctionalExpressionProcessor::unary(
        "removeWrappingDoubleQuotes",
        remove_wrapping_double_quotes,
    ));
    processors.push(FunctionalExpressionProcessor::unary("escapeHTML", escape_html));
    processors.push(FunctionalExpressionProcessor::unary("escapeJSON", escape_json));
    processors.push(FunctionalExpressionProcessor::unary("quoteRegExp", regex_escape));
    processors.push(FunctionalExpressionProcessor::with_arguments(
        "substringBefore",
        2,
        |args| substring_before(&args[0], &args[1]).to_string(),
    ));
    processors.push(FunctionalExpressionProcessor::with_arguments(
        "substringAfter",
        2,
        |args| substring_after(&args[0], &args[1]).to_string(),
    ));
    processors.push(FunctionalExpressionProcessor::variadic("anyOf", any_of));
    processors
}

fn capitalize_first_word(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn uncapitalize_first_word(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

/// Applies `f` to every whitespace-delimited word, keeping the whitespace.
fn map_words(s: &str, f: fn(&str) -> String) -> String {
    let mut result = String::with_capacity(s.len());
    let mut word_start = None;
    for (i, ch) in s.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = word_start.take() {
                result.push_str(&f(&s[start..i]));
            }
            result.push(ch);
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        result.push_str(&f(&s[start..]));
    }
    result
}

fn remove_wrapping_double_quotes(s: &str) -> String {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
        .to_string()
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_json(s: &str) -> String {
    let quoted = serde_json::Value::from(s).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

/// Backslash-escapes every regex metacharacter, so `Customer(Username)`
/// becomes `Customer\(Username\)`. The result is a literal pattern for the
/// `regex` crate; `\Q...\E` quoting is not emitted since that engine does not
/// support it.
fn regex_escape(s: &str) -> String {
    regex::escape(s)
}

fn substring_before<'a>(s: &'a str, separator: &str) -> &'a str {
    if separator.is_empty() {
        return "";
    }
    s.find(separator).map_or(s, |i| &s[..i])
}

fn substring_after<'a>(s: &'a str, separator: &str) -> &'a str {
    if separator.is_empty() {
        return s;
    }
    s.find(separator).map_or("", |i| &s[i + separator.len()..])
}

fn any_of(args: &[String]) -> String {
    if args.is_empty() {
        return String::new();
    }
    args[rand::rng().random_range(0..args.len())].clone()
}
