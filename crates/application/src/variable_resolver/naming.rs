//! Dynamic variable name normalization
//!
//! Dynamic variables are registered under kebab-case names
//! (`random-uuid`) and may be referenced in camelCase (`randomUuid`), or
//! the other way round. Only the registered form is stored.

/// Converts `random-first-name` to `randomFirstName`.
#[must_use]
pub fn kebab_to_camel(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '-' {
            upper_next = !result.is_empty();
        } else if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}

/// Converts `randomFirstName` to `random-first-name`.
#[must_use]
pub fn camel_to_kebab(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_uppercase() {
            if !result.is_empty() {
                result.push('-');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// Returns the other naming form of `name`, if it has one.
#[must_use]
pub fn alias(name: &str) -> Option<String> {
    if name.contains('-') {
        Some(kebab_to_camel(name))
    } else if name.chars().any(char::is_uppercase) {
        Some(camel_to_kebab(name))
    } else {
        None
    }
}
