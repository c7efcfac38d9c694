//! Dynamically typed values flowing through parameter resolution
//!
//! A `Value` is what a variable store, a dynamic variable or an expression
//! processor hands back. Most of the time it is a string; anything else is
//! carried through untouched until something needs its text form.

use std::fmt;

use indexmap::IndexMap;

/// A value produced by a variable lookup or an expression.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// Text.
    String(String),
    /// Raw binary content.
    Bytes(Vec<u8>),
    /// An ordered sequence of values.
    List(Vec<Self>),
    /// An insertion-ordered mapping from keys to values.
    Map(IndexMap<String, Self>),
}

impl Value {
    /// Returns the runtime type name of the value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Returns true if the value is textual.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns true if the value is `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text if the value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes the value, returning its text if it is a string.
    #[must_use]
    pub fn into_string(self) -> Option<String> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list element at `index`, if this is a list.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Self> {
        match self {
            Self::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Returns the map entry for `key`, if this is a map.
    #[must_use]
    pub fn get_key(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(entries) => entries.get(key),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{n:.1}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Self::Map(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Integer),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::from("text").to_string(), "text");
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(3.0).to_string(), "3.0");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_display_collections() {
        let list = Value::from(vec![Value::from(1), Value::from("two")]);
        assert_eq!(list.to_string(), "[1, two]");

        let mut entries = IndexMap::new();
        entries.insert("a".to_string(), Value::from(1));
        entries.insert("b".to_string(), Value::from("x"));
        assert_eq!(Value::from(entries).to_string(), "{a=1, b=x}");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from(vec![1_u8, 2]).type_name(), "bytes");
        assert_eq!(Value::from(vec![Value::Null]).type_name(), "list");
        assert_eq!(Value::Map(IndexMap::new()).type_name(), "map");
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({"ids": [1, "a"], "ok": true, "ratio": 0.5});
        let value = Value::from(json);

        let ids = value.get_key("ids").expect("ids present");
        assert_eq!(ids.get_index(0), Some(&Value::Integer(1)));
        assert_eq!(ids.get_index(1), Some(&Value::from("a")));
        assert_eq!(value.get_key("ok"), Some(&Value::Bool(true)));
        assert_eq!(value.get_key("ratio"), Some(&Value::Float(0.5)));
    }

    #[test]
    fn test_accessors() {
        let value = Value::from("abc");
        assert!(value.is_string());
        assert_eq!(value.as_str(), Some("abc"));
        assert_eq!(value.into_string(), Some("abc".to_string()));
        assert_eq!(Value::from(1).as_str(), None);
    }
}
