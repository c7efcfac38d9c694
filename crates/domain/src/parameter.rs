//! Step parameter target types and typed conversion results

use std::fmt;
use std::sync::Arc;

use crate::data::DataWrapper;
use crate::table::ExamplesTable;
use crate::value::Value;

/// The type a step method expects for one of its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetType {
    /// Plain text.
    String,
    /// A signed integer.
    Integer,
    /// A floating point number.
    Float,
    /// A boolean flag.
    Boolean,
    /// Anything; the resolved value is handed over as-is.
    Object,
    /// One of a closed set of named constants.
    Enum {
        /// Name of the enumeration, used in error messages.
        name: String,
        /// Constant names in declaration order.
        variants: Vec<String>,
    },
    /// An optional value; blank text means absent.
    Optional(Box<Self>),
    /// A comma separated list of values.
    List(Box<Self>),
    /// A pipe-delimited examples table.
    ExamplesTable,
    /// A raw byte payload.
    DataWrapper,
    /// A nested block of steps, built without placeholder resolution.
    SubSteps,
}

impl TargetType {
    /// Creates an optional target wrapping `inner`.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Creates a list target with elements of type `inner`.
    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// Creates an enumeration target.
    #[must_use]
    pub fn enumeration<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `value` already has a runtime type assignable to this
    /// target, so it can be handed to the step without conversion.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Object, _)
            | (Self::String, Value::String(_))
            | (Self::Integer, Value::Integer(_))
            | (Self::Float, Value::Float(_))
            | (Self::Boolean, Value::Bool(_)) => true,
            (Self::List(inner), Value::List(items)) => items.iter().all(|item| inner.accepts(item)),
            _ => false,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("String"),
            Self::Integer => f.write_str("Integer"),
            Self::Float => f.write_str("Float"),
            Self::Boolean => f.write_str("Boolean"),
            Self::Object => f.write_str("Object"),
            Self::Enum { name, .. } => f.write_str(name),
            Self::Optional(inner) => write!(f, "Optional<{inner}>"),
            Self::List(inner) => write!(f, "List<{inner}>"),
            Self::ExamplesTable => f.write_str("ExamplesTable"),
            Self::DataWrapper => f.write_str("DataWrapper"),
            Self::SubSteps => f.write_str("SubSteps"),
        }
    }
}

type SubStepsRunner = dyn Fn() -> Result<(), String> + Send + Sync;

/// An opaque, executable block of nested steps.
#[derive(Clone)]
pub struct SubSteps {
    source: String,
    runner: Arc<SubStepsRunner>,
}

impl SubSteps {
    /// Creates sub-steps from their source text and an executor.
    pub fn new<F>(source: impl Into<String>, runner: F) -> Self
    where
        F: Fn() -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            source: source.into(),
            runner: Arc::new(runner),
        }
    }

    /// Returns the raw step block text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Runs the nested steps.
    ///
    /// # Errors
    /// Returns the failure reported by the nested steps.
    pub fn execute(&self) -> Result<(), String> {
        (self.runner)()
    }
}

impl fmt::Debug for SubSteps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubSteps")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl PartialEq for SubSteps {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.runner, &other.runner)
    }
}

/// A step parameter converted to its target type.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// A scalar or structured value (also used for `Object` targets and `Null`).
    Value(Value),
    /// An optional value.
    Optional(Option<Box<Self>>),
    /// A list of converted elements.
    List(Vec<Self>),
    /// An examples table.
    Table(ExamplesTable),
    /// A raw byte payload.
    Data(DataWrapper),
    /// Nested steps.
    SubSteps(SubSteps),
}

impl Parameter {
    /// Returns the `Null` parameter.
    #[must_use]
    pub const fn null() -> Self {
        Self::Value(Value::Null)
    }

    /// Returns the inner value for `Value` parameters.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns true for the `Null` parameter.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// Returns the table for `Table` parameters.
    #[must_use]
    pub const fn as_table(&self) -> Option<&ExamplesTable> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Returns the payload for `Data` parameters.
    #[must_use]
    pub const fn as_data(&self) -> Option<&DataWrapper> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }
}

impl From<Value> for Parameter {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accepts_matching_scalars() {
        assert!(TargetType::String.accepts(&Value::from("a")));
        assert!(TargetType::Integer.accepts(&Value::from(1)));
        assert!(!TargetType::Float.accepts(&Value::from(1)));
        assert!(!TargetType::Integer.accepts(&Value::from("1")));
    }

    #[test]
    fn test_object_accepts_anything() {
        assert!(TargetType::Object.accepts(&Value::Null));
        assert!(TargetType::Object.accepts(&Value::from(vec![1_u8])));
    }

    #[test]
    fn test_list_accepts_elementwise() {
        let target = TargetType::list(TargetType::Object);
        assert!(target.accepts(&Value::from(vec![Value::from(1), Value::from("a")])));

        let ints = TargetType::list(TargetType::Integer);
        assert!(!ints.accepts(&Value::from(vec![Value::from("a")])));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TargetType::optional(TargetType::list(TargetType::Integer)).to_string(),
            "Optional<List<Integer>>"
        );
        assert_eq!(
            TargetType::enumeration("Color", ["RED", "GREEN"]).to_string(),
            "Color"
        );
    }

    #[test]
    fn test_sub_steps_identity() {
        let steps = SubSteps::new("When I do something", || Ok(()));
        let same = steps.clone();
        let other = SubSteps::new("When I do something", || Ok(()));
        assert_eq!(steps, same);
        assert_ne!(steps, other);
        assert!(steps.execute().is_ok());
        assert_eq!(steps.source(), "When I do something");
    }
}
