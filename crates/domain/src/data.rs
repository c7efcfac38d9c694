//! Raw data payloads for steps that consume binary content

use crate::error::{DomainError, DomainResult};
use crate::value::Value;

/// Content held by a [`DataWrapper`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum DataContent {
    Text(String),
    Binary(Vec<u8>),
}

/// Normalizes a resolved value to a raw byte payload.
///
/// Only text and binary values can be wrapped; text is exposed as its UTF-8
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataWrapper {
    content: DataContent,
}

impl DataWrapper {
    /// Wraps text content.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: DataContent::Text(text.into()),
        }
    }

    /// Wraps binary content.
    #[must_use]
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            content: DataContent::Binary(bytes),
        }
    }

    /// Returns the raw bytes of the wrapped content.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match &self.content {
            DataContent::Text(text) => text.as_bytes(),
            DataContent::Binary(bytes) => bytes,
        }
    }

    /// Consumes the wrapper, returning the raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self.content {
            DataContent::Text(text) => text.into_bytes(),
            DataContent::Binary(bytes) => bytes,
        }
    }
}

impl TryFrom<Value> for DataWrapper {
    type Error = DomainError;

    fn try_from(value: Value) -> DomainResult<Self> {
        match value {
            Value::String(text) => Ok(Self::from_text(text)),
            Value::Bytes(bytes) => Ok(Self::from_bytes(bytes)),
            other => Err(DomainError::unsupported_content_type(other.type_name())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_is_utf8_encoded() {
        let wrapper = DataWrapper::try_from(Value::from("zażółć")).unwrap();
        assert_eq!(wrapper.bytes(), "zażółć".as_bytes());
    }

    #[test]
    fn test_bytes_are_returned_unchanged() {
        let bytes = vec![0_u8, 1, 2, 255];
        let wrapper = DataWrapper::try_from(Value::from(bytes.clone())).unwrap();
        assert_eq!(wrapper.bytes(), bytes.as_slice());
        assert_eq!(wrapper.into_bytes(), bytes);
    }

    #[test]
    fn test_other_types_are_rejected() {
        let error = DataWrapper::try_from(Value::from(42)).unwrap_err();
        assert_eq!(error, DomainError::unsupported_content_type("integer"));
        assert_eq!(error.to_string(), "unsupported content type: integer");
    }
}
