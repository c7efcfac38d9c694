//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while building or inspecting values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value of an unsupported runtime type was offered as data content.
    #[error("unsupported content type: {type_name}")]
    UnsupportedContentType {
        /// Runtime type name of the rejected value.
        type_name: String,
    },

    /// Tabular text could not be parsed into an examples table.
    #[error("invalid examples table: {0}")]
    InvalidTable(String),

    /// A variable reference is malformed.
    #[error("invalid variable reference: {0}")]
    InvalidVariableReference(String),
}

impl DomainError {
    /// Creates an `UnsupportedContentType` error for the given type name.
    #[must_use]
    pub fn unsupported_content_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedContentType {
            type_name: type_name.into(),
        }
    }
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
