//! Application error types

use std::fmt;

use stepwise_domain::{DomainError, TargetType};
use thiserror::Error;

use crate::ports::{ExpressionError, StoryLoaderError};

/// The resolution loop that hit its iteration ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    /// The `${...}` substitution passes of the variable resolver.
    Variables,
    /// The variable/expression rounds of the placeholder resolver.
    Placeholders,
}

impl fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variables => f.write_str("variable resolution"),
            Self::Placeholders => f.write_str("placeholder resolution"),
        }
    }
}

/// Errors raised while resolving or converting a step parameter.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// An expression processor failed.
    #[error("unable to process expression '{expression}': {source}")]
    Expression {
        /// The raw `#{...}` text that was being evaluated.
        expression: String,
        /// The processor failure.
        #[source]
        source: ExpressionError,
    },

    /// A resolution loop kept changing its input past the ceiling.
    #[error("{stage} did not converge after {limit} iterations for input '{input}'")]
    IterationLimitExceeded {
        /// Which loop gave up.
        stage: ResolutionStage,
        /// The configured ceiling.
        limit: usize,
        /// The text the loop started from.
        input: String,
    },

    /// A resolution loop grew the text past the length budget.
    #[error("{stage} grew the text past {limit} bytes for input '{input}'")]
    ResolvedTextTooLong {
        /// Which loop gave up.
        stage: ResolutionStage,
        /// The configured budget in bytes.
        limit: usize,
        /// The text the loop started from.
        input: String,
    },

    /// The base converter chain could not convert the resolved text.
    #[error("cannot convert '{value}' to {target}: {reason}")]
    Conversion {
        /// The resolved text.
        value: String,
        /// The requested type.
        target: TargetType,
        /// Why the conversion failed.
        reason: String,
    },

    /// No converter in the chain accepts the target type.
    #[error("no converter accepts target type {0}")]
    NoConverter(TargetType),

    /// A table resource could not be loaded.
    #[error("story loader error: {0}")]
    StoryLoader(#[from] StoryLoaderError),

    /// A domain rule was violated.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
}

impl ResolutionError {
    /// Creates a `Conversion` error.
    #[must_use]
    pub fn conversion(value: &str, target: &TargetType, reason: impl Into<String>) -> Self {
        Self::Conversion {
            value: value.to_string(),
            target: target.clone(),
            reason: reason.into(),
        }
    }

    /// Returns true if a resolution loop gave up on its pass ceiling or its
    /// length budget.
    #[must_use]
    pub const fn is_iteration_limit(&self) -> bool {
        matches!(
            self,
            Self::IterationLimitExceeded { .. } | Self::ResolvedTextTooLong { .. }
        )
    }
}

/// Result type alias for resolution and conversion.
pub type ResolutionResult<T> = Result<T, ResolutionError>;
