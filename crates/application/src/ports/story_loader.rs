//! Story loader port
//!
//! Loads external resources referenced from step parameters, such as
//! examples tables kept in their own files.

/// Errors that can occur while loading a resource.
#[derive(Debug, thiserror::Error)]
pub enum StoryLoaderError {
    /// The resource does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The resource exists but cannot be read.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads resources as text. Reads are blocking and never retried.
pub trait StoryLoader: Send + Sync {
    /// Loads the resource at `path`.
    ///
    /// # Errors
    /// Returns `StoryLoaderError::NotFound` if nothing exists at `path`.
    fn load_resource_as_text(&self, path: &str) -> Result<String, StoryLoaderError>;
}
