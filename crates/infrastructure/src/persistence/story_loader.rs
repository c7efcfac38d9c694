//! File-based story resource loader.
//!
//! Table resources referenced from steps are plain text files resolved
//! against a resource root directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use stepwise_application::ports::{StoryLoader, StoryLoaderError};
use tracing::debug;

/// Loads resources from the filesystem.
#[derive(Debug, Clone)]
pub struct FileStoryLoader {
    root: PathBuf,
}

impl FileStoryLoader {
    /// Creates a loader resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the resource root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path.trim_start_matches('/'));
        self.root.join(path)
    }
}

impl StoryLoader for FileStoryLoader {
    fn load_resource_as_text(&self, path: &str) -> Result<String, StoryLoaderError> {
        let full_path = self.resolve_path(path);
        debug!(path = %full_path.display(), "Loading story resource");
        std::fs::read_to_string(&full_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoryLoaderError::NotFound(path.to_string()),
            ErrorKind::PermissionDenied => StoryLoaderError::PermissionDenied(path.to_string()),
            _ => StoryLoaderError::Io(e),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_loads_relative_to_root() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("tables")).unwrap();
        std::fs::write(dir.path().join("tables/users.table"), "|name|\n|admin|").unwrap();

        let loader = FileStoryLoader::new(dir.path());
        assert_eq!(
            loader.load_resource_as_text("tables/users.table").unwrap(),
            "|name|\n|admin|"
        );
        assert_eq!(
            loader.load_resource_as_text("/tables/users.table").unwrap(),
            "|name|\n|admin|"
        );
    }

    #[test]
    fn test_missing_resource() {
        let dir = tempdir().unwrap();
        let loader = FileStoryLoader::new(dir.path());
        match loader.load_resource_as_text("missing.table") {
            Err(StoryLoaderError::NotFound(path)) => assert_eq!(path, "missing.table"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_directory_is_an_io_error() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("tables")).unwrap();
        let loader = FileStoryLoader::new(dir.path());
        assert!(loader.load_resource_as_text("tables").is_err());
    }
}
