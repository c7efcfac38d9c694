//! Examples table conversion

use std::sync::Arc;

use stepwise_domain::ExamplesTable;
use tracing::debug;

use crate::error::ResolutionResult;
use crate::placeholder::PlaceholderResolver;
use crate::ports::StoryLoader;

/// Builds examples tables from inline text or resource paths.
///
/// Cells of the parsed table are resolved one by one, so a cell value that
/// itself contains `|` or a newline cannot break the table structure.
#[derive(Clone)]
pub struct ExamplesTableConverter {
    story_loader: Arc<dyn StoryLoader>,
    placeholders: PlaceholderResolver,
}

impl ExamplesTableConverter {
    /// Creates a converter loading resources through `story_loader`.
    #[must_use]
    pub fn new(story_loader: Arc<dyn StoryLoader>, placeholders: PlaceholderResolver) -> Self {
        Self {
            story_loader,
            placeholders,
        }
    }

    /// Converts `text` to a table.
    ///
    /// Blank text is the empty table. Text that looks like a table is
    /// parsed directly; anything else is taken as a resource path.
    ///
    /// # Errors
    /// Returns an error if the resource cannot be loaded, the table is
    /// malformed, or a cell fails to resolve.
    pub fn convert(&self, text: &str) -> ResolutionResult<ExamplesTable> {
        if text.trim().is_empty() {
            return Ok(ExamplesTable::empty());
        }

        let table = if ExamplesTable::is_inline(text) {
            ExamplesTable::parse(text)?
        } else {
            let path = text.trim();
            debug!(path, "Loading examples table");
            ExamplesTable::parse(&self.story_loader.load_resource_as_text(path)?)?
        };

        table.try_map_cells(|cell| {
            self.placeholders
                .resolve(cell)
                .map(|value| value.to_string())
        })
    }
}
