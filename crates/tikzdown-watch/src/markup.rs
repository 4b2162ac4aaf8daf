//! Markup watcher: reconvert markdown files when they change.

use std::path::{Path, PathBuf};

use tikzdown_diagrams::{convert_file, output_path};
use tikzdown_renderer::MarkdownRenderer;
use tracing::info;

use crate::error::WatchError;
use crate::handler::{ChangeHandler, matches_extension};

/// Suffixes recognized as markdown.
pub const MARKUP_EXTENSIONS: &[&str] = &[".md", ".markdown"];

/// Extension of converted documents.
pub const OUTPUT_EXTENSION: &str = ".html";

/// Result of reconverting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub input: PathBuf,
    pub output: PathBuf,
    pub warnings: Vec<String>,
}

/// Converts changed markdown files to HTML next to the source.
///
/// One renderer serves the whole session, so diagrams cached by its
/// processors are not recompiled when a document is saved again.
pub struct MarkupHandler {
    renderer: MarkdownRenderer,
    extensions: Vec<String>,
    output_extension: String,
}

impl MarkupHandler {
    /// Create a handler for `.md`/`.markdown` files producing `.html`.
    pub fn new(renderer: MarkdownRenderer) -> Self {
        Self {
            renderer,
            extensions: MARKUP_EXTENSIONS.iter().map(|&ext| ext.to_owned()).collect(),
            output_extension: OUTPUT_EXTENSION.to_owned(),
        }
    }

    /// Replace the recognized markdown suffixes.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Replace the output extension.
    #[must_use]
    pub fn with_output_extension(mut self, extension: impl Into<String>) -> Self {
        self.output_extension = extension.into();
        self
    }

    /// Convert `path`, writing the HTML beside it.
    ///
    /// Conversion errors are returned, not logged; diagram failures are
    /// reported as warnings.
    pub fn convert(&mut self, path: &Path) -> Result<Conversion, WatchError> {
        let output = output_path(path, &self.output_extension);
        let result = convert_file(&mut self.renderer, path, &output)?;

        Ok(Conversion {
            input: path.to_path_buf(),
            output,
            warnings: result.warnings,
        })
    }
}

impl ChangeHandler for MarkupHandler {
    fn matches(&self, path: &Path) -> bool {
        matches_extension(path, &self.extensions)
    }

    fn on_change(&mut self, path: &Path) -> Result<(), WatchError> {
        let conversion = self.convert(path)?;
        info!(
            input = %conversion.input.display(),
            output = %conversion.output.display(),
            "Reconverted document"
        );
        Ok(())
    }
}
