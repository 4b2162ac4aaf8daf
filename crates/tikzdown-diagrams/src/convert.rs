//! Whole-document conversion.

use std::fs;
use std::path::{Path, PathBuf};

use tikzdown_renderer::{MarkdownRenderer, RenderResult};
use tracing::info;

use crate::error::ConvertError;
use crate::processor::TikzProcessor;

/// Create the document renderer used for conversions: GFM enabled, with
/// `processor` installed.
#[must_use]
pub fn document_renderer(processor: TikzProcessor) -> MarkdownRenderer {
    MarkdownRenderer::new()
        .with_gfm(true)
        .with_processor(processor)
}

/// Path of the converted document: `input` with its extension replaced.
///
/// `extension` may be given with or without the leading dot.
#[must_use]
pub fn output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension.trim_start_matches('.'))
}

/// Render the markdown file `input` and write the HTML to `output`.
///
/// Diagram failures do not fail the conversion; they are returned as
/// warnings in the result.
pub fn convert_file(
    renderer: &mut MarkdownRenderer,
    input: &Path,
    output: &Path,
) -> Result<RenderResult, ConvertError> {
    let markdown = fs::read_to_string(input).map_err(|source| ConvertError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let result = renderer.render_markdown(&markdown);

    fs::write(output, &result.html).map_err(|source| ConvertError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    info!(
        input = %input.display(),
        output = %output.display(),
        warnings = result.warnings.len(),
        "Converted document"
    );
    Ok(result)
}
