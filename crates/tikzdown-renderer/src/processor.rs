//! Block processor trait for pluggable block handling.
//!
//! Processors see the document twice:
//!
//! 1. Before markdown parsing, every blank-line separated block outside code
//!    blocks is passed to [`BlockProcessor::test`]. The first processor that
//!    accepts a block produces its HTML with [`BlockProcessor::run`], and the
//!    block never reaches the markdown parser.
//! 2. During rendering, every fenced code block with an info string is passed
//!    to [`BlockProcessor::process_code_block`]. The first processor returning
//!    [`ProcessResult::Inline`] replaces the code block.
//!
//! Both paths share one zero-based index counter per render.

/// Result of offering a fenced code block to a processor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the code block with HTML.
    Inline(String),

    /// Render as a regular code block.
    PassThrough,
}

/// Trait for processing special markdown blocks.
pub trait BlockProcessor {
    /// Whether this processor handles the raw block text.
    fn test(&self, block: &str) -> bool;

    /// Convert an accepted block to HTML.
    ///
    /// Must not fail: problems are reported through
    /// [`take_warnings`](Self::take_warnings) and a fallback rendering.
    fn run(&mut self, block: &str, index: usize) -> String;

    /// Offer a fenced code block to this processor.
    ///
    /// # Arguments
    ///
    /// * `language` - Language identifier from the fence info string
    /// * `source` - Raw content of the code block
    /// * `index` - Zero-based index shared with [`run`](Self::run)
    ///
    /// Default implementation passes every code block through.
    fn process_code_block(
        &mut self,
        _language: &str,
        _source: &str,
        _index: usize,
    ) -> ProcessResult {
        ProcessResult::PassThrough
    }

    /// Drain warnings collected since the last call.
    ///
    /// Default implementation returns no warnings.
    fn take_warnings(&mut self) -> Vec<String> {
        Vec::new()
    }
}

/// Language identifier of a fence info string: its first word.
#[must_use]
pub(crate) fn fence_language(info: &str) -> &str {
    info.split_whitespace().next().unwrap_or("")
}
