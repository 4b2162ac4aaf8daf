//! Markdown renderer with pluggable block processors.
//!
//! [`MarkdownRenderer`] turns markdown into an HTML fragment with
//! pulldown-cmark. Before parsing, the source is cut into blank-line separated
//! blocks (code blocks excluded) and each block is offered to the registered
//! [`BlockProcessor`]s; an accepted block is replaced by the HTML its processor
//! returns, bypassing markdown parsing entirely. Fenced code blocks are offered
//! to the same processors after parsing.
//!
//! # Example
//!
//! ```
//! use tikzdown_renderer::{BlockProcessor, MarkdownRenderer};
//!
//! struct Shout;
//!
//! impl BlockProcessor for Shout {
//!     fn test(&self, block: &str) -> bool {
//!         block.starts_with("!!")
//!     }
//!
//!     fn run(&mut self, block: &str, _index: usize) -> String {
//!         format!("<strong>{}</strong>", &block[2..])
//!     }
//! }
//!
//! let mut renderer = MarkdownRenderer::new().with_processor(Shout);
//! let result = renderer.render_markdown("Hello\n\n!!hey *you*\n");
//!
//! assert_eq!(result.html, "<p>Hello</p>\n<strong>hey *you*</strong>\n");
//! ```

mod blocks;
mod placeholders;
mod processor;
mod renderer;
mod util;

pub use processor::{BlockProcessor, ProcessResult};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use util::escape_html;
