//! TikZ diagram compilation for markdown documents.
//!
//! This crate turns `tikzpicture` blocks into inline SVG:
//! - [`TikzProcessor`] implements [`BlockProcessor`] and compiles every
//!   block that contains both environment markers
//! - [`Compiler`] abstracts the external TeX toolchain; [`TexCompiler`] runs
//!   it as a subprocess in a temporary directory
//! - [`DiagramCache`] memoizes successful compiles by exact block text
//! - [`convert_file`] renders a whole markdown file to HTML
//!
//! A block that fails to compile for any reason is emitted as escaped
//! `<pre><code>` text and reported as a render warning.
//!
//! # Example
//!
//! ```no_run
//! use tikzdown_diagrams::{TexCompiler, TikzProcessor, document_renderer};
//!
//! let processor = TikzProcessor::new(TexCompiler::default());
//! let mut renderer = document_renderer(processor);
//!
//! let markdown = "\\begin{tikzpicture}\n\\draw (0,0) -- (1,1);\n\\end{tikzpicture}\n";
//! let result = renderer.render_markdown(markdown);
//! for warning in &result.warnings {
//!     eprintln!("{warning}");
//! }
//! ```
//!
//! [`BlockProcessor`]: tikzdown_renderer::BlockProcessor

mod cache;
mod compiler;
mod consts;
mod convert;
mod error;
mod job;
mod processor;

pub use cache::{DiagramCache, MemoryCache, NullCache};
pub use compiler::{Compiler, TexCompiler};
pub use consts::{BEGIN_MARKER, END_MARKER};
pub use convert::{convert_file, document_renderer, output_path};
pub use error::{CompileError, ConvertError};
pub use job::JobTemplate;
pub use processor::TikzProcessor;
