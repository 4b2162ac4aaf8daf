//! TikZ block processor.
//!
//! Implements [`BlockProcessor`] so diagram blocks are compiled to SVG while
//! the renderer handles everything else.

use std::fs;
use std::path::{Path, PathBuf};

use tikzdown_renderer::{BlockProcessor, ProcessResult, escape_html};
use tikzdown_svg::{Element, SVG_NAMESPACE, normalize, parse_svg_file, serialize};
use tracing::{debug, warn};

use crate::cache::{DiagramCache, MemoryCache};
use crate::compiler::Compiler;
use crate::consts::{BEGIN_MARKER, END_MARKER, FENCE_LANGUAGE, JOB_FILE};
use crate::error::CompileError;
use crate::job::JobTemplate;

/// Compiles TikZ blocks to inline SVG.
///
/// A block is any blank-line separated chunk of markdown containing both
/// [`BEGIN_MARKER`] and [`END_MARKER`], or a fenced code block with the `tikz`
/// language that does. Compiled trees are cached by exact block text for the
/// lifetime of the processor.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use tikzdown_diagrams::{JobTemplate, MemoryCache, TexCompiler, TikzProcessor};
///
/// let compiler = TexCompiler::new("mk4ht xhmlatex job")
///     .with_timeout(Some(Duration::from_secs(60)));
/// let processor = TikzProcessor::new(compiler)
///     .with_cache(MemoryCache::new())
///     .with_template(JobTemplate::default().with_packages(["tikz", "pgfplots"]));
/// ```
pub struct TikzProcessor {
    compiler: Box<dyn Compiler>,
    cache: Box<dyn DiagramCache>,
    template: JobTemplate,
    warnings: Vec<String>,
}

impl TikzProcessor {
    /// Create a processor with an in-memory cache and the default preamble.
    #[must_use]
    pub fn new<C: Compiler + 'static>(compiler: C) -> Self {
        Self {
            compiler: Box::new(compiler),
            cache: Box::new(MemoryCache::new()),
            template: JobTemplate::default(),
            warnings: Vec::new(),
        }
    }

    /// Replace the compilation cache.
    #[must_use]
    pub fn with_cache<D: DiagramCache + 'static>(mut self, cache: D) -> Self {
        self.cache = Box::new(cache);
        self
    }

    /// Replace the document preamble.
    #[must_use]
    pub fn with_template(mut self, template: JobTemplate) -> Self {
        self.template = template;
        self
    }

    /// Whether `block` contains both diagram markers.
    ///
    /// This is a substring check: markers in comments count, and their order
    /// and nesting are not verified.
    #[must_use]
    pub fn is_diagram(block: &str) -> bool {
        block.contains(BEGIN_MARKER) && block.contains(END_MARKER)
    }

    /// Compile `block` to an SVG tree, consulting the cache first.
    ///
    /// On a miss the block is wrapped in the job preamble, written to a fresh
    /// temporary directory and compiled there. The first `*.svg` file by name
    /// is parsed and cached. The directory is removed on every exit path.
    pub fn compile(&mut self, block: &str) -> Result<Element, CompileError> {
        if let Some(tree) = self.cache.get(block) {
            debug!("Diagram cache hit");
            return Ok(tree);
        }

        let workdir = tempfile::Builder::new().prefix("tikzdown-").tempdir()?;
        fs::write(workdir.path().join(JOB_FILE), self.template.render(block))?;

        self.compiler.compile(workdir.path())?;

        let svg = find_svg(workdir.path())?.ok_or(CompileError::NoOutput)?;
        debug!(file = %svg.display(), "Parsing compiler output");
        let tree = parse_svg_file(&svg)?;

        self.cache.insert(block.to_owned(), tree.clone());
        Ok(tree)
    }

    fn render_block(&mut self, block: &str, index: usize) -> String {
        match self.compile(block) {
            Ok(tree) => serialize(&normalize(tree, SVG_NAMESPACE)),
            Err(e) => {
                warn!(index, error = %e, "Diagram compile failed, emitting source");
                self.warnings.push(format!("diagram {index}: {e}"));
                format!("<pre><code>{}</code></pre>", escape_html(block))
            }
        }
    }
}

impl BlockProcessor for TikzProcessor {
    fn test(&self, block: &str) -> bool {
        Self::is_diagram(block)
    }

    fn run(&mut self, block: &str, index: usize) -> String {
        self.render_block(block, index)
    }

    fn process_code_block(&mut self, language: &str, source: &str, index: usize) -> ProcessResult {
        if language != FENCE_LANGUAGE || !Self::is_diagram(source) {
            return ProcessResult::PassThrough;
        }
        // Share cache entries with the unfenced form of the same block.
        let block = source.strip_suffix('\n').unwrap_or(source);
        ProcessResult::Inline(self.render_block(block, index))
    }

    fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

/// First `*.svg` file in `dir` by name.
fn find_svg(dir: &Path) -> Result<Option<PathBuf>, CompileError> {
    let pattern = format!("{}/*.svg", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob::glob(&pattern)?.filter_map(Result::ok).collect();
    files.sort();
    Ok(files.into_iter().next())
}
