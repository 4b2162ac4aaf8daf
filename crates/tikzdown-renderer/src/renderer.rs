//! Markdown renderer with block processor support.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};

use crate::blocks::{Segment, split_blocks};
use crate::placeholders::Placeholders;
use crate::processor::{BlockProcessor, ProcessResult, fence_language};

/// Result of rendering markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Warnings reported by processors during this render.
    pub warnings: Vec<String>,
}

/// Markdown renderer with pluggable block processors.
///
/// # Example
///
/// ```
/// use tikzdown_renderer::MarkdownRenderer;
///
/// let mut renderer = MarkdownRenderer::new().with_gfm(true);
/// let result = renderer.render_markdown("~~old~~ new");
///
/// assert_eq!(result.html, "<p><del>old</del> new</p>\n");
/// ```
#[derive(Default)]
pub struct MarkdownRenderer {
    processors: Vec<Box<dyn BlockProcessor>>,
    gfm: bool,
}

impl MarkdownRenderer {
    /// Create a renderer without processors, with `CommonMark` defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable GitHub Flavored Markdown extensions.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Add a block processor.
    ///
    /// Processors are consulted in registration order; the first one that
    /// accepts a block wins.
    #[must_use]
    pub fn with_processor<P: BlockProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render markdown text to an HTML fragment.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        let mut index = 0;
        let mut placeholders = Placeholders::for_source(markdown);

        let source = self.preprocess(markdown, &mut index, &mut placeholders);
        let parser = Parser::new_ext(&source, self.parser_options());
        let events = self.process_code_blocks(parser, &mut index);

        let mut html = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut html, events.into_iter());
        placeholders.apply(&mut html);

        let warnings = self
            .processors
            .iter_mut()
            .flat_map(|processor| processor.take_warnings())
            .collect();

        RenderResult { html, warnings }
    }

    /// Replace blocks accepted by a processor with placeholder markers.
    fn preprocess(
        &mut self,
        markdown: &str,
        index: &mut usize,
        placeholders: &mut Placeholders,
    ) -> String {
        let mut output = String::with_capacity(markdown.len());
        let options = self.parser_options();

        for segment in split_blocks(markdown, options) {
            match segment {
                Segment::Block(block) => {
                    match self.processors.iter_mut().find(|p| p.test(block)) {
                        Some(processor) => {
                            let html = processor.run(block, *index);
                            output.push_str(&placeholders.insert(*index, html));
                            *index += 1;
                        }
                        None => output.push_str(block),
                    }
                }
                Segment::Verbatim(text) => output.push_str(text),
            }
        }

        output
    }

    /// Offer fenced code blocks to processors, replacing the handled ones
    /// with raw HTML events.
    fn process_code_blocks<'a>(&mut self, parser: Parser<'a>, index: &mut usize) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        let mut fence: Option<FencedBlock<'a>> = None;

        for event in parser {
            if let Some(mut block) = fence.take() {
                if matches!(event, Event::End(TagEnd::CodeBlock)) {
                    block.events.push(event);
                    events.extend(self.finish_code_block(block, index));
                } else {
                    if let Event::Text(text) = &event {
                        block.source.push_str(text);
                    }
                    block.events.push(event);
                    fence = Some(block);
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref info))) if !info.is_empty() => {
                    fence = Some(FencedBlock {
                        info: info.to_string(),
                        source: String::new(),
                        events: vec![event],
                    });
                }
                other => events.push(other),
            }
        }

        events
    }

    fn finish_code_block<'a>(&mut self, block: FencedBlock<'a>, index: &mut usize) -> Vec<Event<'a>> {
        let language = fence_language(&block.info);

        for processor in &mut self.processors {
            if let ProcessResult::Inline(html) =
                processor.process_code_block(language, &block.source, *index)
            {
                *index += 1;
                return vec![Event::Html(html.into())];
            }
        }

        block.events
    }
}

/// Buffered events of a fenced code block awaiting a processor decision.
struct FencedBlock<'a> {
    info: String,
    source: String,
    events: Vec<Event<'a>>,
}
