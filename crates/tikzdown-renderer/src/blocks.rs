//! Splitting markdown source into blank-line separated blocks.

use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser, Tag};

/// A slice of the markdown source.
///
/// Concatenating all segments in order yields the original input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Consecutive non-blank lines outside code blocks, without the final
    /// line break.
    Block(&'a str),
    /// Blank lines, code blocks and line breaks trailing a block.
    Verbatim(&'a str),
}

/// Split `input` into blocks and the verbatim text between them.
///
/// Code blocks (fenced or indented) are located by parsing `input` with the
/// same `options` the renderer uses, so any line the parser treats as code
/// is verbatim.
pub(crate) fn split_blocks(input: &str, options: Options) -> Vec<Segment<'_>> {
    let code = code_ranges(input, options);
    let mut next_code = 0;

    let mut segments = Vec::new();
    let mut block: Option<(usize, usize)> = None;
    let mut offset = 0;

    for line in input.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        while code.get(next_code).is_some_and(|range| range.end <= start) {
            next_code += 1;
        }
        let in_code = code
            .get(next_code)
            .is_some_and(|range| range.start < offset);

        if in_code || line.trim().is_empty() {
            if let Some((from, to)) = block.take() {
                push_block(&mut segments, &input[from..to]);
            }
            push_verbatim(&mut segments, line);
        } else {
            block = Some(block.map_or((start, offset), |(from, _)| (from, offset)));
        }
    }

    if let Some((from, to)) = block {
        push_block(&mut segments, &input[from..to]);
    }

    segments
}

/// Source ranges of all code blocks, in document order.
fn code_ranges(input: &str, options: Options) -> Vec<Range<usize>> {
    Parser::new_ext(input, options)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) => Some(range),
            _ => None,
        })
        .collect()
}

fn push_block<'a>(segments: &mut Vec<Segment<'a>>, raw: &'a str) {
    let text = raw
        .strip_suffix('\n')
        .map_or(raw, |s| s.strip_suffix('\r').unwrap_or(s));
    segments.push(Segment::Block(text));
    push_verbatim(segments, &raw[text.len()..]);
}

fn push_verbatim<'a>(segments: &mut Vec<Segment<'a>>, text: &'a str) {
    if !text.is_empty() {
        segments.push(Segment::Verbatim(text));
    }
}
