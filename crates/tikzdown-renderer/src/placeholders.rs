//! Placeholders for processor output that must bypass markdown parsing.

use std::collections::HashMap;

const SUFFIX: &str = "-->";

/// Processor output keyed by block index, substituted after rendering.
///
/// Each entry is represented in the markdown source by an HTML comment on a
/// line of its own, which `CommonMark` passes through as a raw HTML block.
/// The comment carries a nonce that does not occur in the source document,
/// so comments written by the author are never mistaken for markers.
#[derive(Debug)]
pub(crate) struct Placeholders {
    prefix: String,
    map: HashMap<usize, String>,
}

impl Placeholders {
    /// Create placeholders whose markers cannot collide with `source`.
    pub(crate) fn for_source(source: &str) -> Self {
        let nonce = (0_u64..)
            .find(|nonce| !source.contains(&nonce_tag(*nonce)))
            .unwrap_or_default();

        Self {
            prefix: format!("<!--{}", nonce_tag(nonce)),
            map: HashMap::new(),
        }
    }

    /// Store `html` for `index` and return the marker line to put in its place.
    pub(crate) fn insert(&mut self, index: usize, html: String) -> String {
        self.map.insert(index, html);
        format!("{}{index}{SUFFIX}", self.prefix)
    }

    /// Replace every known marker in `html` in a single pass.
    ///
    /// Markers with an unknown or malformed index are left as they are.
    pub(crate) fn apply(self, html: &mut String) {
        if self.map.is_empty() {
            return;
        }

        let prefix = self.prefix.as_str();
        let mut result = String::with_capacity(html.len());
        let mut remaining = html.as_str();

        while let Some(start) = remaining.find(prefix) {
            result.push_str(&remaining[..start]);

            let after_prefix = &remaining[start + prefix.len()..];
            let Some(end) = after_prefix.find(SUFFIX) else {
                result.push_str(&remaining[start..]);
                remaining = "";
                break;
            };

            let marker_end = start + prefix.len() + end + SUFFIX.len();
            match after_prefix[..end]
                .parse::<usize>()
                .ok()
                .and_then(|index| self.map.get(&index))
            {
                Some(replacement) => result.push_str(replacement.trim_end_matches('\n')),
                None => result.push_str(&remaining[start..marker_end]),
            }
            remaining = &remaining[marker_end..];
        }

        result.push_str(remaining);
        *html = result;
    }
}

fn nonce_tag(nonce: u64) -> String {
    format!("tikzdown-{nonce:x}-block-")
}
