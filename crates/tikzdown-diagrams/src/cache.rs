//! Compilation cache keyed by exact block text.
//!
//! Keys are not normalized: two blocks that differ only in whitespace are
//! distinct entries. Only successful compiles are stored.

use std::collections::HashMap;

use tikzdown_svg::Element;

/// Store for compiled diagram trees.
pub trait DiagramCache {
    /// Look up the tree compiled from `block`.
    fn get(&self, block: &str) -> Option<Element>;

    /// Remember the tree compiled from `block`.
    fn insert(&mut self, block: String, tree: Element);
}

/// Unbounded in-memory cache living as long as its owner.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, Element>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached diagrams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DiagramCache for MemoryCache {
    fn get(&self, block: &str) -> Option<Element> {
        self.entries.get(block).cloned()
    }

    fn insert(&mut self, block: String, tree: Element) {
        self.entries.insert(block, tree);
    }
}

/// No-op cache: every lookup misses and every insert is discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl DiagramCache for NullCache {
    fn get(&self, _block: &str) -> Option<Element> {
        None
    }

    fn insert(&mut self, _block: String, _tree: Element) {}
}
