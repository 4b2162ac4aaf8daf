//! Owned element tree for SVG documents.

/// SVG namespace URI.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// `XLink` namespace URI (used by `xlink:href` in TeX-generated SVG).
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Namespace bound to the reserved `xml:` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Element in a parsed SVG tree.
///
/// Names in a namespace use `{uri}local` notation for both tags and attribute
/// keys; unqualified names are stored as-is. Text follows the element-tree
/// convention: `text` is the content before the first child, `tail` is the
/// content after this element's end tag and before the next sibling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name, possibly in `{uri}local` form.
    pub tag: String,
    /// Attributes in document order. Keys are unique.
    pub attrs: Vec<(String, String)>,
    /// Direct text content.
    pub text: String,
    /// Text after the element (XML tail).
    pub tail: String,
    /// Child elements.
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Add or replace an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    /// Look up an attribute value by key.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing the value in place if the key exists.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.attrs.push((key, value));
        }
    }

    /// Whether no attribute key of `self` also appears on `other`.
    #[must_use]
    pub fn attrs_disjoint(&self, other: &Element) -> bool {
        self.attrs
            .iter()
            .all(|(key, _)| other.attr(key).is_none())
    }

    /// Namespace URI of the tag, if it is in `{uri}local` form.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        split_qualified(&self.tag).0
    }

    /// Local part of the tag.
    #[must_use]
    pub fn local_name(&self) -> &str {
        split_qualified(&self.tag).1
    }

    /// Iterate over this element and all descendants in document order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Visit this element and all descendants in document order.
    pub fn walk_mut(&mut self, mut f: impl FnMut(&mut Element)) {
        let mut stack = vec![self];
        while let Some(element) = stack.pop() {
            f(&mut *element);
            stack.extend(element.children.iter_mut().rev());
        }
    }
}

/// Pre-order iterator over an element and its descendants.
pub struct Iter<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// Split a `{uri}local` name into its namespace and local part.
pub(crate) fn split_qualified(name: &str) -> (Option<&str>, &str) {
    name.strip_prefix('{')
        .and_then(|rest| rest.split_once('}'))
        .map_or((None, name), |(uri, local)| (Some(uri), local))
}
