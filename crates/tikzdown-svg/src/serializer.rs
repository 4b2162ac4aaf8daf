//! SVG serializer.

use std::borrow::Cow;
use std::fmt::Write;

use quick_xml::escape::{escape, partial_escape};

use crate::element::{Element, XLINK_NAMESPACE, XML_NAMESPACE, split_qualified};

/// Serialize an element tree to markup.
///
/// Names in `{uri}local` form get a prefix: `xml` and `xlink` for their
/// well-known namespaces, `ns0`, `ns1`, ... otherwise. Required `xmlns:*`
/// declarations are emitted on the root element. The root's own tail is not
/// written.
#[must_use]
pub fn serialize(root: &Element) -> String {
    let prefixes = Prefixes::collect(root);
    let mut out = String::with_capacity(4096);
    write_element(root, &prefixes, true, &mut out);
    out
}

/// Namespace URI to prefix assignments for one serialization.
struct Prefixes {
    entries: Vec<(String, String)>,
}

impl Prefixes {
    /// Assign prefixes to every namespace used in the tree, in document order.
    fn collect(root: &Element) -> Self {
        let mut prefixes = Self {
            entries: Vec::new(),
        };
        for element in root.iter() {
            prefixes.register(&element.tag);
            for (key, _) in &element.attrs {
                prefixes.register(key);
            }
        }
        prefixes
    }

    fn register(&mut self, name: &str) {
        let (Some(uri), _) = split_qualified(name) else {
            return;
        };
        if self.entries.iter().any(|(u, _)| u == uri) {
            return;
        }
        let prefix = match uri {
            XML_NAMESPACE => "xml".to_owned(),
            XLINK_NAMESPACE => "xlink".to_owned(),
            _ => {
                let generated = self
                    .entries
                    .iter()
                    .filter(|(_, p)| p.starts_with("ns"))
                    .count();
                format!("ns{generated}")
            }
        };
        self.entries.push((uri.to_owned(), prefix));
    }

    /// Render a name with its prefix.
    fn qualified<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match split_qualified(name) {
            (Some(uri), local) => self
                .entries
                .iter()
                .find(|(u, _)| u == uri)
                .map_or(Cow::Borrowed(local), |(_, prefix)| {
                    Cow::Owned(format!("{prefix}:{local}"))
                }),
            (None, local) => Cow::Borrowed(local),
        }
    }

    /// Declarations to place on the root element.
    fn declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(|(uri, _)| uri != XML_NAMESPACE)
            .map(|(uri, prefix)| (prefix.as_str(), uri.as_str()))
    }
}

/// Serialize a single element recursively.
fn write_element(element: &Element, prefixes: &Prefixes, is_root: bool, out: &mut String) {
    let tag = prefixes.qualified(&element.tag);

    out.push('<');
    out.push_str(&tag);

    for (key, value) in &element.attrs {
        write!(out, r#" {}="{}""#, prefixes.qualified(key), escape(value.as_str())).unwrap();
    }
    if is_root {
        for (prefix, uri) in prefixes.declarations() {
            write!(out, r#" xmlns:{prefix}="{}""#, escape(uri)).unwrap();
        }
    }

    if element.children.is_empty() && element.text.is_empty() {
        out.push_str(" />");
    } else {
        out.push('>');
        out.push_str(&partial_escape(element.text.as_str()));
        for child in &element.children {
            write_element(child, prefixes, false, out);
        }
        write!(out, "</{tag}>").unwrap();
    }

    if !is_root {
        out.push_str(&partial_escape(element.tail.as_str()));
    }
}
