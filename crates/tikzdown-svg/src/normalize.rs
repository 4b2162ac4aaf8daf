//! Tree simplification for compiler-generated SVG.
//!
//! Three transforms, applied by [`normalize`] in this order:
//! 1. [`strip_namespace`]: make tags in the SVG namespace unqualified
//! 2. [`strip_whitespace`]: trim text and tails
//! 3. [`collapse_groups`]: merge single-child chains of same-tag elements

use crate::element::Element;

/// Apply all transforms and return the simplified tree.
#[must_use]
pub fn normalize(mut root: Element, namespace: &str) -> Element {
    strip_namespace(&mut root, namespace);
    strip_whitespace(&mut root);
    collapse_groups(&mut root);
    root
}

/// Declare `namespace` as the root's default namespace and unqualify tags in it.
///
/// Tags in other namespaces keep their `{uri}local` form. Attribute keys are
/// not touched.
pub fn strip_namespace(root: &mut Element, namespace: &str) {
    root.set_attr("xmlns", namespace);

    let prefix = format!("{{{namespace}}}");
    root.walk_mut(|element| {
        if let Some(local) = element.tag.strip_prefix(&prefix) {
            element.tag = local.to_owned();
        }
    });
}

/// Trim leading and trailing whitespace from every text and tail.
///
/// Interior whitespace is kept. This is lossy for `xml:space="preserve"`
/// content, which TeX output does not use.
pub fn strip_whitespace(root: &mut Element) {
    root.walk_mut(|element| {
        trim_in_place(&mut element.text);
        trim_in_place(&mut element.tail);
    });
}

fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_owned();
    }
}

/// Merge an element with its only child while both share a tag and have
/// disjoint attribute keys, then do the same for every descendant.
///
/// The child's attributes are appended after the parent's and its children
/// are moved up. Its text is appended to the parent's text; its tail is
/// moved to the last moved-up child, or to the parent's text if there is
/// none. When any attribute key collides the pair is left alone.
pub fn collapse_groups(root: &mut Element) {
    let mut pending = vec![root];
    while let Some(element) = pending.pop() {
        while absorb_only_child(element) {}
        pending.extend(element.children.iter_mut());
    }
}

/// Merge `element` with its only child if allowed. Returns whether it did.
fn absorb_only_child(element: &mut Element) -> bool {
    let [child] = element.children.as_slice() else {
        return false;
    };
    if child.tag != element.tag || !element.attrs_disjoint(child) {
        return false;
    }

    let Some(child) = element.children.pop() else {
        return false;
    };
    element.attrs.extend(child.attrs);
    element.text.push_str(&child.text);
    element.children = child.children;
    match element.children.last_mut() {
        Some(last) => last.tail.push_str(&child.tail),
        None => element.text.push_str(&child.tail),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{SVG_NAMESPACE, XLINK_NAMESPACE};
    use crate::parser::parse_svg;
    use crate::serializer::serialize;
    use pretty_assertions::assert_eq;

    fn g(attrs: &[(&str, &str)], children: Vec<Element>) -> Element {
        attrs
            .iter()
            .fold(Element::new("g"), |e, (k, v)| e.with_attr(*k, *v))
            .with_children(children)
    }

    #[test]
    fn test_strip_namespace() {
        let mut tree = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:o="urn:other"><g><o:meta/></g></svg>"#,
        )
        .unwrap();

        strip_namespace(&mut tree, SVG_NAMESPACE);

        assert_eq!(tree.tag, "svg");
        assert_eq!(tree.attr("xmlns"), Some(SVG_NAMESPACE));
        assert_eq!(tree.children[0].tag, "g");
        // Other namespaces stay qualified
        assert_eq!(tree.children[0].children[0].tag, "{urn:other}meta");

        let qualified = format!("{{{SVG_NAMESPACE}}}");
        assert!(tree.iter().all(|e| !e.tag.contains(&qualified)));
    }

    #[test]
    fn test_strip_namespace_overwrites_existing_xmlns() {
        let mut tree = Element::new("svg").with_attr("xmlns", "urn:old");

        strip_namespace(&mut tree, SVG_NAMESPACE);

        assert_eq!(tree.attrs, vec![("xmlns".to_owned(), SVG_NAMESPACE.to_owned())]);
    }

    #[test]
    fn test_strip_whitespace() {
        let mut tree = Element::new("svg").with_text("\n  ").with_children(vec![
            Element::new("text")
                .with_text("  two  words \n")
                .with_tail("\t"),
        ]);

        strip_whitespace(&mut tree);

        assert_eq!(tree.text, "");
        assert_eq!(tree.children[0].text, "two  words");
        assert_eq!(tree.children[0].tail, "");
    }

    #[test]
    fn test_collapse_chain() {
        let mut tree = g(
            &[("fill", "red")],
            vec![g(
                &[("stroke", "blue")],
                vec![g(&[("stroke-width", "1")], vec![Element::new("path")])],
            )],
        );

        collapse_groups(&mut tree);

        assert_eq!(
            tree,
            g(
                &[("fill", "red"), ("stroke", "blue"), ("stroke-width", "1")],
                vec![Element::new("path")]
            )
        );
    }

    #[test]
    fn test_collapse_attribute_collision_is_skipped() {
        let inner = g(&[("fill", "blue")], vec![Element::new("path")]);
        let mut tree = g(&[("fill", "red")], vec![inner.clone()]);

        collapse_groups(&mut tree);

        assert_eq!(tree, g(&[("fill", "red")], vec![inner]));
    }

    #[test]
    fn test_collapse_requires_single_child() {
        let original = g(
            &[("fill", "red")],
            vec![g(&[("stroke", "blue")], vec![]), g(&[("opacity", "0.5")], vec![])],
        );
        let mut tree = original.clone();

        collapse_groups(&mut tree);

        assert_eq!(tree, original);
    }

    #[test]
    fn test_collapse_requires_same_tag() {
        let original = Element::new("svg").with_children(vec![g(&[("fill", "red")], vec![])]);
        let mut tree = original.clone();

        collapse_groups(&mut tree);

        assert_eq!(tree, original);
    }

    #[test]
    fn test_collapse_descends_after_merge() {
        let mut tree = Element::new("svg").with_children(vec![
            g(&[("a", "1")], vec![g(&[("b", "2")], vec![])]),
            g(
                &[("c", "3")],
                vec![Element::new("text").with_children(vec![
                    Element::new("text").with_attr("d", "4").with_text("label"),
                ])],
            ),
        ]);

        collapse_groups(&mut tree);

        assert_eq!(
            tree,
            Element::new("svg").with_children(vec![
                g(&[("a", "1"), ("b", "2")], vec![]),
                g(
                    &[("c", "3")],
                    vec![Element::new("text").with_attr("d", "4").with_text("label")]
                ),
            ])
        );
    }

    #[test]
    fn test_collapse_keeps_text_order() {
        let mut tree = g(
            &[],
            vec![
                g(&[("x", "1")], vec![Element::new("tspan").with_tail("mid")])
                    .with_text("start")
                    .with_tail("end"),
            ],
        );

        collapse_groups(&mut tree);

        assert_eq!(tree.text, "start");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].tail, "midend");
    }

    #[test]
    fn test_collapse_merged_size_is_sum() {
        let parent = g(&[("a", "1"), ("b", "2")], vec![]);
        let child = g(&[("c", "3")], vec![]);
        let (parent_len, child_len) = (parent.attrs.len(), child.attrs.len());
        let mut tree = parent.with_children(vec![child]);

        collapse_groups(&mut tree);

        assert!(tree.children.is_empty());
        assert_eq!(tree.attrs.len(), parent_len + child_len);
    }

    #[test]
    fn test_collapse_idempotent() {
        let xml = r#"<svg><g a="1"><g b="2"><g a="3"><g c="4"><path/></g></g></g></g><g><g d="1"/><g/></g></svg>"#;
        let mut once = parse_svg(xml).unwrap();
        collapse_groups(&mut once);
        let mut twice = once.clone();
        collapse_groups(&mut twice);

        assert_eq!(once, twice);
        assert_eq!(
            serialize(&once),
            r#"<svg><g a="1" b="2"><g a="3" c="4"><path /></g></g><g><g d="1" /><g /></g></svg>"#
        );
    }

    #[test]
    fn test_normalize_tex_output() {
        let xml = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="40pt" height="20pt">
  <g stroke="#000">
    <g fill="none">
      <g stroke-width="0.4">
        <path d="M0 0L10 10"/>
      </g>
    </g>
  </g>
  <use xlink:href="#glyph0" x="3"/>
</svg>
"##;
        let tree = normalize(parse_svg(xml).unwrap(), SVG_NAMESPACE);

        assert_eq!(
            serialize(&tree),
            r##"<svg width="40pt" height="20pt" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><g stroke="#000" fill="none" stroke-width="0.4"><path d="M0 0L10 10" /></g><use xlink:href="#glyph0" x="3" /></svg>"##
        );
        assert_eq!(tree.children[1].attr(&format!("{{{XLINK_NAMESPACE}}}href")), Some("#glyph0"));
    }
}
