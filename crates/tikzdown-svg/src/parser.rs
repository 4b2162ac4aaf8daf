//! Namespace-aware SVG parser.

use std::path::Path;
use std::str;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::element::Element;
use crate::error::SvgError;

/// Parse an SVG document into an [`Element`] tree.
///
/// Element and attribute names bound to a namespace are stored as
/// `{uri}local`. Namespace declarations (`xmlns`, `xmlns:*`) are consumed by
/// the resolver and do not appear as attributes. Comments, processing
/// instructions and the doctype are dropped. Content after the root element
/// is ignored.
///
/// # Errors
///
/// Returns an error if the input is not well-formed XML or contains no element.
pub fn parse_svg(xml: &str) -> Result<Element, SvgError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let element = start_element(&reader, &e)?;
                stack.push(element);
            }
            Event::Empty(e) => {
                let element = start_element(&reader, &e)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                append_text(&mut stack, &text);
            }
            Event::GeneralRef(e) => {
                let text = if let Some(ch) = e.resolve_char_ref()? {
                    ch.to_string()
                } else {
                    let entity = reader.decoder().decode(&e)?;
                    resolve_predefined_entity(&entity)
                        .map_or_else(|| format!("&{entity};"), str::to_owned)
                };
                append_text(&mut stack, &text);
            }
            Event::CData(e) => {
                append_text(&mut stack, &String::from_utf8_lossy(&e));
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    // Unclosed elements at EOF are a reader error, so the stack is empty here.
    root.ok_or(SvgError::MissingRoot)
}

/// Read and parse an SVG file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn parse_svg_file(path: &Path) -> Result<Element, SvgError> {
    let content = std::fs::read_to_string(path)?;
    parse_svg(&content)
}

/// Build an element (without children) from a start or empty tag.
fn start_element(reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> Result<Element, SvgError> {
    let (ns, local) = reader.resolve_element(e.name());
    let mut element = Element::new(qualify(ns, local.as_ref(), e.name().as_ref())?);

    for attr in e.attributes() {
        let attr = attr?;
        let raw_key = str::from_utf8(attr.key.as_ref())?;
        if raw_key == "xmlns" || raw_key.starts_with("xmlns:") {
            continue;
        }

        let (ns, local) = reader.resolve_attribute(attr.key);
        let key = qualify(ns, local.as_ref(), attr.key.as_ref())?;
        let value = attr.unescape_value()?.into_owned();
        element.attrs.push((key, value));
    }

    Ok(element)
}

/// Format a resolved name as `{uri}local`, or keep it as written when unbound.
fn qualify(ns: ResolveResult<'_>, local: &[u8], raw: &[u8]) -> Result<String, SvgError> {
    Ok(match ns {
        ResolveResult::Bound(Namespace(uri)) => {
            format!("{{{}}}{}", str::from_utf8(uri)?, str::from_utf8(local)?)
        }
        ResolveResult::Unbound => str::from_utf8(local)?.to_owned(),
        ResolveResult::Unknown(_) => str::from_utf8(raw)?.to_owned(),
    })
}

/// Attach a finished element to its parent, or make it the root.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    }
}

/// Append text to the open element's text or its last child's tail.
fn append_text(stack: &mut [Element], text: &str) {
    let Some(node) = stack.last_mut() else {
        return;
    };
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}
