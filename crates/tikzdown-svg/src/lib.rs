//! SVG element tree for tikzdown.
//!
//! TeX-produced SVG is verbose: every graphics state change opens a new `<g>`
//! carrying a single attribute, and the whole document lives in the SVG
//! namespace. This crate parses such files into an owned [`Element`] tree,
//! simplifies it, and serializes it back for inline embedding in HTML.
//!
//! - [`parse_svg`] / [`parse_svg_file`]: XML to [`Element`] (namespaced names
//!   are kept in `{uri}local` form)
//! - [`normalize`]: namespace strip, whitespace strip and group collapse
//! - [`serialize`]: [`Element`] back to markup
//!
//! # Example
//!
//! ```
//! use tikzdown_svg::{SVG_NAMESPACE, normalize, parse_svg, serialize};
//!
//! let svg = parse_svg(
//!     r#"<svg xmlns="http://www.w3.org/2000/svg"><g fill="red"><g stroke="blue"> <path d="M0 0"/> </g></g></svg>"#,
//! )
//! .unwrap();
//! let svg = normalize(svg, SVG_NAMESPACE);
//!
//! assert_eq!(
//!     serialize(&svg),
//!     r#"<svg xmlns="http://www.w3.org/2000/svg"><g fill="red" stroke="blue"><path d="M0 0" /></g></svg>"#
//! );
//! ```

mod element;
mod error;
mod normalize;
mod parser;
mod serializer;

pub use element::{Element, SVG_NAMESPACE, XLINK_NAMESPACE, XML_NAMESPACE};
pub use error::SvgError;
pub use normalize::{collapse_groups, normalize, strip_namespace, strip_whitespace};
pub use parser::{parse_svg, parse_svg_file};
pub use serializer::serialize;
