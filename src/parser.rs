//! HTML5 fragment parsing using html5ever
//!
//! This module parses HTML fragments into a DOM tree and provides the small
//! set of read-only DOM helpers the converter needs: locating the synthetic
//! `body` root, serializing a node back to its own literal markup, extracting
//! text content, and looking up element attributes.
//!
//! # Overview
//!
//! The parser uses Mozilla's html5ever library, which implements the WHATWG
//! HTML5 parsing algorithm. Fragments without `html`/`body` wrappers are
//! wrapped automatically by the tree builder, so unbalanced or partial markup
//! never errors; worst case the resulting `body` has no children and the
//! conversion produces an empty string.
//!
//! # Examples
//!
//! ```rust
//! use block_converter::parser::{parse_fragment, fragment_root, serialize_node};
//!
//! let dom = parse_fragment("<p>Hello</p>");
//! let body = fragment_root(&dom).expect("fragment has a body");
//! let first = body.children.borrow()[0].clone();
//! assert_eq!(serialize_node(&first), "<p>Hello</p>");
//! ```

use html5ever::parse_document;
use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Parse an HTML fragment into a DOM tree
///
/// html5ever wraps the fragment in a synthetic `html`/`head`/`body` shell, so
/// malformed or partial markup is recovered silently rather than surfaced as
/// an error.
pub fn parse_fragment(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Locate the synthetic `body` element that holds the fragment's top-level
/// children
///
/// Returns `None` only if html5ever produced no `body` at all, which does not
/// happen for any string input; callers treat `None` as "empty fragment".
pub fn fragment_root(dom: &RcDom) -> Option<Handle> {
    find_element(&dom.document, "body")
}

fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { ref name, .. } = node.data
        && name.local.as_ref() == tag
    {
        return Some(node.clone());
    }

    for child in node.children.borrow().iter() {
        if let Some(found) = find_element(child, tag) {
            return Some(found);
        }
    }

    None
}

/// Serialize a node to its own literal markup, including the node's own tag
///
/// This is the DOM-to-text operation every tag rule uses for block content.
/// Serialization failures cannot occur for rcdom trees built by the parser;
/// the empty string is returned defensively so a broken node degrades to a
/// dropped block rather than a panic.
pub fn serialize_node(node: &Handle) -> String {
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    let mut buf = Vec::new();
    let serializable = SerializableHandle::from(node.clone());
    if serialize(&mut buf, &serializable, opts).is_err() {
        return String::new();
    }

    String::from_utf8(buf).unwrap_or_default()
}

/// Collect the concatenated text content of a node and its descendants
///
/// Equivalent to the DOM `textContent` property: element boundaries contribute
/// nothing, text nodes are concatenated in document order.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { ref contents } = node.data {
        out.push_str(&contents.borrow());
    }

    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// Look up an attribute value on an element node
///
/// Returns `None` for non-element nodes and for absent attributes.
pub fn get_attribute(node: &Handle, attr_name: &str) -> Option<String> {
    if let NodeData::Element { ref attrs, .. } = node.data {
        attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == attr_name)
            .map(|attr| attr.value.to_string())
    } else {
        None
    }
}

/// Get the local tag name of an element node
///
/// Returns `None` for text, comment, and other non-element nodes.
pub fn tag_name(node: &Handle) -> Option<String> {
    if let NodeData::Element { ref name, .. } = node.data {
        Some(name.local.as_ref().to_string())
    } else {
        None
    }
}
