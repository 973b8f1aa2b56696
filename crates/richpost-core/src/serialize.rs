//! HTML serialization
//!
//! Converts a document tree into the HTML string stored with a post.

use crate::ast::{Align, ElementKind, Text};
use crate::options::Options;
use crate::tree::{Document, NodeData, NodeId};

/// Serialize a document to HTML
pub fn serialize(doc: &Document, options: &Options) -> String {
    let mut output = String::with_capacity(256);
    for &root in doc.roots() {
        serialize_node(doc, root, options, &mut output);
    }
    output
}

/// Serialize one subtree to HTML
pub fn serialize_node_to_string(doc: &Document, id: NodeId, options: &Options) -> String {
    let mut output = String::new();
    serialize_node(doc, id, options, &mut output);
    output
}

fn serialize_node(doc: &Document, id: NodeId, options: &Options, out: &mut String) {
    match doc.get(id) {
        Some(NodeData::Text(text)) => serialize_text(text, out),
        Some(NodeData::Element { kind, align }) => {
            serialize_element(doc, id, kind, *align, options, out)
        }
        None => {}
    }
}

/// Marks nest bold outermost, then italic, then underline
fn serialize_text(text: &Text, out: &mut String) {
    if text.is_empty() {
        return;
    }
    let marks = text.marks;
    if marks.bold {
        out.push_str("<strong>");
    }
    if marks.italic {
        out.push_str("<em>");
    }
    if marks.underline {
        out.push_str("<u>");
    }
    escape_text_into(&text.text, out);
    if marks.underline {
        out.push_str("</u>");
    }
    if marks.italic {
        out.push_str("</em>");
    }
    if marks.bold {
        out.push_str("</strong>");
    }
}

fn serialize_element(
    doc: &Document,
    id: NodeId,
    kind: &ElementKind,
    align: Option<Align>,
    options: &Options,
    out: &mut String,
) {
    if let ElementKind::Image { url, alt } = kind {
        serialize_image(url, alt.as_deref(), options, out);
        return;
    }

    let tag = kind.tag();
    out.push('<');
    out.push_str(tag);
    if let Some(align) = align {
        out.push_str(" style=\"text-align: ");
        out.push_str(align.as_str());
        out.push('"');
    }
    out.push('>');

    for &child in doc.children(id) {
        serialize_node(doc, child, options, out);
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn serialize_image(url: &str, alt: Option<&str>, options: &Options, out: &mut String) {
    out.push_str("<img src=\"");
    escape_attr_into(url, out);
    out.push_str("\" alt=\"");
    escape_attr_into(alt.unwrap_or(""), out);
    out.push('"');
    if !options.image_style.is_empty() {
        out.push_str(" style=\"");
        escape_attr_into(&options.image_style, out);
        out.push('"');
    }
    out.push_str(" />");
}

fn escape_text_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
