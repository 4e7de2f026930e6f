//! Diff-friendly XML output.
//!
//! Standard pretty printing with four-space indentation and `\n` line
//! endings, except that an element with more than one attribute, or with
//! namespace declarations, gets every declaration and attribute on a line
//! of its own. A single attribute stays on the tag line.

use super::dom::{XmlDocument, XmlElement, XmlNode};
use crate::common::Result;
use crate::common::xml::{escape_attribute, escape_text};
use std::io::Write;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const INDENT: &str = "    ";

/// Serialize a document to a string.
///
/// # Examples
///
/// ```
/// use contentpack::xml::{XmlDocument, XmlElement, to_xml_string};
///
/// let mut root = XmlElement::new("jcr:root");
/// root.declare_namespace("jcr", "http://www.jcp.org/jcr/1.0");
/// root.set_attribute("jcr:primaryType", "sling:Folder");
/// let xml = to_xml_string(&XmlDocument::new(root));
/// assert!(xml.contains("<jcr:root\n    xmlns:jcr="));
/// ```
pub fn to_xml_string(doc: &XmlDocument) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    write_element(&mut out, &doc.root, 0);
    out.push('\n');
    out
}

/// Serialize a document into a writer.
pub fn write_document<W: Write>(doc: &XmlDocument, writer: &mut W) -> Result<()> {
    writer.write_all(to_xml_string(doc).as_bytes())?;
    Ok(())
}

fn write_element(out: &mut String, element: &XmlElement, level: usize) {
    out.push('<');
    out.push_str(&element.name);

    let multiline = element.attributes.len() > 1 || !element.namespaces.is_empty();
    for ns in &element.namespaces {
        if ns.prefix.is_empty() {
            write_attribute(out, "xmlns", &ns.uri, multiline, level);
        } else {
            write_attribute(out, &format!("xmlns:{}", ns.prefix), &ns.uri, multiline, level);
        }
    }
    for attr in &element.attributes {
        write_attribute(out, &attr.name, &attr.value, multiline, level);
    }

    let children: Vec<&XmlNode> = element
        .children
        .iter()
        .filter(|node| !matches!(node, XmlNode::Text(t) if t.trim().is_empty()))
        .collect();
    if children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');

    if children.iter().all(|node| matches!(node, XmlNode::Text(_))) {
        for node in children {
            if let XmlNode::Text(text) = node {
                out.push_str(&escape_text(text));
            }
        }
    } else {
        for node in children {
            out.push('\n');
            push_indent(out, level + 1);
            match node {
                XmlNode::Element(child) => write_element(out, child, level + 1),
                XmlNode::Text(text) => out.push_str(&escape_text(text.trim())),
                XmlNode::Comment(comment) => {
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                },
            }
        }
        out.push('\n');
        push_indent(out, level);
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn write_attribute(out: &mut String, name: &str, value: &str, multiline: bool, level: usize) {
    if multiline {
        out.push('\n');
        push_indent(out, level + 1);
    } else {
        out.push(' ');
    }
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attribute(value));
    out.push('"');
}

#[inline]
fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}
