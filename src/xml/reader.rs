//! Reading `.content.xml` documents.
//!
//! [`scan_namespaces`] is a forward-only pass that records namespace
//! declarations in the order they first appear, before anything in the
//! document is changed. [`parse_document`] builds the mutable tree.

use super::dom::{Namespace, XmlAttribute, XmlDocument, XmlElement, XmlNode, prefix_of};
use super::namespaces::{NamespaceMap, XMLNS};
use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::str;

/// Result of the namespace scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceScan {
    /// Declared prefixes in first-seen order. A prefix declared twice keeps
    /// its first URI.
    pub namespaces: NamespaceMap,
    /// Qualified name of the root element.
    pub root_name: String,
    /// URI of the root element's namespace, if declared on the root.
    pub root_namespace: Option<String>,
}

/// Record namespace declarations in document order.
pub fn scan_namespaces(xml: &[u8]) -> Result<NamespaceScan> {
    let mut reader = Reader::from_reader(xml);
    let mut scan = NamespaceScan::default();
    let mut seen_root = false;
    let mut depth = 0usize;

    loop {
        let (start, empty) = match reader.read_event()? {
            Event::Start(e) => (e, false),
            Event::Empty(e) => (e, true),
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                continue;
            },
            Event::Eof => break,
            _ => continue,
        };
        if seen_root && depth == 0 {
            return Err(Error::XmlError("multiple root elements".to_string()));
        }

        let element = start_element(&start)?;
        if !seen_root {
            seen_root = true;
            let root_prefix = element.prefix().unwrap_or_default();
            scan.root_namespace = element
                .namespaces
                .iter()
                .find(|ns| ns.prefix == root_prefix)
                .map(|ns| ns.uri.clone());
            scan.root_name = element.name.clone();
        }
        for ns in element.namespaces {
            scan.namespaces.entry(ns.prefix).or_insert(ns.uri);
        }
        if !empty {
            depth += 1;
        }
    }

    if !seen_root {
        return Err(Error::XmlError("document has no root element".to_string()));
    }
    if depth != 0 {
        return Err(Error::XmlError("unexpected end of document".to_string()));
    }
    Ok(scan)
}

/// Parse a document into a mutable tree.
///
/// Whitespace-only text is dropped and other text is trimmed; comments
/// inside the root element are kept.
pub fn parse_document(xml: &[u8]) -> Result<XmlDocument> {
    let mut reader = Reader::from_reader(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                flush_text(&mut stack, &mut text);
                stack.push(start_element(&e)?);
            },
            Event::Empty(e) => {
                flush_text(&mut stack, &mut text);
                let element = start_element(&e)?;
                close_element(&mut stack, &mut root, element)?;
            },
            Event::End(_) => {
                flush_text(&mut stack, &mut text);
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::XmlError("unexpected closing tag".to_string()))?;
                close_element(&mut stack, &mut root, element)?;
            },
            Event::Text(e) if !stack.is_empty() => {
                text.push_str(&unescape(str::from_utf8(&e)?)?);
            },
            Event::CData(e) if !stack.is_empty() => {
                text.push_str(str::from_utf8(&e)?);
            },
            Event::GeneralRef(e) if !stack.is_empty() => {
                let reference = format!("&{};", str::from_utf8(&e)?);
                text.push_str(&unescape(&reference)?);
            },
            Event::Comment(e) => {
                flush_text(&mut stack, &mut text);
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(XmlNode::Comment(str::from_utf8(&e)?.to_string()));
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    if !stack.is_empty() {
        return Err(Error::XmlError("unexpected end of document".to_string()));
    }
    root.map(XmlDocument::new)
        .ok_or_else(|| Error::XmlError("document has no root element".to_string()))
}

fn start_element(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(str::from_utf8(start.name().as_ref())?);
    for attr in start.attributes() {
        let attr = attr?;
        let key = str::from_utf8(attr.key.as_ref())?;
        let value = unescape(str::from_utf8(&attr.value)?)?.into_owned();
        if key == XMLNS {
            element.namespaces.push(Namespace::new("", value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            element.namespaces.push(Namespace::new(prefix, value));
        } else {
            element.attributes.push(XmlAttribute {
                name: key.to_string(),
                value,
            });
        }
    }
    Ok(element)
}

fn close_element(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(Error::XmlError("multiple root elements".to_string()));
    }
    Ok(())
}

fn flush_text(stack: &mut [XmlElement], text: &mut String) {
    let trimmed = text.trim();
    if !trimmed.is_empty()
        && let Some(parent) = stack.last_mut()
    {
        parent.children.push(XmlNode::Text(trimmed.to_string()));
    }
    text.clear();
}

/// Namespace prefix of a qualified name, or `""` for unqualified names.
#[inline]
pub(crate) fn prefix_or_default(name: &str) -> &str {
    prefix_of(name).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<jcr:root xmlns:cq="http://www.day.com/jcr/cq/1.0" xmlns:jcr="http://www.jcp.org/jcr/1.0"
    jcr:primaryType="cq:Page">
    <jcr:content xmlns:myns="http://example.com/myns"
        jcr:primaryType="cq:PageContent"
        jcr:title="Tom &amp; Jerry"
        myns:flag="{Boolean}true">
        <!-- note -->
        <par jcr:primaryType="nt:unstructured"/>
    </jcr:content>
</jcr:root>
"#;

    #[test]
    fn test_scan_namespaces_order() {
        let scan = scan_namespaces(PAGE.as_bytes()).unwrap();
        let prefixes: Vec<&str> = scan.namespaces.keys().map(String::as_str).collect();
        assert_eq!(prefixes, ["cq", "jcr", "myns"]);
        assert_eq!(scan.root_name, "jcr:root");
        assert_eq!(scan.root_namespace.as_deref(), Some("http://www.jcp.org/jcr/1.0"));
    }

    #[test]
    fn test_scan_first_uri_wins() {
        let xml = r#"<a:root xmlns:a="urn:a"><a:child xmlns:a="urn:other"/></a:root>"#;
        let scan = scan_namespaces(xml.as_bytes()).unwrap();
        assert_eq!(scan.namespaces.get("a").map(String::as_str), Some("urn:a"));
    }

    #[test]
    fn test_scan_root_without_namespace() {
        let scan = scan_namespaces(b"<project><a/></project>").unwrap();
        assert_eq!(scan.root_name, "project");
        assert_eq!(scan.root_namespace, None);
    }

    #[test]
    fn test_parse_document() {
        let doc = parse_document(PAGE.as_bytes()).unwrap();
        assert_eq!(doc.root.name, "jcr:root");
        assert_eq!(doc.root.namespaces.len(), 2);
        assert_eq!(doc.root.attribute("jcr:primaryType"), Some("cq:Page"));

        let content = doc.root.child("jcr:content").unwrap();
        assert_eq!(content.namespaces[0].prefix, "myns");
        assert_eq!(content.attribute("jcr:title"), Some("Tom & Jerry"));
        assert!(matches!(&content.children[0], XmlNode::Comment(c) if c.trim() == "note"));
        assert!(content.child("par").is_some());
    }

    #[test]
    fn test_parse_text_content() {
        let doc = parse_document(b"<a><b> x &lt; y </b></a>").unwrap();
        let b = doc.root.child("b").unwrap();
        assert_eq!(b.children, vec![XmlNode::Text("x < y".to_string())]);
    }

    #[test]
    fn test_malformed_documents() {
        assert!(parse_document(b"<a><b></a>").is_err());
        assert!(parse_document(b"<a>").is_err());
        assert!(parse_document(b"").is_err());
        assert!(scan_namespaces(b"<a>").is_err());
        assert!(scan_namespaces(b"not xml at all").is_err());
    }
}
