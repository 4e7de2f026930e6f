//! Builds `.content.xml` documents from content maps.

use super::dom::{XmlDocument, XmlElement};
use super::namespaces::NamespaceMap;
use crate::common::Result;
use crate::content::node_types::{
    CQ_PAGE, CQ_PAGE_CONTENT, JCR_CONTENT, JCR_ENCODING, JCR_MIMETYPE, JCR_PRIMARYTYPE, NT_FILE,
    NT_RESOURCE, NT_UNSTRUCTURED,
};
use crate::content::{ContentMap, ContentValue, primary_type};
use crate::name::iso9075;
use crate::value::{Value, ValueConverter};

/// Name of the root element of every document.
pub const JCR_ROOT: &str = "jcr:root";

/// Renders content maps as namespace-aware documents.
///
/// Every document root declares all registered namespaces. Attributes whose
/// prefix is not registered are written with their plain qualified name.
#[derive(Debug, Clone)]
pub struct XmlContentBuilder {
    namespaces: NamespaceMap,
    converter: ValueConverter,
}

impl XmlContentBuilder {
    pub fn new(namespaces: NamespaceMap) -> Self {
        Self {
            namespaces,
            converter: ValueConverter::new(),
        }
    }

    pub fn namespaces(&self) -> &NamespaceMap {
        &self.namespaces
    }

    /// Page document: a `cq:Page` root with a `cq:PageContent` content node
    /// holding the given properties and children.
    pub fn build_page(&self, content: &ContentMap) -> Result<XmlDocument> {
        let mut root = self.create_root(CQ_PAGE);
        let jcr_content = create_content(&mut root, CQ_PAGE_CONTENT);
        self.export_payload(jcr_content, content)?;
        Ok(XmlDocument::new(root))
    }

    /// Generic document; the root type is taken from the content, falling
    /// back to `nt:unstructured`.
    pub fn build_content(&self, content: &ContentMap) -> Result<XmlDocument> {
        let primary = primary_type(content).unwrap_or(NT_UNSTRUCTURED);
        let mut root = self.create_root(primary);
        self.export_payload(&mut root, content)?;
        Ok(XmlDocument::new(root))
    }

    /// `nt:file` metadata for a binary file. MIME type and encoding are only
    /// set when not empty.
    pub fn build_nt_file(&self, mime_type: Option<&str>, encoding: Option<&str>) -> XmlDocument {
        let mut root = self.create_root(NT_FILE);
        let jcr_content = create_content(&mut root, NT_RESOURCE);
        if let Some(mime_type) = mime_type.filter(|s| !s.is_empty()) {
            jcr_content.add_attribute(JCR_MIMETYPE, mime_type);
        }
        if let Some(encoding) = encoding.filter(|s| !s.is_empty()) {
            jcr_content.add_attribute(JCR_ENCODING, encoding);
        }
        XmlDocument::new(root)
    }

    fn create_root(&self, primary_type: &str) -> XmlElement {
        let mut root = XmlElement::new(JCR_ROOT);
        for (prefix, uri) in &self.namespaces {
            root.declare_namespace(prefix.as_str(), uri.as_str());
        }
        root.add_attribute(JCR_PRIMARYTYPE, primary_type);
        root
    }

    fn export_payload(&self, element: &mut XmlElement, content: &ContentMap) -> Result<()> {
        for (key, value) in content {
            match value {
                ContentValue::Property(Value::Null) => {},
                ContentValue::Node(child_map) => {
                    let mut child = XmlElement::new(iso9075::encode(key));
                    if !child_map.contains_key(JCR_PRIMARYTYPE) {
                        child.add_attribute(JCR_PRIMARYTYPE, NT_UNSTRUCTURED);
                    }
                    self.export_payload(&mut child, child_map)?;
                    element.push_child(child);
                },
                ContentValue::Property(value) => {
                    let text = self.converter.encode(key, value)?;
                    element.add_attribute(iso9075::encode(key), text);
                },
            }
        }
        Ok(())
    }
}

fn create_content<'a>(root: &'a mut XmlElement, primary_type: &str) -> &'a mut XmlElement {
    let mut content = XmlElement::new(JCR_CONTENT);
    content.add_attribute(JCR_PRIMARYTYPE, primary_type);
    root.push_child(content)
}
