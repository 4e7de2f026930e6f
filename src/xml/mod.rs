//! Namespace-aware XML documents: the mutable tree, the streaming reader,
//! the diff-friendly writer and the builder that renders content maps.

mod builder;
pub mod dom;
pub mod namespaces;
mod reader;
mod writer;

pub use builder::{JCR_ROOT, XmlContentBuilder};
pub use dom::{Namespace, XmlAttribute, XmlDocument, XmlElement, XmlNode};
pub use namespaces::{NamespaceMap, default_namespaces};
pub use reader::{NamespaceScan, parse_document, scan_namespaces};
pub(crate) use reader::prefix_or_default;
pub use writer::{XML_DECLARATION, to_xml_string, write_document};
