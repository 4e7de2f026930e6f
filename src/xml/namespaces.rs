//! XML namespaces used in content package documents.

use indexmap::IndexMap;

pub const NS_JCR: &str = "http://www.jcp.org/jcr/1.0";
pub const NS_JCR_NT: &str = "http://www.jcp.org/jcr/nt/1.0";
pub const NS_JCR_REP: &str = "internal";
pub const NS_CQ: &str = "http://www.day.com/jcr/cq/1.0";
pub const NS_CRX: &str = "http://www.day.com/crx/1.0";
pub const NS_SLING: &str = "http://sling.apache.org/jcr/sling/1.0";
pub const NS_OAK: &str = "http://jackrabbit.apache.org/oak/ns/1.0";

/// Prefix reserved by XML itself; never declared.
pub const XML_PREFIX: &str = "xml";
pub const XMLNS: &str = "xmlns";

/// Namespaces registered for every package, in declaration order.
pub const DEFAULT_NAMESPACES: [(&str, &str); 7] = [
    ("jcr", NS_JCR),
    ("nt", NS_JCR_NT),
    ("rep", NS_JCR_REP),
    ("cq", NS_CQ),
    ("crx", NS_CRX),
    ("sling", NS_SLING),
    ("oak", NS_OAK),
];

/// Prefix to URI map, in declaration order.
pub type NamespaceMap = IndexMap<String, String>;

/// A fresh map holding [`DEFAULT_NAMESPACES`].
pub fn default_namespaces() -> NamespaceMap {
    DEFAULT_NAMESPACES
        .iter()
        .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
        .collect()
}
