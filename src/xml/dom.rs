//! Minimal mutable document tree for `.content.xml` files.
//!
//! Names are kept in their qualified `prefix:local` form. Namespace
//! declarations are held separately from attributes so that they can be
//! collected and re-emitted in a controlled order.

/// A `xmlns:prefix="uri"` declaration. An empty prefix is the default
/// namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: String,
    pub uri: String,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: String,
    pub value: String,
}

impl XmlAttribute {
    /// Namespace prefix of the attribute name, if qualified.
    pub fn prefix(&self) -> Option<&str> {
        prefix_of(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub namespaces: Vec<Namespace>,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Namespace prefix of the element name, if qualified.
    pub fn prefix(&self) -> Option<&str> {
        prefix_of(&self.name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Set an attribute, replacing an existing value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(XmlAttribute { name, value }),
        }
    }

    /// Add an attribute unless one with the same name is present.
    /// Returns whether the attribute was added.
    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.has_attribute(&name) {
            return false;
        }
        self.attributes.push(XmlAttribute {
            name,
            value: value.into(),
        });
        true
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(pos).value)
    }

    /// Declare a namespace on this element. Returns `false` if the prefix
    /// is already declared here.
    pub fn declare_namespace(&mut self, prefix: impl Into<String>, uri: impl Into<String>) -> bool {
        let prefix = prefix.into();
        if self.namespaces.iter().any(|ns| ns.prefix == prefix) {
            return false;
        }
        self.namespaces.push(Namespace::new(prefix, uri));
        true
    }

    pub fn push_child(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(XmlNode::Element(child));
        match self.children.last_mut() {
            Some(XmlNode::Element(element)) => element,
            _ => unreachable!("element was just pushed"),
        }
    }

    /// Child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find_map(|node| match node {
            XmlNode::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }
}

/// A document with a single root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlElement,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self { root }
    }

    /// URI bound to `prefix` on the root element.
    pub fn root_namespace_uri(&self, prefix: &str) -> Option<&str> {
        self.root
            .namespaces
            .iter()
            .find(|ns| ns.prefix == prefix)
            .map(|ns| ns.uri.as_str())
    }
}

#[inline]
pub(crate) fn prefix_of(name: &str) -> Option<&str> {
    name.split_once(':').map(|(prefix, _)| prefix)
}
