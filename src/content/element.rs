//! In-memory content tree.
//!
//! Content can be supplied either as a [`ContentElement`] with separate
//! property and child maps, or as a single [`ContentMap`] where nested maps
//! are child nodes. Both keep insertion order.

use crate::value::Value;
use chrono::{DateTime, FixedOffset, Local, Utc};
use indexmap::IndexMap;

use super::node_types::JCR_PRIMARYTYPE;

/// Node content as one ordered map; [`ContentValue::Node`] entries are
/// child nodes, everything else is a property.
pub type ContentMap = IndexMap<String, ContentValue>;

/// One entry of a [`ContentMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContentValue {
    Property(Value),
    Node(ContentMap),
}

impl ContentValue {
    pub fn as_node(&self) -> Option<&ContentMap> {
        match self {
            Self::Node(map) => Some(map),
            Self::Property(_) => None,
        }
    }

    pub fn as_property(&self) -> Option<&Value> {
        match self {
            Self::Property(value) => Some(value),
            Self::Node(_) => None,
        }
    }
}

/// Primary type declared in a content map, if it is given as text.
pub fn primary_type(map: &ContentMap) -> Option<&str> {
    match map.get(JCR_PRIMARYTYPE)? {
        ContentValue::Property(Value::String(s) | Value::Name(s)) => Some(s),
        _ => None,
    }
}

macro_rules! impl_from_for_content_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ContentValue {
                fn from(value: $ty) -> Self {
                    ContentValue::Property(Value::from(value))
                }
            }
        )+
    };
}

impl_from_for_content_value!(
    &str,
    String,
    &String,
    bool,
    i32,
    u32,
    i64,
    f32,
    f64,
    DateTime<FixedOffset>,
    DateTime<Utc>,
    DateTime<Local>,
);

impl From<Value> for ContentValue {
    fn from(value: Value) -> Self {
        ContentValue::Property(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for ContentValue {
    fn from(values: Vec<T>) -> Self {
        ContentValue::Property(Value::from(values))
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for ContentValue {
    fn from(values: [T; N]) -> Self {
        ContentValue::Property(Value::from(values))
    }
}

impl From<ContentMap> for ContentValue {
    fn from(map: ContentMap) -> Self {
        ContentValue::Node(map)
    }
}

impl From<ContentElement> for ContentValue {
    fn from(element: ContentElement) -> Self {
        ContentValue::Node(element.into())
    }
}

/// Build a [`ContentMap`] from `key => value` pairs. Values are converted
/// with [`ContentValue::from`], so nested `content_map!` calls become child
/// nodes.
///
/// # Examples
///
/// ```
/// use contentpack::content_map;
///
/// let map = content_map! {
///     "jcr:primaryType" => "sling:Folder",
///     "child" => content_map! { "count" => 5 },
/// };
/// assert_eq!(map.len(), 2);
/// assert!(map["child"].as_node().is_some());
/// ```
#[macro_export]
macro_rules! content_map {
    () => {
        $crate::content::ContentMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::content::ContentMap::new();
        $(
            map.insert(
                ::std::string::String::from($key),
                $crate::content::ContentValue::from($value),
            );
        )+
        map
    }};
}

/// A node with named properties and named children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentElement {
    name: String,
    properties: IndexMap<String, Value>,
    children: IndexMap<String, ContentElement>,
}

impl ContentElement {
    pub fn new(name: impl Into<String>, properties: IndexMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            properties,
            children: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut IndexMap<String, Value> {
        &mut self.properties
    }

    /// Set a property, returning `self` for chaining.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn children(&self) -> &IndexMap<String, ContentElement> {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut IndexMap<String, ContentElement> {
        &mut self.children
    }

    /// Add a child under its own name. A child with the same name is replaced.
    pub fn add_child(&mut self, child: ContentElement) -> &mut ContentElement {
        let name = child.name.clone();
        let entry = self.children.entry(name);
        match entry {
            indexmap::map::Entry::Occupied(mut occupied) => {
                occupied.insert(child);
                occupied.into_mut()
            },
            indexmap::map::Entry::Vacant(vacant) => vacant.insert(child),
        }
    }

    /// Descendant at a relative path like `jcr:content/par`.
    pub fn child(&self, path: &str) -> Option<&ContentElement> {
        let (name, rest) = match path.split_once('/') {
            Some((name, rest)) => (name, rest),
            None => (path, ""),
        };
        let child = self.children.get(name)?;
        if rest.is_empty() {
            Some(child)
        } else {
            child.child(rest)
        }
    }

    /// Convert to the single-map form. Properties come first, then children.
    pub fn to_map(&self) -> ContentMap {
        self.clone().into()
    }
}

impl From<ContentElement> for ContentMap {
    fn from(element: ContentElement) -> Self {
        let mut map = ContentMap::with_capacity(element.properties.len() + element.children.len());
        for (key, value) in element.properties {
            map.insert(key, ContentValue::Property(value));
        }
        for (key, child) in element.children {
            map.insert(key, ContentValue::Node(child.into()));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_map;

    fn element(name: &str) -> ContentElement {
        ContentElement::new(name, IndexMap::new())
    }

    #[test]
    fn test_child_lookup() {
        let mut root = element("root");
        root.add_child(element("child1"))
            .add_child(element("child11"));
        root.add_child(element("child2"));

        assert_eq!(root.child("child1").map(|c| c.name()), Some("child1"));
        assert_eq!(root.child("child1/child11").map(|c| c.name()), Some("child11"));
        assert_eq!(root.child("child2").map(|c| c.name()), Some("child2"));
        assert!(root.child("child3").is_none());
        assert!(root.child("child1/child12").is_none());
    }

    #[test]
    fn test_to_map() {
        let mut root = element("root")
            .with_property("prop1", "value1")
            .with_property("prop2", 5);
        root.add_child(element("child1").with_property("prop11", true));

        let expected = content_map! {
            "prop1" => "value1",
            "prop2" => 5,
            "child1" => content_map! { "prop11" => true },
        };
        assert_eq!(root.to_map(), expected);
    }

    #[test]
    fn test_primary_type() {
        let map = content_map! { "jcr:primaryType" => "nt:folder" };
        assert_eq!(primary_type(&map), Some("nt:folder"));
        let map = content_map! { "jcr:primaryType" => 5 };
        assert_eq!(primary_type(&map), None);
        assert_eq!(primary_type(&ContentMap::new()), None);
    }
}
