//! Splits a content tree into the parts stored as separate documents.

use super::element::{ContentMap, ContentValue, primary_type};
use super::node_types::is_boundary_type;

/// One document worth of content: a path relative to the submitted root
/// (empty for the root itself, otherwise `/child/grandchild`) and the
/// properties and embedded children up to the next boundary node.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentPart {
    pub path: String,
    pub content: ContentMap,
}

/// Split content at boundary node types.
///
/// Parts are returned in pre-order: each parent before its children, and
/// children in map order.
pub fn split(content: ContentMap) -> Vec<ContentPart> {
    let mut parts = Vec::new();
    collect(String::new(), content, &mut parts);
    parts
}

fn collect(path: String, content: ContentMap, parts: &mut Vec<ContentPart>) {
    let index = parts.len();
    parts.push(ContentPart {
        path: path.clone(),
        content: ContentMap::new(),
    });

    let mut local = ContentMap::with_capacity(content.len());
    for (key, value) in content {
        match value {
            ContentValue::Node(child)
                if primary_type(&child).is_some_and(is_boundary_type) =>
            {
                let child_path = format!("{}/{}", path, key);
                collect(child_path, child, parts);
            },
            other => {
                local.insert(key, other);
            },
        }
    }
    parts[index].content = local;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_map;

    fn assert_parts(actual: &[ContentPart], expected: &[(&str, ContentMap)]) {
        let paths: Vec<&str> = actual.iter().map(|p| p.path.as_str()).collect();
        let expected_paths: Vec<&str> = expected.iter().map(|(p, _)| *p).collect();
        assert_eq!(paths, expected_paths);
        for (part, (_, content)) in actual.iter().zip(expected) {
            assert_eq!(&part.content, content, "content of part '{}'", part.path);
        }
    }

    #[test]
    fn test_split_no_node_types() {
        let input = content_map! {
            "k1" => "v1",
            "o1" => content_map! {
                "k11" => "v11",
                "o13" => content_map! { "k131" => "v131" },
            },
        };
        let parts = split(input.clone());
        assert_parts(&parts, &[("", input)]);
    }

    #[test]
    fn test_split_unstructured() {
        let input = content_map! {
            "jcr:primaryType" => "nt:unstructured",
            "k1" => "v1",
            "o1" => content_map! {
                "jcr:primaryType" => "nt:unstructured",
                "k11" => "v11",
            },
        };
        let parts = split(input.clone());
        assert_parts(&parts, &[("", input)]);
    }

    #[test]
    fn test_split_folder() {
        let input = content_map! {
            "jcr:primaryType" => "nt:folder",
            "k1" => "v1",
            "o1" => content_map! {
                "jcr:primaryType" => "sling:Folder",
                "k11" => "v11",
                "k12" => "v12",
                "o13" => content_map! {
                    "jcr:primaryType" => "sling:OrderedFolder",
                    "k131" => "v131",
                    "k132" => "v132",
                },
            },
        };
        let parts = split(input);
        assert_parts(&parts, &[
            ("", content_map! { "jcr:primaryType" => "nt:folder", "k1" => "v1" }),
            ("/o1", content_map! {
                "jcr:primaryType" => "sling:Folder",
                "k11" => "v11",
                "k12" => "v12",
            }),
            ("/o1/o13", content_map! {
                "jcr:primaryType" => "sling:OrderedFolder",
                "k131" => "v131",
                "k132" => "v132",
            }),
        ]);
    }

    #[test]
    fn test_split_pages() {
        let page1 = content_map! { "k1a" => "v1a" };
        let page11 = content_map! { "k11a" => "v11a" };
        let page111 = content_map! { "k111a" => "v111a" };
        let page12 = content_map! { "k12a" => "v12a" };
        let input = content_map! {
            "jcr:primaryType" => "cq:Page",
            "jcr:content" => page1.clone(),
            "page11" => content_map! {
                "jcr:primaryType" => "cq:Page",
                "jcr:content" => page11.clone(),
                "page111" => content_map! {
                    "jcr:primaryType" => "cq:Page",
                    "jcr:content" => page111.clone(),
                },
            },
            "page12" => content_map! {
                "jcr:primaryType" => "cq:Page",
                "jcr:content" => page12.clone(),
            },
        };

        let parts = split(input);
        assert_parts(&parts, &[
            ("", content_map! { "jcr:primaryType" => "cq:Page", "jcr:content" => page1 }),
            ("/page11", content_map! { "jcr:primaryType" => "cq:Page", "jcr:content" => page11 }),
            ("/page11/page111", content_map! { "jcr:primaryType" => "cq:Page", "jcr:content" => page111 }),
            ("/page12", content_map! { "jcr:primaryType" => "cq:Page", "jcr:content" => page12 }),
        ]);
    }
}
