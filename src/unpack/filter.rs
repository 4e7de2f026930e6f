//! Rewrites one `.content.xml` document according to the exclude rules.
//!
//! The namespace declarations are recorded by a forward scan before the
//! document is touched. The filter pass then removes nodes, properties and
//! mixins, normalizes weak references, optionally marks content as
//! activated, and notes every prefix still in use. Only used prefixes are
//! declared in the output, on the root element, in the order of the scan.

use super::options::ExcludeRules;
use crate::common::Result;
use crate::content::node_types::{
    CQ_LAST_REPLICATED, CQ_LAST_REPLICATION_ACTION, CQ_REPLICATION_STATUS, JCR_CONTENT,
    JCR_MIXINTYPES, JCR_PRIMARYTYPE, JCR_UUID, REPLICATION_ACTION_ACTIVATE, is_principal_type,
    is_replicable_type,
};
use crate::name::iso9075;
use crate::name::platform::{namespace_prefix_of_entry, repository_path_for_entry};
use crate::value::{DocViewProperty, PropertyType};
use crate::xml::namespaces::{NS_CQ, NS_JCR, XML_PREFIX};
use crate::xml::{
    Namespace, NamespaceMap, XmlAttribute, XmlElement, XmlNode, parse_document,
    prefix_or_default, scan_namespaces, to_xml_string,
};
use std::collections::{BTreeSet, HashSet};

/// Filter a document. Returns `None` when the document is not a JCR
/// document view (its root is not in the JCR namespace) and has to be
/// copied unchanged.
///
/// `last_replicated` is the `cq:lastReplicated` text written when content
/// is marked as activated.
pub fn filter_document(
    rules: &ExcludeRules,
    last_replicated: &str,
    entry_name: &str,
    xml: &[u8],
) -> Result<Option<String>> {
    let scan = scan_namespaces(xml)?;
    if scan.root_namespace.as_deref() != Some(NS_JCR) {
        return Ok(None);
    }
    let mut ledger = scan.namespaces;
    let mut doc = parse_document(xml)?;
    strip_namespaces(&mut doc.root);

    let mut pass = FilterPass {
        rules,
        last_replicated,
        used: HashSet::new(),
        injected: false,
    };
    if let Some(prefix) = namespace_prefix_of_entry(entry_name) {
        pass.used.insert(prefix);
    }
    let path = repository_path_for_entry(entry_name).unwrap_or_else(|| "/".to_string());
    pass.filter_element(&mut doc.root, &path, false);

    if pass.injected && !ledger.contains_key("cq") {
        ledger.insert("cq".to_string(), NS_CQ.to_string());
    }
    doc.root.namespaces = declared_namespaces(&ledger, &pass.used);
    Ok(Some(to_xml_string(&doc)))
}

/// Ledger entries that are in use, in ledger order.
fn declared_namespaces(ledger: &NamespaceMap, used: &HashSet<String>) -> Vec<Namespace> {
    ledger
        .iter()
        .filter(|(prefix, _)| prefix.as_str() != XML_PREFIX && used.contains(prefix.as_str()))
        .map(|(prefix, uri)| Namespace::new(prefix.as_str(), uri.as_str()))
        .collect()
}

fn strip_namespaces(element: &mut XmlElement) {
    element.namespaces.clear();
    for child in element.children.iter_mut() {
        if let XmlNode::Element(child) = child {
            strip_namespaces(child);
        }
    }
}

struct FilterPass<'a> {
    rules: &'a ExcludeRules,
    last_replicated: &'a str,
    used: HashSet<String>,
    injected: bool,
}

impl FilterPass<'_> {
    fn filter_element(&mut self, element: &mut XmlElement, path: &str, parent_replicable: bool) {
        self.use_prefix(prefix_or_default(&element.name));

        let primary_type = element
            .attribute(JCR_PRIMARYTYPE)
            .map(first_value)
            .unwrap_or_default();
        let principal = is_principal_type(&primary_type);
        let replicable = is_replicable_type(&primary_type);

        let attributes = std::mem::take(&mut element.attributes);
        for attr in attributes {
            if let Some(attr) = self.filter_attribute(attr, principal) {
                if let Some(prefix) = attr.prefix() {
                    self.use_prefix(prefix);
                }
                element.attributes.push(attr);
            }
        }

        if parent_replicable
            && element.name == JCR_CONTENT
            && let Some(marker) = &self.rules.replication
            && marker.applies_to(path)
        {
            mark_activated(element, self.last_replicated);
            self.injected = true;
            self.use_prefix("jcr");
            self.use_prefix("cq");
        }

        let rules = self.rules;
        element.children.retain_mut(|node| match node {
            XmlNode::Element(child) => {
                let child_path = join_path(path, &iso9075::decode(&child.name));
                if rules.nodes.matches(&child_path) {
                    return false;
                }
                self.filter_element(child, &child_path, replicable);
                true
            },
            _ => true,
        });
    }

    /// Apply property and mixin rules to one attribute; `None` drops it.
    fn filter_attribute(&mut self, mut attr: XmlAttribute, principal: bool) -> Option<XmlAttribute> {
        if self.rules.properties.matches(&attr.name) && !(principal && attr.name == JCR_UUID) {
            return None;
        }

        if attr.name == JCR_PRIMARYTYPE {
            let property = DocViewProperty::parse(&attr.value);
            self.use_value_prefixes(&property.values);
            return Some(attr);
        }

        if attr.name == JCR_MIXINTYPES {
            let mut property = DocViewProperty::parse(&attr.value);
            if !self.rules.mixins.is_empty() {
                property.values.retain(|mixin| !self.rules.mixins.matches(mixin));
                if property.values.iter().all(|v| v.trim().is_empty()) {
                    return None;
                }
                attr.value = property.format();
            }
            self.use_value_prefixes(&property.values);
            return Some(attr);
        }

        let mut property = DocViewProperty::parse(&attr.value);
        match property.property_type {
            PropertyType::Name => self.use_value_prefixes(&property.values),
            PropertyType::WeakReference if property.multi => {
                let sorted: BTreeSet<String> = property.values.drain(..).collect();
                property.values = sorted.into_iter().collect();
                attr.value = property.format();
            },
            _ => {},
        }
        Some(attr)
    }

    fn use_value_prefixes(&mut self, values: &[String]) {
        for value in values {
            if let Some((prefix, _)) = value.split_once(':') {
                self.use_prefix(prefix);
            }
        }
    }

    fn use_prefix(&mut self, prefix: &str) {
        if !self.used.contains(prefix) {
            self.used.insert(prefix.to_string());
        }
    }
}

/// Add the replication status mixin and activation properties.
fn mark_activated(element: &mut XmlElement, last_replicated: &str) {
    let mut mixins = match element.attribute(JCR_MIXINTYPES) {
        Some(value) => DocViewProperty::parse(value),
        None => DocViewProperty::multi(PropertyType::String, Vec::new()),
    };
    mixins.multi = true;
    mixins.values.retain(|v| !v.is_empty());
    if !mixins.values.iter().any(|v| v == CQ_REPLICATION_STATUS) {
        mixins.values.push(CQ_REPLICATION_STATUS.to_string());
    }
    element.set_attribute(JCR_MIXINTYPES, mixins.format());

    let last_replicated = DocViewProperty::single(PropertyType::Date, last_replicated);
    element.set_attribute(CQ_LAST_REPLICATED, last_replicated.format());
    element.set_attribute(CQ_LAST_REPLICATION_ACTION, REPLICATION_ACTION_ACTIVATE);
}

/// First value of an attribute, without type prefix.
fn first_value(text: &str) -> String {
    DocViewProperty::parse(text)
        .values
        .into_iter()
        .next()
        .unwrap_or_default()
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{}{}", parent, name)
    } else {
        format!("{}/{}", parent, name)
    }
}
