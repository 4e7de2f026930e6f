//! Contents of the `META-INF/vault` metadata files.

use super::metadata::{PackageFilter, PackageMetadata};
use crate::common::xml::{escape_attribute, escape_text};
use std::fmt::Write;

pub const META_DIR: &str = "META-INF/vault";
pub const CONFIG_XML: &str = "META-INF/vault/config.xml";
pub const FILTER_XML: &str = "META-INF/vault/filter.xml";
pub const PROPERTIES_XML: &str = "META-INF/vault/properties.xml";
pub const SETTINGS_XML: &str = "META-INF/vault/settings.xml";
pub const THUMBNAIL_PNG: &str = "META-INF/vault/definition/thumbnail.png";

/// Generate the vault filesystem configuration.
pub fn config_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<vaultfs version="1.1">
    <aggregates>
        <aggregate type="file" title="Files"/>
        <aggregate type="filefolder" title="Folders"/>
        <aggregate type="nodetype" title="Node Types"/>
        <aggregate type="full" title="Full Coverage Aggregate">
            <matches>
                <include name="rep:AccessControl" respectSupertype="true"/>
                <include name="rep:Policy" respectSupertype="true"/>
                <include name="cq:Widget" respectSupertype="true"/>
                <include name="cq:EditConfig" respectSupertype="true"/>
                <include name="cq:WorkflowModel" respectSupertype="true"/>
                <include name="vlt:FullCoverage" respectSupertype="true"/>
                <include name="mix:language" respectSupertype="true"/>
                <include name="sling:OsgiConfig" respectSupertype="true"/>
            </matches>
        </aggregate>
        <aggregate type="generic" title="Folders">
            <matches>
                <include name="nt:folder" respectSupertype="true"/>
            </matches>
            <contains>
                <exclude isNode="true"/>
            </contains>
        </aggregate>
        <aggregate type="generic" title="Default Aggregator"/>
    </aggregates>
    <handlers>
        <handler type="folder"/>
        <handler type="file"/>
        <handler type="nodetype"/>
        <handler type="generic"/>
    </handlers>
</vaultfs>
"#
}

/// Generate the vault settings.
pub fn settings_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<vault version="1.0">
    <ignore name=".svn"/>
    <ignore name=".DS_Store"/>
</vault>
"#
}

/// Generate the package properties in Java XML properties format.
pub fn properties_xml(metadata: &PackageMetadata) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE properties SYSTEM "http://java.sun.com/dtd/properties.dtd">
<properties>
<comment>FileVault Package Properties</comment>
"#,
    );
    for (key, value) in metadata.vars() {
        // writing to a String cannot fail
        let _ = writeln!(out, r#"<entry key="{}">{}</entry>"#, key, escape_text(&value));
    }
    out.push_str("</properties>\n");
    out
}

/// Generate the workspace filter listing root paths and their rules.
pub fn filter_xml(filters: &[PackageFilter]) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<workspaceFilter version="1.0">
"#,
    );
    for filter in filters {
        let root = escape_attribute(&filter.root_path);
        if filter.rules.is_empty() {
            let _ = writeln!(out, r#"    <filter root="{}"/>"#, root);
            continue;
        }
        let _ = writeln!(out, r#"    <filter root="{}">"#, root);
        for rule in &filter.rules {
            let tag = if rule.include { "include" } else { "exclude" };
            let _ = writeln!(
                out,
                r#"        <{} pattern="{}"/>"#,
                tag,
                escape_attribute(&rule.pattern)
            );
        }
        out.push_str("    </filter>\n");
    }
    out.push_str("</workspaceFilter>\n");
    out
}
