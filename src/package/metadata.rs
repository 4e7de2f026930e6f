//! Package metadata: identification, filters, namespaces and install flags.

use crate::common::{Error, Result};
use crate::value::format_date;
use crate::xml::{NamespaceMap, default_namespaces};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// Access control handling mode written to the package properties.
///
/// The value is passed through to the package manager unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcHandling {
    Ignore,
    Overwrite,
    Merge,
    MergePreserve,
    Clear,
}

impl AcHandling {
    pub fn mode(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Overwrite => "overwrite",
            Self::Merge => "merge",
            Self::MergePreserve => "merge_preserve",
            Self::Clear => "clear",
        }
    }
}

/// Include or exclude rule below a filter root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFilterRule {
    pub pattern: String,
    pub include: bool,
}

impl PackageFilterRule {
    pub fn include(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            include: true,
        }
    }

    pub fn exclude(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            include: false,
        }
    }

    pub fn is_exclude(&self) -> bool {
        !self.include
    }
}

/// Root path of the package with its ordered rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFilter {
    pub root_path: String,
    #[serde(default)]
    pub rules: Vec<PackageFilterRule>,
}

impl PackageFilter {
    pub fn new(root_path: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            rules: Vec::new(),
        }
    }

    pub fn add_include_rule(mut self, pattern: impl Into<String>) -> Self {
        self.rules.push(PackageFilterRule::include(pattern));
        self
    }

    pub fn add_exclude_rule(mut self, pattern: impl Into<String>) -> Self {
        self.rules.push(PackageFilterRule::exclude(pattern));
        self
    }
}

/// Metadata of a content package.
///
/// Can be assembled with [`ContentPackageBuilder`](super::ContentPackageBuilder)
/// or loaded from YAML:
///
/// ```
/// use contentpack::package::PackageMetadata;
///
/// let metadata = PackageMetadata::from_yaml(r#"
/// group: mygroup
/// name: mypackage
/// created: "2024-03-01T10:00:00+01:00"
/// filters:
///   - root_path: /content/site
/// xml_namespaces:
///   app: http://example.com/app
/// "#).unwrap();
/// assert!(metadata.validate().is_ok());
/// assert_eq!(metadata.xml_namespaces.len(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageMetadata {
    pub group: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_by: String,
    pub created: Option<DateTime<FixedOffset>>,
    pub version: String,
    pub ac_handling: Option<AcHandling>,
    pub package_type: Option<String>,
    pub requires_root: bool,
    pub allow_index_definitions: bool,
    pub filters: Vec<PackageFilter>,
    /// Registered namespaces. Entries given in YAML are added to the
    /// defaults.
    #[serde(deserialize_with = "merge_with_default_namespaces")]
    pub xml_namespaces: NamespaceMap,
    #[serde(skip)]
    pub thumbnail_image: Option<Vec<u8>>,
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            group: None,
            name: None,
            description: None,
            created_by: "admin".to_string(),
            created: None,
            version: "1.0".to_string(),
            ac_handling: None,
            package_type: None,
            requires_root: false,
            allow_index_definitions: false,
            filters: Vec::new(),
            xml_namespaces: default_namespaces(),
            thumbnail_image: None,
        }
    }
}

fn merge_with_default_namespaces<'de, D>(deserializer: D) -> std::result::Result<NamespaceMap, D::Error>
where
    D: Deserializer<'de>,
{
    let extra = NamespaceMap::deserialize(deserializer)?;
    let mut namespaces = default_namespaces();
    namespaces.extend(extra);
    Ok(namespaces)
}

impl PackageMetadata {
    /// Load metadata from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse package metadata: {}", e)))
    }

    /// Check that everything needed to write a package is set.
    pub fn validate(&self) -> Result<()> {
        if is_blank(self.name.as_deref()) || is_blank(self.group.as_deref()) {
            return Err(Error::MissingMetadata("Package name or group not set.".to_string()));
        }
        if self.filters.is_empty() {
            return Err(Error::MissingMetadata(
                "No package filter defined / no package root path set.".to_string(),
            ));
        }
        if self.created.is_none() {
            return Err(Error::MissingMetadata("Package creation date not set.".to_string()));
        }
        Ok(())
    }

    /// Repository path of the installed package.
    pub fn package_path(&self) -> String {
        format!(
            "/etc/packages/{}/{}.zip",
            self.group.as_deref().unwrap_or_default(),
            self.name.as_deref().unwrap_or_default()
        )
    }

    /// Key/value pairs written to the package properties file, in order.
    pub fn vars(&self) -> Vec<(&'static str, String)> {
        let created = self.created.as_ref().map(format_date).unwrap_or_default();
        let mut vars = vec![
            ("name", self.name.clone().unwrap_or_default()),
            ("group", self.group.clone().unwrap_or_default()),
            ("version", self.version.clone()),
            ("description", self.description.clone().unwrap_or_default()),
            ("path", self.package_path()),
            ("created", created.clone()),
            ("createdBy", self.created_by.clone()),
            ("lastModified", created),
            ("lastModifiedBy", self.created_by.clone()),
        ];
        if let Some(ac_handling) = self.ac_handling {
            vars.push(("acHandling", ac_handling.mode().to_string()));
        }
        if let Some(package_type) = &self.package_type {
            vars.push(("packageType", package_type.clone()));
        }
        vars.push(("requiresRoot", self.requires_root.to_string()));
        vars.push(("allowIndexDefinitions", self.allow_index_definitions.to_string()));
        vars
    }
}

#[inline]
fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_metadata() -> PackageMetadata {
        PackageMetadata {
            group: Some("group1".to_string()),
            name: Some("package1".to_string()),
            created: DateTime::parse_from_rfc3339("2024-03-01T10:00:00+01:00").ok(),
            filters: vec![PackageFilter::new("/content/site")],
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let metadata = PackageMetadata::default();
        assert_eq!(metadata.created_by, "admin");
        assert_eq!(metadata.version, "1.0");
        assert_eq!(metadata.xml_namespaces.len(), 7);
    }

    #[test]
    fn test_validate() {
        assert!(valid_metadata().validate().is_ok());

        let mut metadata = valid_metadata();
        metadata.name = Some(" ".to_string());
        assert!(matches!(metadata.validate(), Err(Error::MissingMetadata(_))));

        let mut metadata = valid_metadata();
        metadata.filters.clear();
        assert!(matches!(metadata.validate(), Err(Error::MissingMetadata(_))));

        let mut metadata = valid_metadata();
        metadata.created = None;
        assert!(matches!(metadata.validate(), Err(Error::MissingMetadata(_))));
    }

    #[test]
    fn test_vars() {
        let mut metadata = valid_metadata();
        metadata.ac_handling = Some(AcHandling::MergePreserve);
        metadata.requires_root = true;
        let vars = metadata.vars();
        let get = |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("path"), Some("/etc/packages/group1/package1.zip"));
        assert_eq!(get("created"), Some("2024-03-01T10:00:00.000+01:00"));
        assert_eq!(get("acHandling"), Some("merge_preserve"));
        assert_eq!(get("requiresRoot"), Some("true"));
        assert_eq!(get("allowIndexDefinitions"), Some("false"));
        assert_eq!(get("packageType"), None);
        assert_eq!(get("description"), Some(""));
    }

    #[test]
    fn test_from_yaml() {
        let metadata = PackageMetadata::from_yaml(
            r#"
group: g
name: n
version: "2.1"
ac_handling: merge_preserve
requires_root: true
filters:
  - root_path: /apps/app
    rules:
      - pattern: /apps/app/install(/.*)?
        include: false
"#,
        )
        .unwrap();
        assert_eq!(metadata.version, "2.1");
        assert_eq!(metadata.created_by, "admin");
        assert_eq!(metadata.ac_handling, Some(AcHandling::MergePreserve));
        assert!(metadata.requires_root);
        assert!(metadata.filters[0].rules[0].is_exclude());
        assert_eq!(metadata.xml_namespaces.len(), 7);
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = PackageMetadata::from_yaml("requires_root: [not, a, bool]").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
