//! Platform (filesystem) form of repository paths inside a package.
//!
//! A namespaced segment `prefix:local` becomes `_prefix_local`; a plain
//! segment starting with an underscore gets a second one so the mapping
//! stays reversible.

use std::borrow::Cow;

/// Root directory of repository content inside a package.
pub const JCR_ROOT: &str = "jcr_root";

/// File holding the serialized node in each content directory.
pub const DOT_CONTENT_XML: &str = ".content.xml";

/// Suffix of the directory holding a file's metadata document.
pub const DIR_SUFFIX: &str = ".dir";

/// Escape one repository name segment.
pub fn to_platform_name(name: &str) -> Cow<'_, str> {
    if let Some((prefix, local)) = name.split_once(':') {
        Cow::Owned(format!("_{}_{}", prefix, local))
    } else if name.starts_with('_') {
        Cow::Owned(format!("_{}", name))
    } else {
        Cow::Borrowed(name)
    }
}

/// Reverse [`to_platform_name`].
pub fn from_platform_name(name: &str) -> Cow<'_, str> {
    if let Some(rest) = name.strip_prefix("__") {
        return Cow::Owned(format!("_{}", rest));
    }
    if let Some(rest) = name.strip_prefix('_')
        && let Some((prefix, local)) = rest.split_once('_')
        && !prefix.is_empty()
        && !local.is_empty()
    {
        return Cow::Owned(format!("{}:{}", prefix, local));
    }
    Cow::Borrowed(name)
}

/// Archive path of a repository path: the content root plus escaped
/// segments. Leading slashes are ignored.
///
/// # Examples
///
/// ```
/// use contentpack::name::platform::build_jcr_path_for_zip;
/// assert_eq!(build_jcr_path_for_zip("oak:index"), "jcr_root/_oak_index");
/// assert_eq!(build_jcr_path_for_zip("/etc/content"), "jcr_root/etc/content");
/// ```
pub fn build_jcr_path_for_zip(path: &str) -> String {
    let mut result = String::from(JCR_ROOT);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        result.push('/');
        result.push_str(&to_platform_name(segment));
    }
    result
}

/// Repository path of the node stored in a `.content.xml` entry, e.g.
/// `jcr_root/content/_cq_tags/.content.xml` → `/content/cq:tags`.
/// A file metadata document (`file.txt.dir/.content.xml`) maps to the file
/// node itself.
///
/// Returns `None` for entries outside the content root.
pub fn repository_path_for_entry(entry_name: &str) -> Option<String> {
    let rest = entry_name.strip_prefix(JCR_ROOT)?;
    let dir = rest.strip_suffix(DOT_CONTENT_XML)?;
    let dir = dir.strip_suffix('/').unwrap_or(dir);
    let dir = match dir.strip_suffix(DIR_SUFFIX) {
        Some(file) if !file.is_empty() && !file.ends_with('/') => file,
        _ => dir,
    };
    let mut path = String::new();
    for segment in dir.split('/').filter(|s| !s.is_empty()) {
        path.push('/');
        path.push_str(&from_platform_name(segment));
    }
    if path.is_empty() {
        path.push('/');
    }
    Some(path)
}

/// Namespace prefix encoded in the directory holding a `.content.xml`
/// entry, e.g. `aaa/_cq_bbb/.content.xml` → `cq`.
pub fn namespace_prefix_of_entry(entry_name: &str) -> Option<String> {
    let dir = entry_name.strip_suffix(DOT_CONTENT_XML)?.strip_suffix('/')?;
    let last = dir.rsplit('/').next()?;
    let decoded = from_platform_name(last);
    let (prefix, _) = decoded.split_once(':')?;
    Some(prefix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_jcr_path_for_zip() {
        assert_eq!(build_jcr_path_for_zip("oak:index"), "jcr_root/_oak_index");
        assert_eq!(build_jcr_path_for_zip("etc/content"), "jcr_root/etc/content");
        assert_eq!(build_jcr_path_for_zip("/etc/content"), "jcr_root/etc/content");
        assert_eq!(build_jcr_path_for_zip("/"), "jcr_root");
        assert_eq!(
            build_jcr_path_for_zip("/apps/app/_private"),
            "jcr_root/apps/app/__private"
        );
    }

    #[test]
    fn test_platform_name_round_trip() {
        for name in ["cq:tags", "_private", "plain", "jcr:content"] {
            assert_eq!(from_platform_name(&to_platform_name(name)), name);
        }
        assert_eq!(from_platform_name("_"), "_");
    }

    #[test]
    fn test_repository_path_for_entry() {
        assert_eq!(
            repository_path_for_entry("jcr_root/content/_cq_tags/.content.xml").as_deref(),
            Some("/content/cq:tags")
        );
        assert_eq!(
            repository_path_for_entry("jcr_root/.content.xml").as_deref(),
            Some("/")
        );
        assert_eq!(repository_path_for_entry("META-INF/vault/config.xml"), None);
        assert_eq!(
            repository_path_for_entry("jcr_root/content/dam/a.txt.dir/.content.xml").as_deref(),
            Some("/content/dam/a.txt")
        );
        assert_eq!(
            repository_path_for_entry("jcr_root/content/.dir/.content.xml").as_deref(),
            Some("/content/.dir")
        );
    }

    #[test]
    fn test_namespace_prefix_of_entry() {
        assert_eq!(namespace_prefix_of_entry("aaa"), None);
        assert_eq!(namespace_prefix_of_entry("aaa/bbb"), None);
        assert_eq!(namespace_prefix_of_entry("aaa/_cq_bbb"), None);
        assert_eq!(
            namespace_prefix_of_entry("aaa/_cq_bbb/.content.xml").as_deref(),
            Some("cq")
        );
    }
}
