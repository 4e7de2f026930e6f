//! JCR name and path validation, plus the two name encodings used when
//! content is written to a package: ISO 9075 for XML element and attribute
//! names, and the platform format for archive path segments.

pub mod iso9075;
pub mod platform;

use crate::common::{Error, Result};

/// Characters that are invalid in JCR names.
const ILLEGAL_CHARS: [char; 9] = ['%', '/', '[', ']', '*', '|', '\t', '\r', '\n'];

/// A single colon is allowed as namespace separator.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Checks if the name is a valid JCR name.
///
/// # Examples
///
/// ```
/// use contentpack::name::is_valid_name;
/// assert!(is_valid_name("jcr:primaryType"));
/// assert!(!is_valid_name("jcr:primary:Type"));
/// assert!(!is_valid_name("my[name]"));
/// ```
pub fn is_valid_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    if name.matches(NAMESPACE_SEPARATOR).count() > 1 {
        return false;
    }
    !name.contains(ILLEGAL_CHARS)
}

/// Ensures that all parts of the path are valid JCR names.
///
/// A leading slash is ignored, so `/etc/content` and `etc/content` are
/// equivalent. The root path (`/` or empty) has no segments and is valid.
pub fn ensure_valid_path(path: &str) -> Result<()> {
    let relative = path.strip_prefix('/').unwrap_or(path);
    if relative.is_empty() {
        return Ok(());
    }
    if relative.split('/').all(is_valid_name) {
        Ok(())
    } else {
        Err(Error::InvalidPath(path.to_string()))
    }
}

/// Namespace prefix of a qualified name, if any.
#[inline]
pub fn namespace_prefix(name: &str) -> Option<&str> {
    name.split_once(NAMESPACE_SEPARATOR).map(|(prefix, _)| prefix)
}
