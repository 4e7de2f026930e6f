use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automata are built only once, thread-safe
static ATTRIBUTE_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "\t", "\n", "\r"])
        .expect("Failed to build XML attribute escaper")
});

static TEXT_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\r"])
        .expect("Failed to build XML text escaper")
});

/// Escape a string for use inside a double-quoted XML attribute value.
///
/// Whitespace control characters are written as character references so
/// they survive attribute value normalization on re-parse.
///
/// # Examples
///
/// ```
/// use contentpack::common::xml::escape_attribute;
/// assert_eq!(escape_attribute("a & \"b\""), "a &amp; &quot;b&quot;");
/// assert_eq!(escape_attribute("line1\nline2"), "line1&#xA;line2");
/// ```
#[inline]
pub fn escape_attribute(s: &str) -> String {
    ATTRIBUTE_ESCAPER.replace_all(
        s,
        &["&amp;", "&lt;", "&gt;", "&quot;", "&#x9;", "&#xA;", "&#xD;"],
    )
}

/// Escape character data.
///
/// # Examples
///
/// ```
/// use contentpack::common::xml::escape_text;
/// assert_eq!(escape_text("<tag> & 'quoted'"), "&lt;tag&gt; &amp; 'quoted'");
/// ```
#[inline]
pub fn escape_text(s: &str) -> String {
    TEXT_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&#xD;"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attribute_brackets_untouched() {
        // typed value syntax must pass through unchanged
        assert_eq!(escape_attribute("{Long}[1,2]"), "{Long}[1,2]");
        assert_eq!(escape_attribute("\\{foo}"), "\\{foo}");
    }

    #[test]
    fn test_escape_attribute_markup() {
        assert_eq!(escape_attribute("<a href='x'>"), "&lt;a href='x'&gt;");
        assert_eq!(escape_attribute("tab\there"), "tab&#x9;here");
    }

    #[test]
    fn test_escape_text_keeps_quotes() {
        assert_eq!(escape_text("\"x\""), "\"x\"");
    }
}
