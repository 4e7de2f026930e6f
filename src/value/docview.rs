//! Text form of a property as stored in a `.content.xml` attribute.
//!
//! Grammar: `("{" Type "}")? ( Scalar | "[" Scalar ("," Scalar)* "]" )`.
//! Values of type String, Name and Path are backslash-escaped; inside arrays
//! commas are escaped as well, outside arrays a leading `{` or `[` is.

use super::types::PropertyType;

/// A parsed or to-be-formatted attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocViewProperty {
    pub property_type: PropertyType,
    pub multi: bool,
    pub values: Vec<String>,
}

impl DocViewProperty {
    /// Single-valued property.
    pub fn single(property_type: PropertyType, value: impl Into<String>) -> Self {
        Self {
            property_type,
            multi: false,
            values: vec![value.into()],
        }
    }

    /// Multi-valued property.
    pub fn multi(property_type: PropertyType, values: Vec<String>) -> Self {
        Self {
            property_type,
            multi: true,
            values,
        }
    }

    /// Parse an attribute value.
    ///
    /// An unknown `{...}` prefix is treated as part of a plain string value.
    pub fn parse(text: &str) -> Self {
        let mut property_type = PropertyType::String;
        let mut rest = text;
        if let Some(stripped) = text.strip_prefix('{')
            && let Some(end) = stripped.find('}')
            && let Some(ty) = PropertyType::from_name(&stripped[..end])
        {
            property_type = ty;
            rest = &stripped[end + 1..];
        }

        let multi = rest.starts_with('[');
        if !multi {
            return Self::single(property_type, unescape(rest));
        }

        let body = &rest[1..];
        let mut values = Vec::new();
        let mut current = String::new();
        let mut escaped = false;
        let mut closed = false;
        for (idx, c) in body.char_indices() {
            if escaped {
                current.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == ',' {
                values.push(std::mem::take(&mut current));
            } else if c == ']' && idx + 1 == body.len() {
                closed = true;
            } else {
                current.push(c);
            }
        }
        // "[]" is an empty array, "[a]" a one-element array
        if !current.is_empty() || !values.is_empty() || (!closed && !body.is_empty()) {
            values.push(current);
        }
        Self::multi(property_type, values)
    }

    /// Format back to attribute text.
    pub fn format(&self) -> String {
        let mut out = String::new();
        if self.property_type.has_prefix() {
            out.push('{');
            out.push_str(self.property_type.name());
            out.push('}');
        }
        if self.multi {
            out.push('[');
            for (i, value) in self.values.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                self.push_value(&mut out, value);
            }
            out.push(']');
        } else if let Some(value) = self.values.first() {
            self.push_value(&mut out, value);
        }
        out
    }

    fn push_value(&self, out: &mut String, value: &str) {
        if self.property_type.is_escaped() {
            escape_into(out, value, self.multi);
        } else {
            out.push_str(value);
        }
    }
}

/// Escape one value. `multi` selects array-element rules.
pub(crate) fn escape_into(out: &mut String, value: &str, multi: bool) {
    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' if multi => out.push_str("\\,"),
            '[' | '{' if i == 0 && !multi => {
                out.push('\\');
                out.push(c);
            },
            _ => out.push(c),
        }
    }
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut escaped = false;
    for c in value.chars() {
        if escaped {
            out.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_typed_array() {
        let prop = DocViewProperty::parse("{Name}[mix:versionable,cq:ReplicationStatus]");
        assert_eq!(prop.property_type, PropertyType::Name);
        assert!(prop.multi);
        assert_eq!(prop.values, vec!["mix:versionable", "cq:ReplicationStatus"]);
    }

    #[test]
    fn test_parse_escaped_scalar() {
        let prop = DocViewProperty::parse("\\{foo}");
        assert_eq!(prop.property_type, PropertyType::String);
        assert!(!prop.multi);
        assert_eq!(prop.values, vec!["{foo}"]);
    }

    #[test]
    fn test_parse_escaped_comma() {
        let prop = DocViewProperty::parse("[a\\,b,c]");
        assert_eq!(prop.values, vec!["a,b", "c"]);
    }

    #[test]
    fn test_parse_empty_array() {
        let prop = DocViewProperty::parse("{WeakReference}[]");
        assert!(prop.multi);
        assert!(prop.values.is_empty());
    }

    #[test]
    fn test_parse_unknown_prefix_is_string() {
        let prop = DocViewProperty::parse("{foo}bar");
        assert_eq!(prop.property_type, PropertyType::String);
        assert_eq!(prop.values, vec!["{foo}bar"]);
    }

    #[test]
    fn test_format_raw_for_non_string_types() {
        let prop = DocViewProperty::multi(
            PropertyType::WeakReference,
            vec!["a".to_string(), "b".to_string()],
        );
        assert_eq!(prop.format(), "{WeakReference}[a,b]");
    }

    proptest! {
        #[test]
        fn prop_string_arrays_survive_escaping(values in proptest::collection::vec("[a-z,\\\\\\[\\]{}]{1,8}", 1..5)) {
            let formatted = DocViewProperty::multi(PropertyType::String, values.clone()).format();
            let parsed = DocViewProperty::parse(&formatted);
            prop_assert!(parsed.multi);
            prop_assert_eq!(parsed.values, values);
        }

        #[test]
        fn prop_string_scalars_survive_escaping(value in "[a-z,\\\\\\[\\]{}]{0,12}") {
            let formatted = DocViewProperty::single(PropertyType::String, value.clone()).format();
            let parsed = DocViewProperty::parse(&formatted);
            prop_assert!(!parsed.multi);
            prop_assert_eq!(parsed.values, vec![value]);
        }
    }
}
