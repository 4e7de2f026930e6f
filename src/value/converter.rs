//! Converts property values to and from their typed attribute text.

use super::docview::DocViewProperty;
use super::types::{PropertyType, Value};
use crate::common::{Error, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat};

/// Property whose string values are written as `{Name}` values.
pub const PN_PRIVILEGES: &str = "rep:privileges";

/// Converts property values to the string representation used in
/// `.content.xml` attributes, including the type prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueConverter;

impl ValueConverter {
    pub fn new() -> Self {
        Self
    }

    /// Encode a value for the given property.
    ///
    /// `Null` encodes to an empty string. An empty array has no type to
    /// derive a prefix from and encodes to nothing as well.
    ///
    /// # Examples
    ///
    /// ```
    /// use contentpack::value::{Value, ValueConverter};
    ///
    /// let converter = ValueConverter::new();
    /// assert_eq!(converter.encode("x", &Value::from(55)).unwrap(), "{Long}55");
    /// assert_eq!(converter.encode("x", &Value::from(["v1", "v2"])).unwrap(), "[v1,v2]");
    /// assert_eq!(converter.encode("x", &Value::from("{foo}")).unwrap(), "\\{foo}");
    /// ```
    pub fn encode(&self, property_name: &str, value: &Value) -> Result<String> {
        match value {
            Value::Null => Ok(String::new()),
            Value::Array(items) => self.encode_array(property_name, items),
            scalar => {
                let (property_type, text) = self.to_typed(property_name, scalar)?;
                Ok(DocViewProperty::single(property_type, text).format())
            },
        }
    }

    fn encode_array(&self, property_name: &str, items: &[Value]) -> Result<String> {
        if items.is_empty() {
            return Ok(String::new());
        }
        let mut property_type = PropertyType::Undefined;
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            let (item_type, text) = self.to_typed(property_name, item)?;
            if property_type == PropertyType::Undefined {
                property_type = item_type;
            } else if property_type != item_type {
                return Err(Error::MixedArrayTypes {
                    property: property_name.to_string(),
                    first: property_type.name(),
                    second: item_type.name(),
                });
            }
            values.push(text);
        }
        Ok(DocViewProperty::multi(property_type, values).format())
    }

    /// Map a scalar to its JCR type and unescaped lexical form.
    fn to_typed(&self, property_name: &str, value: &Value) -> Result<(PropertyType, String)> {
        let typed = match value {
            Value::String(s) if property_name == PN_PRIVILEGES => (PropertyType::Name, s.clone()),
            Value::String(s) => (PropertyType::String, s.clone()),
            Value::Boolean(b) => (PropertyType::Boolean, b.to_string()),
            Value::Long(l) => {
                let mut buf = itoa::Buffer::new();
                (PropertyType::Long, buf.format(*l).to_string())
            },
            Value::Double(d) => {
                if !d.is_finite() {
                    return Err(Error::InvalidValue {
                        property: property_name.to_string(),
                        value: d.to_string(),
                    });
                }
                let mut buf = ryu::Buffer::new();
                (PropertyType::Decimal, buf.format_finite(*d).to_string())
            },
            Value::Decimal(s) => {
                if !is_decimal_literal(s) {
                    return Err(Error::InvalidValue {
                        property: property_name.to_string(),
                        value: s.clone(),
                    });
                }
                (PropertyType::Decimal, s.clone())
            },
            Value::Date(dt) => (PropertyType::Date, format_date(dt)),
            Value::Name(s) => (PropertyType::Name, s.clone()),
            Value::Path(s) => (PropertyType::Path, s.clone()),
            Value::Reference(s) => (PropertyType::Reference, s.clone()),
            Value::WeakReference(s) => (PropertyType::WeakReference, s.clone()),
            Value::Uri(s) => (PropertyType::Uri, s.clone()),
            Value::Null | Value::Binary(_) | Value::Array(_) => {
                return Err(Error::UnsupportedValue {
                    property: property_name.to_string(),
                    type_name: value.kind_name(),
                });
            },
        };
        Ok(typed)
    }

    /// Decode attribute text back into a typed value.
    ///
    /// Decimal text stays `Value::Decimal`; doubles written by
    /// [`encode`](Self::encode) therefore come back as decimals.
    pub fn decode(&self, property_name: &str, text: &str) -> Result<Value> {
        let prop = DocViewProperty::parse(text);
        if prop.multi {
            let values = prop
                .values
                .iter()
                .map(|v| self.decode_scalar(property_name, prop.property_type, v))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Value::Array(values));
        }
        let value = prop.values.first().map(String::as_str).unwrap_or_default();
        self.decode_scalar(property_name, prop.property_type, value)
    }

    fn decode_scalar(
        &self,
        property_name: &str,
        property_type: PropertyType,
        text: &str,
    ) -> Result<Value> {
        let invalid = || Error::InvalidValue {
            property: property_name.to_string(),
            value: text.to_string(),
        };
        let value = match property_type {
            PropertyType::String | PropertyType::Undefined => Value::String(text.to_string()),
            PropertyType::Boolean => match text {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                _ => return Err(invalid()),
            },
            PropertyType::Long => Value::Long(text.parse().map_err(|_| invalid())?),
            PropertyType::Double => Value::Double(text.parse().map_err(|_| invalid())?),
            PropertyType::Decimal => {
                if !is_decimal_literal(text) {
                    return Err(invalid());
                }
                Value::Decimal(text.to_string())
            },
            PropertyType::Date => Value::Date(parse_date(text)?),
            PropertyType::Name => Value::Name(text.to_string()),
            PropertyType::Path => Value::Path(text.to_string()),
            PropertyType::Reference => Value::Reference(text.to_string()),
            PropertyType::WeakReference => Value::WeakReference(text.to_string()),
            PropertyType::Uri => Value::Uri(text.to_string()),
            PropertyType::Binary => {
                return Err(Error::UnsupportedValue {
                    property: property_name.to_string(),
                    type_name: "Binary",
                });
            },
        };
        Ok(value)
    }
}

/// Format a timestamp the way JCR writes `{Date}` values:
/// milliseconds plus `Z` or a `+hh:mm` offset.
pub fn format_date(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 timestamp with offset.
pub fn parse_date(text: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text).map_err(|_| Error::InvalidTimestamp(text.to_string()))
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`
fn is_decimal_literal(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (mantissa, None),
    };
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || frac_part.is_some_and(|f| !all_digits(f)) {
        return false;
    }
    match exponent {
        Some(exp) => all_digits(exp.strip_prefix(['+', '-']).unwrap_or(exp)),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn encode(name: &str, value: impl Into<Value>) -> Result<String> {
        ValueConverter::new().encode(name, &value.into())
    }

    #[test]
    fn test_null() {
        assert_eq!(encode("x", Value::Null).unwrap(), "");
    }

    #[test]
    fn test_string() {
        assert_eq!(encode("x", "myString").unwrap(), "myString");
        assert_eq!(encode("x", "{myString}").unwrap(), "\\{myString}");
        assert_eq!(encode("x", "[a]").unwrap(), "\\[a]");
        assert_eq!(encode("x", "a\\b").unwrap(), "a\\\\b");
    }

    #[test]
    fn test_string_array_special_chars() {
        assert_eq!(
            encode("x", ["myString1,[]\\äöüß€", "myString2"]).unwrap(),
            "[myString1\\,[]\\\\äöüß€,myString2]"
        );
        assert_eq!(encode("x", ["a,b", "c"]).unwrap(), "[a\\,b,c]");
        assert_eq!(encode("x", ["v1", "v2", "v3"]).unwrap(), "[v1,v2,v3]");
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(encode("x", Vec::<String>::new()).unwrap(), "");
        assert_eq!(encode("x", Vec::<i64>::new()).unwrap(), "");
    }

    #[test]
    fn test_boolean() {
        assert_eq!(encode("x", true).unwrap(), "{Boolean}true");
        assert_eq!(encode("x", [true, false]).unwrap(), "{Boolean}[true,false]");
    }

    #[test]
    fn test_long() {
        assert_eq!(encode("x", 55).unwrap(), "{Long}55");
        assert_eq!(encode("x", 10_000_000_000_i64).unwrap(), "{Long}10000000000");
        assert_eq!(encode("x", [1, 2]).unwrap(), "{Long}[1,2]");
    }

    #[test]
    fn test_double_and_decimal() {
        assert_eq!(encode("x", 1.234).unwrap(), "{Decimal}1.234");
        assert_eq!(encode("x", 1.0).unwrap(), "{Decimal}1.0");
        assert_eq!(encode("x", [1.234, 2.345]).unwrap(), "{Decimal}[1.234,2.345]");
        assert_eq!(
            encode("x", Value::Decimal("2.345".to_string())).unwrap(),
            "{Decimal}2.345"
        );
        assert!(matches!(
            encode("x", Value::Decimal("2,3".to_string())),
            Err(Error::InvalidValue { .. })
        ));
        assert!(encode("x", f64::NAN).is_err());
    }

    #[test]
    fn test_date() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let date = offset.with_ymd_and_hms(2010, 9, 5, 15, 10, 20).unwrap();
        assert_eq!(encode("x", date).unwrap(), "{Date}2010-09-05T15:10:20.000+02:00");

        let utc = chrono::Utc.with_ymd_and_hms(2010, 9, 5, 15, 10, 20).unwrap();
        assert_eq!(encode("x", utc).unwrap(), "{Date}2010-09-05T15:10:20.000Z");
    }

    #[test]
    fn test_privileges_are_names() {
        assert_eq!(
            encode(PN_PRIVILEGES, ["jcr:read", "rep:write"]).unwrap(),
            "{Name}[jcr:read,rep:write]"
        );
        assert_eq!(encode("other", "jcr:read").unwrap(), "jcr:read");
    }

    #[test]
    fn test_explicit_types() {
        assert_eq!(
            encode("x", Value::WeakReference("uuid-1".to_string())).unwrap(),
            "{WeakReference}uuid-1"
        );
        assert_eq!(
            encode("x", Value::Uri("http://example.com".to_string())).unwrap(),
            "{URI}http://example.com"
        );
    }

    #[test]
    fn test_unsupported() {
        let err = encode("data", Value::Binary(vec![1, 2, 3])).unwrap_err();
        assert_eq!(err.to_string(), "Type not supported for property 'data': Binary");
        assert!(matches!(
            encode("x", Value::Array(vec![Value::Array(vec![])])),
            Err(Error::UnsupportedValue { type_name: "Array", .. })
        ));
    }

    #[test]
    fn test_mixed_array_rejected() {
        let err = encode("x", Value::Array(vec![Value::from("a"), Value::from(1)])).unwrap_err();
        assert!(matches!(
            err,
            Error::MixedArrayTypes { first: "String", second: "Long", .. }
        ));
    }

    #[test]
    fn test_decode() {
        let converter = ValueConverter::new();
        assert_eq!(converter.decode("x", "{Long}55").unwrap(), Value::Long(55));
        assert_eq!(
            converter.decode("x", "{Boolean}[true,false]").unwrap(),
            Value::from([true, false])
        );
        assert_eq!(
            converter.decode("x", "[a\\,b,c]").unwrap(),
            Value::from(["a,b", "c"])
        );
        assert_eq!(
            converter.decode("x", "\\{foo}").unwrap(),
            Value::from("{foo}")
        );
        assert_eq!(
            converter.decode("x", "{Decimal}1.5").unwrap(),
            Value::Decimal("1.5".to_string())
        );
        assert!(converter.decode("x", "{Long}abc").is_err());
    }

    #[test]
    fn test_decode_date() {
        let converter = ValueConverter::new();
        let value = converter
            .decode("x", "{Date}2010-09-05T15:10:20.000+02:00")
            .unwrap();
        let Value::Date(dt) = value else {
            panic!("expected date, got {:?}", value);
        };
        assert_eq!(format_date(&dt), "2010-09-05T15:10:20.000+02:00");
    }

    #[test]
    fn test_decimal_literal() {
        assert!(is_decimal_literal("1"));
        assert!(is_decimal_literal("-1.50"));
        assert!(is_decimal_literal("1.5E-3"));
        assert!(!is_decimal_literal("1."));
        assert!(!is_decimal_literal(".5"));
        assert!(!is_decimal_literal("abc"));
    }
}
