//! Property value and property type definitions.

use chrono::{DateTime, FixedOffset, Local, Utc};

/// JCR property types that appear as `{Type}` prefixes in attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// No values to derive a type from (empty arrays)
    Undefined,
    String,
    Binary,
    Long,
    Double,
    Date,
    Boolean,
    Name,
    Path,
    Reference,
    WeakReference,
    Uri,
    Decimal,
}

impl PropertyType {
    /// Type name as written between braces.
    pub fn name(self) -> &'static str {
        match self {
            PropertyType::Undefined => "undefined",
            PropertyType::String => "String",
            PropertyType::Binary => "Binary",
            PropertyType::Long => "Long",
            PropertyType::Double => "Double",
            PropertyType::Date => "Date",
            PropertyType::Boolean => "Boolean",
            PropertyType::Name => "Name",
            PropertyType::Path => "Path",
            PropertyType::Reference => "Reference",
            PropertyType::WeakReference => "WeakReference",
            PropertyType::Uri => "URI",
            PropertyType::Decimal => "Decimal",
        }
    }

    /// Look up a type by its brace name.
    pub fn from_name(name: &str) -> Option<Self> {
        let property_type = match name {
            "undefined" => PropertyType::Undefined,
            "String" => PropertyType::String,
            "Binary" => PropertyType::Binary,
            "Long" => PropertyType::Long,
            "Double" => PropertyType::Double,
            "Date" => PropertyType::Date,
            "Boolean" => PropertyType::Boolean,
            "Name" => PropertyType::Name,
            "Path" => PropertyType::Path,
            "Reference" => PropertyType::Reference,
            "WeakReference" => PropertyType::WeakReference,
            "URI" => PropertyType::Uri,
            "Decimal" => PropertyType::Decimal,
            _ => return None,
        };
        Some(property_type)
    }

    /// Whether values of this type are written with an explicit `{Type}` prefix.
    #[inline]
    pub fn has_prefix(self) -> bool {
        !matches!(self, PropertyType::String | PropertyType::Undefined)
    }

    /// Whether values of this type are backslash-escaped on output.
    #[inline]
    pub fn is_escaped(self) -> bool {
        matches!(
            self,
            PropertyType::String | PropertyType::Name | PropertyType::Path
        )
    }
}

/// A property value in a content tree.
///
/// Scalars map to a single typed attribute value, `Array` to a multi-value
/// property. `Binary` can be held in a tree but is rejected when encoded;
/// binary payloads are added as files instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value; skipped when building documents, encodes to `""`
    Null,
    String(String),
    Boolean(bool),
    Long(i64),
    /// Floating point number, written with the `{Decimal}` prefix
    Double(f64),
    /// Decimal literal kept as text to avoid precision loss
    Decimal(String),
    Date(DateTime<FixedOffset>),
    Name(String),
    Path(String),
    Reference(String),
    WeakReference(String),
    Uri(String),
    Binary(Vec<u8>),
    Array(Vec<Value>),
}

impl Value {
    /// Name of the value kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::String(_) => "String",
            Value::Boolean(_) => "Boolean",
            Value::Long(_) => "Long",
            Value::Double(_) => "Double",
            Value::Decimal(_) => "Decimal",
            Value::Date(_) => "Date",
            Value::Name(_) => "Name",
            Value::Path(_) => "Path",
            Value::Reference(_) => "Reference",
            Value::WeakReference(_) => "WeakReference",
            Value::Uri(_) => "URI",
            Value::Binary(_) => "Binary",
            Value::Array(_) => "Array",
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// String content of string-like scalars.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s)
            | Value::Decimal(s)
            | Value::Name(s)
            | Value::Path(s)
            | Value::Reference(s)
            | Value::WeakReference(s)
            | Value::Uri(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Long(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Long(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Double(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::Date(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value.fixed_offset())
    }
}

impl From<DateTime<Local>> for Value {
    fn from(value: DateTime<Local>) -> Self {
        Value::Date(value.fixed_offset())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(values: [T; N]) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
