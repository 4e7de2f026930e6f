//! Error type shared by the archive writer, the value codec and the unpacker.
use thiserror::Error;

/// Main error type for content package operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A single node name is not a valid JCR name
    #[error("Invalid node name: {0}")]
    InvalidName(String),

    /// A content path contains an invalid node name
    #[error("Path contains illegal node names: {0}")]
    InvalidPath(String),

    /// Mandatory package metadata is not set
    #[error("Missing package metadata: {0}")]
    MissingMetadata(String),

    /// A property value type that cannot be written as an XML attribute
    #[error("Type not supported for property '{property}': {type_name}")]
    UnsupportedValue {
        property: String,
        type_name: &'static str,
    },

    /// An array property mixing different value types
    #[error("Mixing different value types within array not allowed: {first}, {second}, propertyName={property}")]
    MixedArrayTypes {
        property: String,
        first: &'static str,
        second: &'static str,
    },

    /// A value that does not match the lexical form of its type
    #[error("Invalid value for property '{property}': {value}")]
    InvalidValue { property: String, value: String },

    /// The same archive path was written twice
    #[error("Archive entry already written: {0}")]
    DuplicateEntry(String),

    /// An exclude or include pattern failed to compile
    #[error("Invalid regexp pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// An archive entry name that would escape the output directory
    #[error("Invalid archive entry name: {0}")]
    InvalidEntryName(String),

    /// A timestamp that is not valid ISO-8601
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// XML parsing or structure error
    #[error("XML error: {0}")]
    XmlError(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure while processing one archive entry
    #[error("{entry}: {source}")]
    Entry {
        entry: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the archive entry name to an error.
    pub fn in_entry(self, entry: impl Into<String>) -> Self {
        match self {
            // avoid nesting the same context twice
            Error::Entry { .. } => self,
            other => Error::Entry {
                entry: entry.into(),
                source: Box::new(other),
            },
        }
    }

    /// Whether this error came from parsing XML rather than from I/O.
    pub fn is_format_error(&self) -> bool {
        match self {
            Error::XmlError(_) => true,
            Error::Entry { source, .. } => source.is_format_error(),
            _ => false,
        }
    }
}

/// Result type for content package operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_context_in_message() {
        let err = Error::XmlError("unexpected end".to_string()).in_entry("jcr_root/.content.xml");
        assert_eq!(
            err.to_string(),
            "jcr_root/.content.xml: XML error: unexpected end"
        );
        assert!(err.is_format_error());
    }

    #[test]
    fn test_entry_context_not_nested() {
        let err = Error::InvalidName("a/b".to_string())
            .in_entry("first")
            .in_entry("second");
        assert!(err.to_string().starts_with("first:"));
        assert!(!err.is_format_error());
    }
}
