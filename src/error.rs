//! Error types for the tagcad library

use std::io;
use thiserror::Error;

/// Main error type for tagcad operations
#[derive(Debug, Error)]
pub enum DxfError {
    /// IO error occurred while reading tag data
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A tag value failed coercion to the type its group code mandates
    #[error("Malformed tag at line {line}: code {code} expects {expected}, got '{value}'")]
    MalformedTag {
        line: usize,
        code: i32,
        expected: &'static str,
        value: String,
    },

    /// A composite attribute has the wrong component count or value type
    #[error("Invalid shape for attribute '{attribute}': expected {expected}, got {actual}")]
    InvalidAttributeShape {
        attribute: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Entity type name not present in the registry
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// Caller-supplied structured data violates a shape invariant
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Operation applied to the wrong entity variant
    #[error("Invalid entity type: {0}")]
    InvalidEntityType(String),

    /// Error parsing the tag stream structure
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unsupported drawing format revision
    #[error("Unsupported CAD version: {0}")]
    UnsupportedVersion(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for tagcad operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_tag_display() {
        let err = DxfError::MalformedTag {
            line: 12,
            code: 10,
            expected: "double",
            value: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 12"));
        assert!(msg.contains("code 10"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_unknown_entity_type_display() {
        let err = DxfError::UnknownEntityType("FUTURETYPE9".to_string());
        assert_eq!(err.to_string(), "Unknown entity type: FUTURETYPE9");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: DxfError = io_err.into();
        assert!(matches!(err, DxfError::Io(_)));
    }
}
