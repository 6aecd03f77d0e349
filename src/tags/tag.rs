//! The atomic tag: one (group code, value) pair

use crate::error::{DxfError, Result};
use crate::tags::code::{value_type_for_code, GroupValueType};
use crate::types::{Handle, Vector2, Vector3};
use std::fmt;

/// Typed tag value
///
/// The variant is a pure function of the group code, except for the point
/// variants which the stream parser assembles from two or three consecutive
/// coordinate-component tags.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// String value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Double-precision value
    Double(f64),
    /// 2D point assembled from (code, code + 10)
    Point2(Vector2),
    /// 3D point assembled from (code, code + 10, code + 20)
    Point3(Vector3),
}

impl TagValue {
    /// Short type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            TagValue::Text(_) => "text",
            TagValue::Integer(_) => "integer",
            TagValue::Double(_) => "double",
            TagValue::Point2(_) => "point2d",
            TagValue::Point3(_) => "point3d",
        }
    }
}

/// One (group code, value) pair. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// The group code
    pub code: i32,
    /// The typed value
    pub value: TagValue,
}

impl Tag {
    /// Create a tag from a code and an already-typed value
    pub fn new(code: i32, value: TagValue) -> Self {
        Tag { code, value }
    }

    /// Create a text tag
    pub fn text(code: i32, value: impl Into<String>) -> Self {
        Tag::new(code, TagValue::Text(value.into()))
    }

    /// Create an integer tag
    pub fn integer(code: i32, value: i64) -> Self {
        Tag::new(code, TagValue::Integer(value))
    }

    /// Create a double tag
    pub fn double(code: i32, value: f64) -> Self {
        Tag::new(code, TagValue::Double(value))
    }

    /// Create a 2D point tag
    pub fn point2(code: i32, value: Vector2) -> Self {
        Tag::new(code, TagValue::Point2(value))
    }

    /// Create a 3D point tag
    pub fn point3(code: i32, value: Vector3) -> Self {
        Tag::new(code, TagValue::Point3(value))
    }

    /// Coerce a raw value string into a tag, per the code's mandated type.
    ///
    /// A point-base code yields a bare `Double` component here; the stream
    /// parser recombines components into `Point2`/`Point3` tags. Fails with
    /// [`DxfError::MalformedTag`] when the value cannot be coerced; a value
    /// that silently defaulted instead would corrupt geometry downstream.
    pub fn from_pair(code: i32, raw: &str, line: usize) -> Result<Self> {
        let value_type = value_type_for_code(code);
        let trimmed = raw.trim();
        let value = match value_type {
            GroupValueType::Text => TagValue::Text(raw.to_string()),
            GroupValueType::Integer => TagValue::Integer(trimmed.parse::<i64>().map_err(|_| {
                DxfError::MalformedTag {
                    line,
                    code,
                    expected: "integer",
                    value: raw.to_string(),
                }
            })?),
            GroupValueType::Double | GroupValueType::PointBase => {
                TagValue::Double(trimmed.parse::<f64>().map_err(|_| DxfError::MalformedTag {
                    line,
                    code,
                    expected: "double",
                    value: raw.to_string(),
                })?)
            }
        };
        Ok(Tag { code, value })
    }

    /// Get the value as text
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            TagValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            TagValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as a double
    pub fn as_double(&self) -> Option<f64> {
        match self.value {
            TagValue::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as a 3D point
    pub fn as_point3(&self) -> Option<Vector3> {
        match self.value {
            TagValue::Point3(v) => Some(v),
            _ => None,
        }
    }

    /// Parse a text value as a hexadecimal handle
    pub fn as_handle(&self) -> Option<Handle> {
        self.as_text().and_then(|s| Handle::from_hex(s).ok())
    }

    /// Expand the tag back into raw (code, value text) pairs.
    ///
    /// Point tags expand into their two or three component pairs; this is
    /// the inverse of the parser's recombination.
    pub fn to_pairs(&self) -> Vec<(i32, String)> {
        match &self.value {
            TagValue::Text(s) => vec![(self.code, s.clone())],
            TagValue::Integer(v) => vec![(self.code, v.to_string())],
            TagValue::Double(v) => vec![(self.code, fmt_double(*v))],
            TagValue::Point2(p) => vec![
                (self.code, fmt_double(p.x)),
                (self.code + 10, fmt_double(p.y)),
            ],
            TagValue::Point3(p) => vec![
                (self.code, fmt_double(p.x)),
                (self.code + 10, fmt_double(p.y)),
                (self.code + 20, fmt_double(p.z)),
            ],
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            TagValue::Text(s) => write!(f, "({}, '{}')", self.code, s),
            TagValue::Integer(v) => write!(f, "({}, {})", self.code, v),
            TagValue::Double(v) => write!(f, "({}, {})", self.code, v),
            TagValue::Point2(p) => write!(f, "({}, {})", self.code, p),
            TagValue::Point3(p) => write!(f, "({}, {})", self.code, p),
        }
    }
}

/// Format a double the way it is written to tag output
fn fmt_double(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pair_text() {
        let tag = Tag::from_pair(0, "POINT", 1).unwrap();
        assert_eq!(tag.as_text(), Some("POINT"));
    }

    #[test]
    fn test_from_pair_integer() {
        let tag = Tag::from_pair(62, "256", 1).unwrap();
        assert_eq!(tag.as_integer(), Some(256));
    }

    #[test]
    fn test_from_pair_double() {
        let tag = Tag::from_pair(40, "1.5", 1).unwrap();
        assert_eq!(tag.as_double(), Some(1.5));
    }

    #[test]
    fn test_from_pair_malformed_integer() {
        let err = Tag::from_pair(70, "1.5x", 3).unwrap_err();
        assert!(matches!(
            err,
            DxfError::MalformedTag { line: 3, code: 70, .. }
        ));
    }

    #[test]
    fn test_from_pair_malformed_double() {
        assert!(Tag::from_pair(10, "not-a-number", 1).is_err());
    }

    #[test]
    fn test_point3_to_pairs() {
        let tag = Tag::point3(10, Vector3::new(1.0, 2.0, 3.5));
        let pairs = tag.to_pairs();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], (10, "1.0".to_string()));
        assert_eq!(pairs[1], (20, "2.0".to_string()));
        assert_eq!(pairs[2], (30, "3.5".to_string()));
    }

    #[test]
    fn test_as_handle() {
        let tag = Tag::text(5, "1AF");
        assert_eq!(tag.as_handle(), Some(Handle::new(0x1AF)));
    }
}
