//! Attribute namespace
//!
//! The structured, named-value view of one entity's data, as distinct from
//! its raw tag encoding. Owned exclusively by the entity instance. Each
//! slot remembers whether its value came from source data, from a schema
//! default, or from a mutation after load; the exporter uses that
//! provenance to suppress untouched defaults.

use crate::error::{DxfError, Result};
use crate::schema::{AttrKind, EntitySchema};
use crate::types::{DxfVersion, Handle, Vector2, Vector3};
use indexmap::IndexMap;

/// Typed attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// String value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Double value
    Double(f64),
    /// Handle reference
    Handle(Handle),
    /// 2D point
    Point2(Vector2),
    /// 3D point
    Point3(Vector3),
}

impl AttrValue {
    /// Short type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Text(_) => "text",
            AttrValue::Integer(_) => "integer",
            AttrValue::Double(_) => "double",
            AttrValue::Handle(_) => "handle",
            AttrValue::Point2(_) => "point2d",
            AttrValue::Point3(_) => "point3d",
        }
    }

    /// True if the value fits the descriptor shape
    pub fn matches(&self, kind: AttrKind) -> bool {
        matches!(
            (self, kind),
            (AttrValue::Text(_), AttrKind::Text)
                | (AttrValue::Integer(_), AttrKind::Integer)
                | (AttrValue::Double(_), AttrKind::Double)
                | (AttrValue::Handle(_), AttrKind::Handle)
                | (AttrValue::Point2(_), AttrKind::Point2)
                | (AttrValue::Point3(_), AttrKind::Point3)
        )
    }

    /// Get as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttrValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as double
    pub fn as_double(&self) -> Option<f64> {
        match self {
            AttrValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as 3D point
    pub fn as_point3(&self) -> Option<Vector3> {
        match self {
            AttrValue::Point3(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as 2D point
    pub fn as_point2(&self) -> Option<Vector2> {
        match self {
            AttrValue::Point2(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Integer(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Double(v)
    }
}

impl From<Vector2> for AttrValue {
    fn from(v: Vector2) -> Self {
        AttrValue::Point2(v)
    }
}

impl From<Vector3> for AttrValue {
    fn from(v: Vector3) -> Self {
        AttrValue::Point3(v)
    }
}

impl From<Handle> for AttrValue {
    fn from(h: Handle) -> Self {
        AttrValue::Handle(h)
    }
}

/// Provenance of an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Loaded from source tags
    FromFile,
    /// Schema default, never present in source
    Default,
    /// Mutated after load (or set on a directly constructed entity)
    Modified,
}

/// One attribute slot: value plus provenance
#[derive(Debug, Clone)]
pub struct AttrSlot {
    /// The typed value
    pub value: AttrValue,
    /// Where the value came from
    pub source: ValueSource,
}

/// Structured attribute set of one entity instance
#[derive(Debug, Clone)]
pub struct Namespace {
    schema: &'static EntitySchema,
    slots: IndexMap<&'static str, AttrSlot>,
}

impl Namespace {
    /// Create a namespace with every applicable attribute set to its default
    pub fn with_defaults(schema: &'static EntitySchema, version: DxfVersion) -> Self {
        let mut slots = IndexMap::new();
        for def in schema.attrs() {
            if def.applies_to(version) {
                slots.insert(
                    def.name,
                    AttrSlot {
                        value: def.default.clone(),
                        source: ValueSource::Default,
                    },
                );
            }
        }
        Namespace { schema, slots }
    }

    /// The schema this namespace was built from
    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    /// Set an attribute, validating its shape against the descriptor.
    ///
    /// Shape violations are rejected here, at assignment time, not
    /// deferred to export.
    pub fn set(&mut self, name: &str, value: impl Into<AttrValue>) -> Result<()> {
        let value = value.into();
        let def = self
            .schema
            .find(name)
            .ok_or_else(|| DxfError::InvalidValue(format!("no attribute named '{}'", name)))?;
        if !value.matches(def.kind) {
            return Err(DxfError::InvalidAttributeShape {
                attribute: def.name,
                expected: def.kind.name(),
                actual: value.type_name(),
            });
        }
        self.slots.insert(
            def.name,
            AttrSlot {
                value,
                source: ValueSource::Modified,
            },
        );
        Ok(())
    }

    /// Set an attribute whose shape is preserved by construction
    /// (transform paths rewriting a point with a point, etc.)
    pub(crate) fn set_raw(&mut self, name: &'static str, value: AttrValue) {
        self.slots.insert(
            name,
            AttrSlot {
                value,
                source: ValueSource::Modified,
            },
        );
    }

    /// Record a value loaded from source tags
    pub(crate) fn insert_loaded(&mut self, name: &'static str, value: AttrValue) {
        self.slots.insert(
            name,
            AttrSlot {
                value,
                source: ValueSource::FromFile,
            },
        );
    }

    /// Get an attribute value
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.slots.get(name).map(|s| &s.value)
    }

    /// Get the full slot, including provenance
    pub fn slot(&self, name: &str) -> Option<&AttrSlot> {
        self.slots.get(name)
    }

    /// Get as text
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_text())
    }

    /// Get as integer
    pub fn get_integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|v| v.as_integer())
    }

    /// Get as double
    pub fn get_double(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.as_double())
    }

    /// Get as 3D point
    pub fn get_point3(&self, name: &str) -> Option<Vector3> {
        self.get(name).and_then(|v| v.as_point3())
    }

    /// True if the attribute holds an explicit value (from source or a
    /// mutation) rather than an untouched default
    pub fn is_present(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .map(|s| s.source != ValueSource::Default)
            .unwrap_or(false)
    }

    /// Iterate (name, slot) pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &AttrSlot)> {
        self.slots.iter().map(|(k, v)| (*k, v))
    }

    /// Number of attributes in the namespace
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the namespace holds no attributes
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttrDef, SubRecordSchema};
    use once_cell::sync::Lazy;

    static TEST_SCHEMA: Lazy<EntitySchema> = Lazy::new(|| {
        EntitySchema::compose(vec![SubRecordSchema {
            marker: Some("AcDbTest"),
            attrs: vec![
                AttrDef::new("location", 10, AttrKind::Point3, AttrValue::Point3(Vector3::ZERO)),
                AttrDef::new("angle", 50, AttrKind::Double, AttrValue::Double(0.0)).optional(),
            ],
        }])
    });

    fn test_namespace() -> Namespace {
        Namespace::with_defaults(&TEST_SCHEMA, DxfVersion::AC1015)
    }

    #[test]
    fn test_defaults_are_not_present() {
        let ns = test_namespace();
        assert_eq!(ns.get_point3("location"), Some(Vector3::ZERO));
        assert!(!ns.is_present("location"));
    }

    #[test]
    fn test_set_marks_modified() {
        let mut ns = test_namespace();
        ns.set("angle", 1.5).unwrap();
        assert!(ns.is_present("angle"));
        assert_eq!(ns.get_double("angle"), Some(1.5));
    }

    #[test]
    fn test_set_rejects_wrong_shape() {
        let mut ns = test_namespace();
        let err = ns
            .set("location", AttrValue::Point2(Vector2::new(1.0, 2.0)))
            .unwrap_err();
        assert!(matches!(
            err,
            DxfError::InvalidAttributeShape {
                attribute: "location",
                expected: "point3d",
                actual: "point2d",
            }
        ));
        // Value unchanged after the rejected assignment
        assert_eq!(ns.get_point3("location"), Some(Vector3::ZERO));
    }

    #[test]
    fn test_set_unknown_attribute() {
        let mut ns = test_namespace();
        assert!(matches!(
            ns.set("radius", 1.0),
            Err(DxfError::InvalidValue(_))
        ));
    }
}
