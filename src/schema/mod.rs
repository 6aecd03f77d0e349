//! Attribute schema system
//!
//! Declarative descriptors map structured entity attributes onto group
//! codes. Descriptors compose into named sub-record schemas, and those
//! compose into a full entity schema by explicit concatenation: generic
//! entity, then graphical entity, then the concrete type. No inheritance,
//! no runtime method-resolution lookups.

mod loader;
mod namespace;

pub use loader::{export, export_records, flatten_records, load, Residue};
pub use namespace::{AttrSlot, AttrValue, Namespace, ValueSource};

use crate::error::{DxfError, Result};
use crate::types::DxfVersion;
use once_cell::sync::Lazy;

/// Value shape of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKind {
    /// String value
    Text,
    /// Integer value
    Integer,
    /// Double value
    Double,
    /// Handle reference (hex text in tag form)
    Handle,
    /// 2D point occupying (code, code + 10)
    Point2,
    /// 3D point occupying (code, code + 10, code + 20)
    Point3,
}

impl AttrKind {
    /// Human-readable name, used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            AttrKind::Text => "text",
            AttrKind::Integer => "integer",
            AttrKind::Double => "double",
            AttrKind::Handle => "handle",
            AttrKind::Point2 => "point2d",
            AttrKind::Point3 => "point3d",
        }
    }
}

/// Revision applicability of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Present in every revision
    All,
    /// Present only in the legacy (unmarked) revision
    LegacyOnly,
    /// Present only in marker-delimited revisions
    ModernOnly,
}

/// One attribute descriptor: name, group code, shape, default, presence rules
#[derive(Debug, Clone)]
pub struct AttrDef {
    /// Attribute name in the namespace
    pub name: &'static str,
    /// Group code; composite kinds also occupy code + 10 (and code + 20)
    pub code: i32,
    /// Value shape
    pub kind: AttrKind,
    /// Default assigned when the tag is absent from source data
    pub default: AttrValue,
    /// Optional attributes are suppressed on export unless present or mutated
    pub optional: bool,
    /// Revision applicability
    pub availability: Availability,
}

impl AttrDef {
    /// Create a required descriptor available in all revisions
    pub fn new(name: &'static str, code: i32, kind: AttrKind, default: AttrValue) -> Self {
        AttrDef {
            name,
            code,
            kind,
            default,
            optional: false,
            availability: Availability::All,
        }
    }

    /// Mark the descriptor optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Restrict the descriptor to marker-delimited revisions
    pub fn modern_only(mut self) -> Self {
        self.availability = Availability::ModernOnly;
        self
    }

    /// Restrict the descriptor to the legacy revision
    pub fn legacy_only(mut self) -> Self {
        self.availability = Availability::LegacyOnly;
        self
    }

    /// True if the descriptor participates in the given revision
    pub fn applies_to(&self, version: DxfVersion) -> bool {
        match self.availability {
            Availability::All => true,
            Availability::LegacyOnly => version.is_legacy(),
            Availability::ModernOnly => !version.is_legacy(),
        }
    }
}

/// Descriptors for one named sub-record
#[derive(Debug, Clone)]
pub struct SubRecordSchema {
    /// Marker name; `None` for the base record
    pub marker: Option<&'static str>,
    /// Descriptors in declared (export) order
    pub attrs: Vec<AttrDef>,
}

/// Ordered union of sub-record schemas forming one entity's full schema
#[derive(Debug, Clone)]
pub struct EntitySchema {
    /// Sub-record schemas in declared order; the base record comes first
    pub records: Vec<SubRecordSchema>,
}

impl EntitySchema {
    /// Compose an entity schema from reusable sub-record schemas
    pub fn compose(records: Vec<SubRecordSchema>) -> Self {
        EntitySchema { records }
    }

    /// Find a descriptor by attribute name
    pub fn find(&self, name: &str) -> Option<&AttrDef> {
        self.records
            .iter()
            .flat_map(|r| r.attrs.iter())
            .find(|d| d.name == name)
    }

    /// Iterate all descriptors in declared order
    pub fn attrs(&self) -> impl Iterator<Item = &AttrDef> {
        self.records.iter().flat_map(|r| r.attrs.iter())
    }

    /// Reject duplicate group codes within one sub-record
    pub fn validate(&self) -> Result<()> {
        for record in &self.records {
            for (i, a) in record.attrs.iter().enumerate() {
                for b in &record.attrs[i + 1..] {
                    if a.code == b.code {
                        return Err(DxfError::InvalidValue(format!(
                            "duplicate group code {} in sub-record {:?} ('{}' and '{}')",
                            a.code, record.marker, a.name, b.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// The implicit base record: entity bookkeeping only, no mapped attributes.
/// Handle and owner tags are isolated by the grouper before loading.
pub static BASE_RECORD: Lazy<SubRecordSchema> = Lazy::new(|| SubRecordSchema {
    marker: None,
    attrs: Vec::new(),
});

/// Shared graphical-entity record (marker `AcDbEntity`)
pub static ACDB_ENTITY: Lazy<SubRecordSchema> = Lazy::new(|| SubRecordSchema {
    marker: Some("AcDbEntity"),
    attrs: vec![
        AttrDef::new("layer", 8, AttrKind::Text, AttrValue::from("0")),
        AttrDef::new("linetype", 6, AttrKind::Text, AttrValue::from("BYLAYER")).optional(),
        AttrDef::new("color", 62, AttrKind::Integer, AttrValue::Integer(256)).optional(),
        AttrDef::new("linetype_scale", 48, AttrKind::Double, AttrValue::Double(1.0)).optional(),
        AttrDef::new("invisible", 60, AttrKind::Integer, AttrValue::Integer(0)).optional(),
        AttrDef::new("paperspace", 67, AttrKind::Integer, AttrValue::Integer(0)).optional(),
        AttrDef::new("lineweight", 370, AttrKind::Integer, AttrValue::Integer(-1))
            .optional()
            .modern_only(),
        AttrDef::new("true_color", 420, AttrKind::Integer, AttrValue::Integer(0))
            .optional()
            .modern_only(),
    ],
});
