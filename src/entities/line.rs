//! LINE entity

use crate::entities::{transform_thickness_and_extrusion, Entity, EntityData};
use crate::error::Result;
use crate::schema::{
    AttrDef, AttrKind, AttrValue, EntitySchema, Namespace, Residue, SubRecordSchema, ACDB_ENTITY,
    BASE_RECORD,
};
use crate::types::{DxfVersion, Transform, Vector3};
use once_cell::sync::Lazy;

/// Concrete sub-record schema for LINE (marker `AcDbLine`)
static ACDB_LINE: Lazy<SubRecordSchema> = Lazy::new(|| SubRecordSchema {
    marker: Some("AcDbLine"),
    attrs: vec![
        AttrDef::new(
            "start",
            10,
            AttrKind::Point3,
            AttrValue::Point3(Vector3::ZERO),
        ),
        AttrDef::new(
            "end",
            11,
            AttrKind::Point3,
            AttrValue::Point3(Vector3::ZERO),
        ),
        AttrDef::new("thickness", 39, AttrKind::Double, AttrValue::Double(0.0)).optional(),
        AttrDef::new(
            "extrusion",
            210,
            AttrKind::Point3,
            AttrValue::Point3(Vector3::UNIT_Z),
        )
        .optional(),
    ],
});

static LINE_SCHEMA: Lazy<EntitySchema> = Lazy::new(|| {
    EntitySchema::compose(vec![
        BASE_RECORD.clone(),
        ACDB_ENTITY.clone(),
        ACDB_LINE.clone(),
    ])
});

/// The full LINE entity schema
pub fn schema() -> &'static EntitySchema {
    Lazy::force(&LINE_SCHEMA)
}

/// Variant builder used by the factory
pub(crate) fn build(_ns: &mut Namespace, _residue: &mut Residue) -> Result<EntityData> {
    Ok(EntityData::Line)
}

/// Create a LINE entity with current-revision defaults
pub fn new_line(start: Vector3, end: Vector3) -> Entity {
    let mut namespace = Namespace::with_defaults(schema(), DxfVersion::AC1032);
    namespace.set_raw("start", AttrValue::Point3(start));
    namespace.set_raw("end", AttrValue::Point3(end));
    Entity {
        dxftype: "LINE".to_string(),
        handle: None,
        owner: None,
        namespace,
        residue: Residue::default(),
        xdata: Vec::new(),
        data: EntityData::Line,
    }
}

pub(crate) fn transform(ns: &mut Namespace, t: &Transform) {
    for name in ["start", "end"] {
        if let Some(p) = ns.get_point3(name) {
            ns.set_raw(name, AttrValue::Point3(t.apply(p)));
        }
    }
    transform_thickness_and_extrusion(ns, t);
}

pub(crate) fn translate(ns: &mut Namespace, offset: Vector3) {
    for name in ["start", "end"] {
        if let Some(p) = ns.get_point3(name) {
            ns.set_raw(name, AttrValue::Point3(p + offset));
        }
    }
}
