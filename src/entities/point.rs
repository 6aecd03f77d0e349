//! POINT entity
//!
//! The point carries a drawing angle (group code 50): the angle of the
//! X axis of the UCS in effect when the point was drawn. `transform` does
//! not adjust it — an arbitrary affine map has no well-defined induced
//! rotation for a plane-relative scalar angle. This is a documented
//! omission, not an oversight.

use crate::entities::{transform_thickness_and_extrusion, Entity, EntityData};
use crate::error::Result;
use crate::schema::{
    AttrDef, AttrKind, AttrValue, EntitySchema, Namespace, Residue, SubRecordSchema, ACDB_ENTITY,
    BASE_RECORD,
};
use crate::types::{DxfVersion, Transform, Vector3};
use once_cell::sync::Lazy;

/// Concrete sub-record schema for POINT (marker `AcDbPoint`)
static ACDB_POINT: Lazy<SubRecordSchema> = Lazy::new(|| SubRecordSchema {
    marker: Some("AcDbPoint"),
    attrs: vec![
        AttrDef::new(
            "location",
            10,
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
        AttrDef::new("angle", 50, AttrKind::Double, AttrValue::Double(0.0)).optional(),
    ],
});

static POINT_SCHEMA: Lazy<EntitySchema> = Lazy::new(|| {
    EntitySchema::compose(vec![
        BASE_RECORD.clone(),
        ACDB_ENTITY.clone(),
        ACDB_POINT.clone(),
    ])
});

/// The full POINT entity schema
pub fn schema() -> &'static EntitySchema {
    Lazy::force(&POINT_SCHEMA)
}

/// Variant builder used by the factory
pub(crate) fn build(_ns: &mut Namespace, _residue: &mut Residue) -> Result<EntityData> {
    Ok(EntityData::Point)
}

/// Create a POINT entity at `location` with current-revision defaults
pub fn new_point(location: Vector3) -> Entity {
    let mut namespace = Namespace::with_defaults(schema(), DxfVersion::AC1032);
    namespace.set_raw("location", AttrValue::Point3(location));
    Entity {
        dxftype: "POINT".to_string(),
        handle: None,
        owner: None,
        namespace,
        residue: Residue::default(),
        xdata: Vec::new(),
        data: EntityData::Point,
    }
}

pub(crate) fn transform(ns: &mut Namespace, t: &Transform) {
    if let Some(location) = ns.get_point3("location") {
        ns.set_raw("location", AttrValue::Point3(t.apply(location)));
    }
    transform_thickness_and_extrusion(ns, t);
    // angle is intentionally left unchanged
}

pub(crate) fn translate(ns: &mut Namespace, offset: Vector3) {
    if let Some(location) = ns.get_point3("location") {
        ns.set_raw("location", AttrValue::Point3(location + offset));
    }
}
