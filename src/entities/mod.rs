//! CAD entity representation
//!
//! Entities are a tagged variant (`EntityData`) paired with one generic
//! attribute namespace; type-specific behavior (geometric transforms, mesh
//! editing) is implemented per variant. There is no duck typing and no
//! dynamic attribute lookup: every attribute access goes through the
//! schema-backed namespace.

pub mod line;
pub mod mesh;
pub mod point;

pub use line::new_line;
pub use mesh::{new_mesh, MeshData, MeshEditor};
pub use point::new_point;

use crate::schema::{self, AttrValue, EntitySchema, Namespace, Residue};
use crate::tags::Tag;
use crate::types::{DxfVersion, Handle, Transform, Vector3};
use once_cell::sync::Lazy;

/// Type-specific payload of an entity
#[derive(Debug, Clone)]
pub enum EntityData {
    /// POINT entity; all state lives in the namespace
    Point,
    /// LINE entity; all state lives in the namespace
    Line,
    /// MESH entity with its structured geometry payload
    Mesh(MeshData),
    /// Unresolved type kept as an opaque residue record
    Unknown,
}

/// One entity instance: type tag, attribute namespace, unhandled-tag
/// residue and type-specific payload. Owned exclusively by its document.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Entity type name (e.g. "POINT")
    pub dxftype: String,
    /// Entity handle, absent in legacy data
    pub handle: Option<Handle>,
    /// Owner handle, absent in legacy data
    pub owner: Option<Handle>,
    /// Structured attribute set
    pub namespace: Namespace,
    /// Sub-records present in source data but consumed by no descriptor
    pub residue: Residue,
    /// Extended-data tags, retained verbatim
    pub xdata: Vec<Tag>,
    /// Type-specific payload
    pub data: EntityData,
}

/// Schema used for unresolved entity types: a bare base record, so every
/// tag survives as residue.
pub static UNKNOWN_SCHEMA: Lazy<EntitySchema> =
    Lazy::new(|| EntitySchema::compose(vec![schema::BASE_RECORD.clone()]));

impl Entity {
    /// The entity type name
    pub fn dxftype(&self) -> &str {
        &self.dxftype
    }

    /// True if this entity was retained as an opaque residue record
    pub fn is_unknown(&self) -> bool {
        matches!(self.data, EntityData::Unknown)
    }

    /// Open a scoped edit session on a MESH entity's geometry.
    ///
    /// Fails with [`crate::error::DxfError::InvalidEntityType`] on any
    /// other variant.
    pub fn edit_mesh(&mut self) -> crate::error::Result<MeshEditor<'_>> {
        match &mut self.data {
            EntityData::Mesh(data) => Ok(MeshEditor::new(data)),
            _ => Err(crate::error::DxfError::InvalidEntityType(format!(
                "{} has no mesh data",
                self.dxftype
            ))),
        }
    }

    /// Export the entity back to a flat tag sequence for the given
    /// revision. Inverse of the factory's construct path.
    pub fn export_tags(&self, version: DxfVersion) -> Vec<Tag> {
        let mut out = vec![Tag::text(0, self.dxftype.clone())];
        if version.has_subclass_markers() {
            if let Some(handle) = self.handle {
                out.push(Tag::text(5, handle.to_hex()));
            }
            if let Some(owner) = self.owner {
                out.push(Tag::text(330, owner.to_hex()));
            }
        }

        let mut records = schema::export_records(
            &self.namespace,
            &self.residue,
            self.namespace.schema(),
            version,
        );
        if let EntityData::Mesh(data) = &self.data {
            mesh::append_geometry(&mut records, data);
        }
        out.extend(schema::flatten_records(records, version));
        out.extend(self.xdata.iter().cloned());
        out
    }
}

/// Geometric-transform contract shared by spatial entities.
///
/// Both operations mutate in place and return the same instance for
/// chaining. `transform` maps position attributes through the full affine
/// matrix and direction attributes through its linear part; `translate`
/// is a restricted fast path that shifts positions only.
pub trait TransformEntity {
    /// Apply an affine transform in place
    fn transform(&mut self, t: &Transform) -> &mut Self;

    /// Shift position attributes by the given offset
    fn translate(&mut self, dx: f64, dy: f64, dz: f64) -> &mut Self;
}

impl TransformEntity for Entity {
    fn transform(&mut self, t: &Transform) -> &mut Self {
        match &mut self.data {
            EntityData::Point => point::transform(&mut self.namespace, t),
            EntityData::Line => line::transform(&mut self.namespace, t),
            EntityData::Mesh(data) => {
                for vertex in &mut data.vertices {
                    *vertex = t.apply(*vertex);
                }
            }
            // No spatial knowledge about unresolved types
            EntityData::Unknown => {}
        }
        self
    }

    fn translate(&mut self, dx: f64, dy: f64, dz: f64) -> &mut Self {
        let offset = Vector3::new(dx, dy, dz);
        match &mut self.data {
            EntityData::Point => point::translate(&mut self.namespace, offset),
            EntityData::Line => line::translate(&mut self.namespace, offset),
            EntityData::Mesh(data) => {
                for vertex in &mut data.vertices {
                    *vertex = *vertex + offset;
                }
            }
            EntityData::Unknown => {}
        }
        self
    }
}

/// Map a stored extrusion/thickness pair through the linear part of a
/// transform. Extrusion is a pure direction and must never be translated;
/// thickness rescales with the mapped extrusion length, keeping its sign.
pub(crate) fn transform_thickness_and_extrusion(ns: &mut Namespace, t: &Transform) {
    if ns.is_present("thickness") {
        let thickness = ns.get_double("thickness").unwrap_or(0.0);
        let extrusion = ns.get_point3("extrusion").unwrap_or(Vector3::UNIT_Z);
        let reflection = if thickness < 0.0 { -1.0 } else { 1.0 };
        let mapped = t.apply_direction(extrusion * thickness.abs());
        ns.set_raw("thickness", AttrValue::Double(mapped.length() * reflection));
    }
    if let Some(extrusion) = ns.get_point3("extrusion") {
        ns.set_raw(
            "extrusion",
            AttrValue::Point3(t.apply_direction(extrusion).normalize()),
        );
    }
}
