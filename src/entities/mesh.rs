//! MESH (SubD mesh) entity
//!
//! The mesh owns three parallel structures: vertex positions, faces
//! (index lists into the vertex sequence) and edges (index pairs) with a
//! parallel crease-weight sequence. Geometry is edited through a scoped
//! session ([`MeshEditor`]) that commits the working copy back into the
//! entity on every exit path.

use crate::entities::{Entity, EntityData};
use crate::error::{DxfError, Result};
use crate::schema::{
    AttrDef, AttrKind, AttrValue, EntitySchema, Namespace, Residue, SubRecordSchema, ACDB_ENTITY,
    BASE_RECORD,
};
use crate::tags::{SubRecord, Tag, TagValue};
use crate::types::{DxfVersion, Vector3};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use std::ops::{Deref, DerefMut};

/// Marker name of the mesh sub-record
pub const ACDB_SUBD_MESH: &str = "AcDbSubDMesh";

// Geometry group codes within the AcDbSubDMesh record
const VERTEX_COUNT: i32 = 92;
const FACE_LIST_SIZE: i32 = 93;
const EDGE_COUNT: i32 = 94;
const CREASE_COUNT: i32 = 95;
const INDEX: i32 = 90;
const CREASE: i32 = 140;
const VERTEX: i32 = 10;

/// Concrete sub-record schema for MESH (marker `AcDbSubDMesh`)
static ACDB_SUBD_MESH_SCHEMA: Lazy<SubRecordSchema> = Lazy::new(|| SubRecordSchema {
    marker: Some(ACDB_SUBD_MESH),
    attrs: vec![
        AttrDef::new("version", 71, AttrKind::Integer, AttrValue::Integer(2)),
        AttrDef::new("blend_crease", 72, AttrKind::Integer, AttrValue::Integer(0)),
        AttrDef::new(
            "subdivision_levels",
            91,
            AttrKind::Integer,
            AttrValue::Integer(0),
        ),
    ],
});

static MESH_SCHEMA: Lazy<EntitySchema> = Lazy::new(|| {
    EntitySchema::compose(vec![
        BASE_RECORD.clone(),
        ACDB_ENTITY.clone(),
        ACDB_SUBD_MESH_SCHEMA.clone(),
    ])
});

/// The full MESH entity schema
pub fn schema() -> &'static EntitySchema {
    Lazy::force(&MESH_SCHEMA)
}

/// Mesh geometry: three parallel structures owned exclusively by the
/// entity instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions in order
    pub vertices: Vec<Vector3>,
    /// Faces: each an ordered list of at least 3 vertex indices
    pub faces: Vec<Vec<usize>>,
    /// Edges: vertex index pairs
    pub edges: Vec<(usize, usize)>,
    /// Crease weights, parallel to `edges`
    pub edge_crease_values: Vec<f64>,
}

impl MeshData {
    /// Create an empty mesh
    pub fn new() -> Self {
        MeshData::default()
    }

    /// Append a vertex and return its index.
    ///
    /// Fails with [`DxfError::InvalidValue`] unless given exactly three
    /// coordinates; the check runs before any state is mutated.
    pub fn add_vertex(&mut self, coords: &[f64]) -> Result<usize> {
        if coords.len() != 3 {
            return Err(DxfError::InvalidValue(format!(
                "mesh vertex requires 3 coordinates, got {}",
                coords.len()
            )));
        }
        let index = self.vertices.len();
        self.vertices
            .push(Vector3::new(coords[0], coords[1], coords[2]));
        Ok(index)
    }

    /// Append a face from corner positions, creating vertices implicitly.
    /// Returns the face index.
    pub fn add_face(&mut self, corners: &[Vector3]) -> usize {
        let start = self.vertices.len();
        self.vertices.extend_from_slice(corners);
        self.faces.push((start..start + corners.len()).collect());
        self.faces.len() - 1
    }

    /// Append an edge from its endpoint positions, creating vertices
    /// implicitly. Returns the edge index.
    pub fn add_edge(&mut self, start: Vector3, end: Vector3) -> usize {
        let base = self.vertices.len();
        self.vertices.push(start);
        self.vertices.push(end);
        self.edges.push((base, base + 1));
        self.edge_crease_values.push(0.0);
        self.edges.len() - 1
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Deduplicate vertices and remap faces and edges.
    ///
    /// Distinct positions (exact bit-pattern equality) are keyed to a
    /// canonical index in first-occurrence order; every face and edge is
    /// rewritten through that mapping and the vertex sequence is replaced
    /// by the deduplicated set. Faces left with fewer than 3 distinct
    /// indices and edges whose endpoints collapse are dropped, along with
    /// their crease weights. O(V) for the map, O(sum of face/edge sizes)
    /// for the remapping; applying it twice is a no-op.
    pub fn optimize(&mut self) {
        let mut canonical: AHashMap<[u64; 3], usize> =
            AHashMap::with_capacity(self.vertices.len());
        let mut unique: Vec<Vector3> = Vec::new();
        let mut remap: Vec<usize> = Vec::with_capacity(self.vertices.len());

        for v in &self.vertices {
            let key = [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()];
            let index = *canonical.entry(key).or_insert_with(|| {
                unique.push(*v);
                unique.len() - 1
            });
            remap.push(index);
        }
        self.vertices = unique;

        let faces = std::mem::take(&mut self.faces);
        for face in faces {
            let mapped: Option<Vec<usize>> = face
                .iter()
                .map(|&i| remap.get(i).copied())
                .collect();
            if let Some(mapped) = mapped {
                if distinct_count(&mapped) >= 3 {
                    self.faces.push(mapped);
                }
            }
        }

        let edges = std::mem::take(&mut self.edges);
        let creases = std::mem::take(&mut self.edge_crease_values);
        for ((a, b), crease) in edges.into_iter().zip(creases) {
            if let (Some(&a), Some(&b)) = (remap.get(a), remap.get(b)) {
                if a != b {
                    self.edges.push((a, b));
                    self.edge_crease_values.push(crease);
                }
            }
        }
    }
}

fn distinct_count(indices: &[usize]) -> usize {
    let mut seen: Vec<usize> = Vec::with_capacity(indices.len());
    for &i in indices {
        if !seen.contains(&i) {
            seen.push(i);
        }
    }
    seen.len()
}

/// Scoped exclusive edit session over a mesh's geometry.
///
/// Mutations happen on a working copy; the copy is committed back into
/// the owning entity when the session ends, on every exit path including
/// early returns. Exclusivity is enforced by the `&mut` borrow: only one
/// session can be open per mesh instance at a time.
#[derive(Debug)]
pub struct MeshEditor<'a> {
    target: &'a mut MeshData,
    work: MeshData,
}

impl<'a> MeshEditor<'a> {
    pub(crate) fn new(target: &'a mut MeshData) -> Self {
        let work = target.clone();
        MeshEditor { target, work }
    }

    /// Commit the working copy explicitly and end the session
    pub fn commit(self) {
        // Drop does the write-back
    }
}

impl Deref for MeshEditor<'_> {
    type Target = MeshData;

    fn deref(&self) -> &MeshData {
        &self.work
    }
}

impl DerefMut for MeshEditor<'_> {
    fn deref_mut(&mut self) -> &mut MeshData {
        &mut self.work
    }
}

impl Drop for MeshEditor<'_> {
    fn drop(&mut self) {
        *self.target = std::mem::take(&mut self.work);
    }
}

/// Variant builder used by the factory: extracts the geometry section
/// from the `AcDbSubDMesh` residue, leaving other unknown tags in place
pub(crate) fn build(_ns: &mut Namespace, residue: &mut Residue) -> Result<EntityData> {
    let position = residue
        .records
        .iter()
        .position(|r| r.name.as_deref() == Some(ACDB_SUBD_MESH));
    let Some(position) = position else {
        return Ok(EntityData::Mesh(MeshData::new()));
    };

    let record = residue.records.remove(position);
    let (data, leftover) = parse_geometry(&record.tags)?;
    if !leftover.is_empty() {
        residue.records.insert(
            position,
            SubRecord {
                name: record.name,
                tags: leftover,
            },
        );
    }
    Ok(EntityData::Mesh(data))
}

/// Create a MESH entity with current-revision defaults and empty geometry
pub fn new_mesh() -> Entity {
    Entity {
        dxftype: "MESH".to_string(),
        handle: None,
        owner: None,
        namespace: Namespace::with_defaults(schema(), DxfVersion::AC1032),
        residue: Residue::default(),
        xdata: Vec::new(),
        data: EntityData::Mesh(MeshData::new()),
    }
}

fn expect_integer(tag: &Tag) -> Result<i64> {
    tag.as_integer()
        .ok_or_else(|| DxfError::Parse(format!("mesh count tag {} must be an integer", tag.code)))
}

fn expect_index(tag: &Tag) -> Result<usize> {
    let value = expect_integer(tag)?;
    usize::try_from(value)
        .map_err(|_| DxfError::Parse(format!("negative mesh index: {}", value)))
}

/// Decode the mesh geometry section from a sub-record's tags.
///
/// Sections appear in order: vertex count (92) with point tags, face list
/// size (93) with a flat index list, edge count (94) with index pairs,
/// crease count (95) with weights. Tags not belonging to the geometry
/// section are returned as leftover.
pub(crate) fn parse_geometry(tags: &[Tag]) -> Result<(MeshData, Vec<Tag>)> {
    let mut data = MeshData::new();
    let mut leftover = Vec::new();
    let mut cursor = tags.iter();

    while let Some(tag) = cursor.next() {
        match tag.code {
            VERTEX_COUNT => {
                let count = expect_index(tag)?;
                for _ in 0..count {
                    match cursor.next() {
                        Some(tag) if tag.code == VERTEX => match &tag.value {
                            TagValue::Point3(v) => data.vertices.push(*v),
                            _ => {
                                return Err(DxfError::Parse(
                                    "mesh vertex tag must be a 3D point".to_string(),
                                ))
                            }
                        },
                        _ => {
                            return Err(DxfError::Parse(
                                "mesh vertex count does not match vertex tags".to_string(),
                            ))
                        }
                    }
                }
            }
            FACE_LIST_SIZE => {
                let size = expect_index(tag)?;
                let mut flat = Vec::with_capacity(size);
                for _ in 0..size {
                    match cursor.next() {
                        Some(tag) if tag.code == INDEX => flat.push(expect_integer(tag)?),
                        _ => {
                            return Err(DxfError::Parse(
                                "mesh face list size does not match index tags".to_string(),
                            ))
                        }
                    }
                }
                let mut items = flat.into_iter();
                while let Some(arity) = items.next() {
                    let arity = usize::try_from(arity).map_err(|_| {
                        DxfError::Parse(format!("invalid face vertex count: {}", arity))
                    })?;
                    let mut face = Vec::with_capacity(arity);
                    for _ in 0..arity {
                        let index = items.next().ok_or_else(|| {
                            DxfError::Parse("mesh face list truncated".to_string())
                        })?;
                        face.push(usize::try_from(index).map_err(|_| {
                            DxfError::Parse(format!("negative mesh index: {}", index))
                        })?);
                    }
                    data.faces.push(face);
                }
            }
            EDGE_COUNT => {
                let count = expect_index(tag)?;
                for _ in 0..count {
                    let a = match cursor.next() {
                        Some(tag) if tag.code == INDEX => expect_index(tag)?,
                        _ => {
                            return Err(DxfError::Parse(
                                "mesh edge count does not match index tags".to_string(),
                            ))
                        }
                    };
                    let b = match cursor.next() {
                        Some(tag) if tag.code == INDEX => expect_index(tag)?,
                        _ => {
                            return Err(DxfError::Parse(
                                "mesh edge index pair truncated".to_string(),
                            ))
                        }
                    };
                    data.edges.push((a, b));
                }
            }
            CREASE_COUNT => {
                let count = expect_index(tag)?;
                data.edge_crease_values.clear();
                for _ in 0..count {
                    match cursor.next() {
                        Some(tag) if tag.code == CREASE => {
                            data.edge_crease_values.push(tag.as_double().ok_or_else(
                                || DxfError::Parse("crease weight must be a double".to_string()),
                            )?)
                        }
                        _ => {
                            return Err(DxfError::Parse(
                                "mesh crease count does not match weight tags".to_string(),
                            ))
                        }
                    }
                }
            }
            _ => leftover.push(tag.clone()),
        }
    }

    // Keep the crease sequence parallel to the edge sequence
    data.edge_crease_values.resize(data.edges.len(), 0.0);
    Ok((data, leftover))
}

/// Encode the geometry section back into tags, inverse of
/// [`parse_geometry`]
pub(crate) fn geometry_tags(data: &MeshData) -> Vec<Tag> {
    let mut out = Vec::new();

    out.push(Tag::integer(VERTEX_COUNT, data.vertices.len() as i64));
    for v in &data.vertices {
        out.push(Tag::point3(VERTEX, *v));
    }

    let face_list_size: usize = data.faces.iter().map(|f| f.len() + 1).sum();
    out.push(Tag::integer(FACE_LIST_SIZE, face_list_size as i64));
    for face in &data.faces {
        out.push(Tag::integer(INDEX, face.len() as i64));
        for &index in face {
            out.push(Tag::integer(INDEX, index as i64));
        }
    }

    out.push(Tag::integer(EDGE_COUNT, data.edges.len() as i64));
    for &(a, b) in &data.edges {
        out.push(Tag::integer(INDEX, a as i64));
        out.push(Tag::integer(INDEX, b as i64));
    }

    out.push(Tag::integer(
        CREASE_COUNT,
        data.edge_crease_values.len() as i64,
    ));
    for &crease in &data.edge_crease_values {
        out.push(Tag::double(CREASE, crease));
    }

    out
}

/// Append the geometry section to the `AcDbSubDMesh` export record
pub(crate) fn append_geometry(records: &mut Vec<(Option<String>, Vec<Tag>)>, data: &MeshData) {
    let tags = geometry_tags(data);
    match records
        .iter_mut()
        .find(|(name, _)| name.as_deref() == Some(ACDB_SUBD_MESH))
    {
        Some((_, record_tags)) => record_tags.extend(tags),
        None => records.push((Some(ACDB_SUBD_MESH.to_string()), tags)),
    }
}
