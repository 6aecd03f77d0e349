//! Integration tests for the MESH entity: edit sessions, optimize and
//! tag round-trips

use tagcad::entities::{new_mesh, EntityData};
use tagcad::error::DxfError;
use tagcad::factory::EntityFactory;
use tagcad::tags::parse_tags;
use tagcad::types::{DxfVersion, Vector3};

fn cube_corners() -> [Vector3; 8] {
    [
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(1.0, 1.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(1.0, 0.0, 1.0),
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(0.0, 1.0, 1.0),
    ]
}

const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [3, 2, 6, 7],
    [0, 3, 7, 4],
];

/// A cube encoded redundantly as 24 vertices across 6 quad faces
/// collapses to the 8 distinct corners; all face indices stay valid.
#[test]
fn test_optimize_cube_scenario() {
    let corners = cube_corners();
    let mut entity = new_mesh();
    {
        let mut session = entity.edit_mesh().unwrap();
        for face in &CUBE_FACES {
            let positions: Vec<Vector3> = face.iter().map(|&i| corners[i]).collect();
            session.add_face(&positions);
        }
        assert_eq!(session.vertex_count(), 24);
        assert_eq!(session.face_count(), 6);
        session.optimize();
        assert_eq!(session.vertex_count(), 8, "doublettes not removed");
        assert_eq!(session.face_count(), 6);
        assert_eq!(session.edge_count(), 0);
    }

    match &entity.data {
        EntityData::Mesh(data) => {
            assert_eq!(data.vertex_count(), 8);
            for face in &data.faces {
                assert_eq!(face.len(), 4);
                let mut sorted = face.clone();
                sorted.sort_unstable();
                sorted.dedup();
                assert_eq!(sorted.len(), 4, "face indices not distinct");
                assert!(face.iter().all(|&i| i < 8), "index out of range");
            }
        }
        _ => unreachable!(),
    }
}

/// optimize applied twice yields the same arrays as applying it once.
#[test]
fn test_optimize_idempotence() {
    let corners = cube_corners();
    let mut entity = new_mesh();
    let mut session = entity.edit_mesh().unwrap();
    for face in &CUBE_FACES {
        let positions: Vec<Vector3> = face.iter().map(|&i| corners[i]).collect();
        session.add_face(&positions);
    }
    session.optimize();
    let vertices = session.vertices.clone();
    let faces = session.faces.clone();
    let edges = session.edges.clone();

    session.optimize();
    assert_eq!(session.vertices, vertices);
    assert_eq!(session.faces, faces);
    assert_eq!(session.edges, edges);
}

/// add_vertex rejects anything but exactly three coordinates.
#[test]
fn test_add_vertex_arity() {
    let mut entity = new_mesh();
    let mut session = entity.edit_mesh().unwrap();
    for coords in [&[0.0, 0.0][..], &[1.0][..], &[0.0, 0.0, 0.0, 0.0][..]] {
        assert!(matches!(
            session.add_vertex(coords),
            Err(DxfError::InvalidValue(_))
        ));
    }
    assert_eq!(session.vertex_count(), 0);
}

/// Only one edit session can be open per mesh at a time; dropping the
/// session commits, and a fresh session sees the committed state.
#[test]
fn test_sequential_sessions_observe_commits() {
    let mut entity = new_mesh();
    {
        let mut session = entity.edit_mesh().unwrap();
        session.add_vertex(&[1.0, 0.0, 0.0]).unwrap();
    }
    {
        let session = entity.edit_mesh().unwrap();
        assert_eq!(session.vertex_count(), 1);
    }
}

/// Edges added through the session carry parallel crease weights.
#[test]
fn test_edges_and_creases_stay_parallel() {
    let mut entity = new_mesh();
    let mut session = entity.edit_mesh().unwrap();
    session.add_edge(Vector3::ZERO, Vector3::UNIT_X);
    session.add_edge(Vector3::ZERO, Vector3::UNIT_Y);
    assert_eq!(session.edges.len(), 2);
    assert_eq!(session.edge_crease_values.len(), 2);
}

/// A mesh entity survives a full construct/export/construct cycle with
/// its geometry intact.
#[test]
fn test_mesh_entity_tag_roundtrip() -> anyhow::Result<()> {
    let mut entity = new_mesh();
    {
        let mut session = entity.edit_mesh()?;
        session.add_face(&[
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ]);
        session.add_edge(Vector3::ZERO, Vector3::new(1.0, 0.0, 0.0));
        session.edge_crease_values[0] = 2.5;
    }
    entity.namespace.set("subdivision_levels", 3i64)?;

    let tags = entity.export_tags(DxfVersion::AC1024);
    let mut factory = EntityFactory::new(DxfVersion::AC1024);
    let reloaded = factory.construct(tags)?;

    assert_eq!(
        reloaded.namespace.get_integer("subdivision_levels"),
        Some(3)
    );
    match (&entity.data, &reloaded.data) {
        (EntityData::Mesh(original), EntityData::Mesh(decoded)) => {
            assert_eq!(original, decoded);
        }
        _ => unreachable!(),
    }
    Ok(())
}

/// Loading a MESH from source tags exposes its geometry to edit sessions.
#[test]
fn test_mesh_loads_geometry_from_tags() {
    let source = concat!(
        "0\nMESH\n",
        "5\n2E2\n",
        "100\nAcDbEntity\n",
        "8\n0\n",
        "100\nAcDbSubDMesh\n",
        "71\n2\n",
        "72\n0\n",
        "91\n0\n",
        "92\n4\n",
        "10\n0.0\n20\n0.0\n30\n0.0\n",
        "10\n1.0\n20\n0.0\n30\n0.0\n",
        "10\n1.0\n20\n1.0\n30\n0.0\n",
        "10\n0.0\n20\n1.0\n30\n0.0\n",
        "93\n5\n",
        "90\n4\n90\n0\n90\n1\n90\n2\n90\n3\n",
        "94\n1\n",
        "90\n0\n90\n1\n",
        "95\n1\n",
        "140\n1.5\n",
    );
    let mut factory = EntityFactory::new(DxfVersion::AC1024);
    let mut entity = factory.construct(parse_tags(source).unwrap()).unwrap();

    let mut session = entity.edit_mesh().unwrap();
    assert_eq!(session.vertex_count(), 4);
    assert_eq!(session.face_count(), 1);
    assert_eq!(session.edges, vec![(0, 1)]);
    assert_eq!(session.edge_crease_values, vec![1.5]);
    session.optimize();
    assert_eq!(session.vertex_count(), 4);
}
