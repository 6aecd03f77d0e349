//! Property-based tests for round-trip stability and mesh optimization

use proptest::prelude::*;
use tagcad::entities::MeshData;
use tagcad::factory::EntityFactory;
use tagcad::types::{DxfVersion, Vector3};

fn arb_vertex() -> impl Strategy<Value = Vector3> {
    // A small coordinate pool guarantees duplicates
    (0..4i32, 0..4i32, 0..4i32)
        .prop_map(|(x, y, z)| Vector3::new(x as f64, y as f64, z as f64))
}

fn arb_mesh() -> impl Strategy<Value = MeshData> {
    (
        proptest::collection::vec(arb_vertex(), 0..40),
        proptest::collection::vec(proptest::collection::vec(0..40usize, 3..6), 0..12),
        proptest::collection::vec((0..40usize, 0..40usize), 0..12),
    )
        .prop_map(|(vertices, faces, edges)| {
            let creases = vec![0.0; edges.len()];
            MeshData {
                vertices,
                faces,
                edges,
                edge_crease_values: creases,
            }
        })
}

proptest! {
    /// optimize is idempotent for arbitrary meshes, including ones with
    /// out-of-range indices in their face and edge lists.
    #[test]
    fn optimize_is_idempotent(mut mesh in arb_mesh()) {
        mesh.optimize();
        let once = mesh.clone();
        mesh.optimize();
        prop_assert_eq!(mesh, once);
    }

    /// After optimize every face and edge index references a valid
    /// vertex, faces keep at least 3 distinct indices and the crease
    /// sequence stays parallel to the edges.
    #[test]
    fn optimize_leaves_valid_indices(mut mesh in arb_mesh()) {
        mesh.optimize();
        let n = mesh.vertices.len();
        for face in &mesh.faces {
            prop_assert!(face.iter().all(|&i| i < n));
            let mut distinct = face.clone();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert!(distinct.len() >= 3);
        }
        for &(a, b) in &mesh.edges {
            prop_assert!(a < n && b < n);
            prop_assert!(a != b);
        }
        prop_assert_eq!(mesh.edges.len(), mesh.edge_crease_values.len());
    }

    /// Load/export/load of a POINT is a fixed point for arbitrary
    /// coordinates and layer names.
    #[test]
    fn point_roundtrip_is_stable(
        x in -1e6..1e6f64,
        y in -1e6..1e6f64,
        z in -1e6..1e6f64,
        layer in "[A-Za-z][A-Za-z0-9_]{0,12}",
    ) {
        let source = format!(
            "0\nPOINT\n100\nAcDbEntity\n8\n{}\n100\nAcDbPoint\n10\n{}\n20\n{}\n30\n{}\n",
            layer, x, y, z
        );
        let mut factory = EntityFactory::new(DxfVersion::AC1032);
        let entity = factory
            .construct(tagcad::tags::parse_tags(&source).unwrap())
            .unwrap();
        let exported = entity.export_tags(DxfVersion::AC1032);

        let reloaded = factory.construct(exported.clone()).unwrap();
        prop_assert_eq!(
            entity.namespace.get_point3("location"),
            reloaded.namespace.get_point3("location")
        );
        prop_assert_eq!(entity.namespace.get_text("layer"), Some(layer.as_str()));
        prop_assert_eq!(exported, reloaded.export_tags(DxfVersion::AC1032));
    }
}
