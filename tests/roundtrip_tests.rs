//! Integration tests for load/export round-trips and revision branching

use tagcad::factory::EntityFactory;
use tagcad::tags::{parse_tags, Tag};
use tagcad::types::{DxfVersion, Vector3};

const MODERN_POINT: &str = concat!(
    "0\nPOINT\n",
    "5\n2E2\n",
    "330\n1F\n",
    "100\nAcDbEntity\n",
    "8\nWalls\n",
    "62\n3\n",
    "100\nAcDbPoint\n",
    "10\n1.0\n20\n2.0\n30\n3.0\n",
    "50\n0.5\n",
);

const LEGACY_POINT: &str = concat!(
    "0\nPOINT\n",
    "8\nWalls\n",
    "62\n3\n",
    "10\n1.0\n20\n2.0\n30\n3.0\n",
    "50\n0.5\n",
);

/// Loading then exporting with no intervening mutation reproduces the
/// source tags for everything present in source and omits untouched
/// defaults.
#[test]
fn test_point_roundtrip_reproduces_source() {
    let mut factory = EntityFactory::new(DxfVersion::AC1015);
    let source = parse_tags(MODERN_POINT).unwrap();
    let entity = factory.construct(source.clone()).unwrap();

    let exported = entity.export_tags(DxfVersion::AC1015);
    for tag in &source {
        assert!(
            exported.contains(tag),
            "source tag {} missing from export",
            tag
        );
    }
    // Untouched optional defaults are suppressed: linetype (6),
    // linetype_scale (48), thickness (39) never appear.
    for code in [6, 48, 39] {
        assert!(
            exported.iter().all(|t| t.code != code),
            "untouched default with code {} was exported",
            code
        );
    }
}

/// A second round-trip of the exported tags is a fixed point.
#[test]
fn test_roundtrip_is_stable() {
    let mut factory = EntityFactory::new(DxfVersion::AC1015);
    let entity = factory.construct(parse_tags(MODERN_POINT).unwrap()).unwrap();
    let first = entity.export_tags(DxfVersion::AC1015);

    let entity2 = factory.construct(first.clone()).unwrap();
    let second = entity2.export_tags(DxfVersion::AC1015);
    assert_eq!(first, second);
}

/// Mutating an attribute after load makes it part of the export even if
/// it was absent from source.
#[test]
fn test_mutated_attribute_is_exported() -> anyhow::Result<()> {
    let mut factory = EntityFactory::new(DxfVersion::AC1015);
    let mut entity = factory.construct(parse_tags(MODERN_POINT)?)?;

    entity.namespace.set("thickness", 4.0)?;
    let exported = entity.export_tags(DxfVersion::AC1015);
    assert!(exported.contains(&Tag::double(39, 4.0)));
    Ok(())
}

/// The same logical attribute set loads identically under the legacy
/// (unmarked) revision and a marker-delimited revision, despite the
/// different tag shapes.
#[test]
fn test_revision_branching_yields_identical_namespaces() {
    let mut legacy_factory = EntityFactory::new(DxfVersion::AC1009);
    let mut modern_factory = EntityFactory::new(DxfVersion::AC1015);

    let legacy = legacy_factory
        .construct(parse_tags(LEGACY_POINT).unwrap())
        .unwrap();
    let modern = modern_factory
        .construct(parse_tags(MODERN_POINT).unwrap())
        .unwrap();

    for name in ["layer", "color", "location", "angle"] {
        assert_eq!(
            legacy.namespace.get(name),
            modern.namespace.get(name),
            "attribute '{}' differs between revisions",
            name
        );
    }
    assert_eq!(
        legacy.namespace.get_point3("location"),
        Some(Vector3::new(1.0, 2.0, 3.0))
    );
}

/// Legacy export carries no sub-record markers, no handle and no owner.
#[test]
fn test_legacy_export_shape() {
    let mut factory = EntityFactory::new(DxfVersion::AC1009);
    let entity = factory.construct(parse_tags(LEGACY_POINT).unwrap()).unwrap();
    let exported = entity.export_tags(DxfVersion::AC1009);

    assert!(exported.iter().all(|t| t.code != 100));
    assert!(exported.iter().all(|t| t.code != 5));
    assert_eq!(exported[0], Tag::text(0, "POINT"));
}

/// Handle and owner survive a modern round-trip.
#[test]
fn test_handle_and_owner_roundtrip() {
    let mut factory = EntityFactory::new(DxfVersion::AC1015);
    let entity = factory.construct(parse_tags(MODERN_POINT).unwrap()).unwrap();
    assert_eq!(entity.handle.map(|h| h.value()), Some(0x2E2));
    assert_eq!(entity.owner.map(|h| h.value()), Some(0x1F));

    let exported = entity.export_tags(DxfVersion::AC1015);
    assert!(exported.contains(&Tag::text(5, "2E2")));
    assert!(exported.contains(&Tag::text(330, "1F")));
}

/// Extended data is kept verbatim and re-emitted after everything else.
#[test]
fn test_xdata_roundtrip() {
    let source = format!("{}1001\nACAD\n1000\napp data\n", MODERN_POINT);
    let mut factory = EntityFactory::new(DxfVersion::AC1015);
    let entity = factory.construct(parse_tags(&source).unwrap()).unwrap();
    assert_eq!(entity.xdata.len(), 2);

    let exported = entity.export_tags(DxfVersion::AC1015);
    let n = exported.len();
    assert_eq!(exported[n - 2], Tag::text(1001, "ACAD"));
    assert_eq!(exported[n - 1], Tag::text(1000, "app data"));
}

/// Tags from a future revision survive load and export unchanged.
#[test]
fn test_unknown_tags_survive_roundtrip() {
    let source = concat!(
        "0\nPOINT\n",
        "100\nAcDbPoint\n",
        "10\n1.0\n20\n2.0\n30\n3.0\n",
        "469\n1.25\n",
        "100\nAcDbFuturePoint\n",
        "280\n7\n",
    );
    let mut factory = EntityFactory::new(DxfVersion::AC1032);
    let entity = factory.construct(parse_tags(source).unwrap()).unwrap();
    assert_eq!(entity.residue.tag_count(), 2);

    let exported = entity.export_tags(DxfVersion::AC1032);
    assert!(exported.contains(&Tag::double(469, 1.25)));
    assert!(exported.contains(&Tag::text(100, "AcDbFuturePoint")));
    assert!(exported.contains(&Tag::integer(280, 7)));
}
