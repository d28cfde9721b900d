use csg_kernel::{
    CSGOps, IoError, Solid, ValidationError,
    io::{CompactSolid, SolidObject},
};

fn tagged_part() -> Solid<String> {
    let body = Solid::cube(2.0, Some("body".to_string()));
    let drill = Solid::cylinder(0.5, 4.0, 12, Some("drill".to_string())).translate(1.0, 1.0, -1.0);
    body.difference(&drill)
}

#[test]
fn compact_form_of_a_boolean_result_round_trips() {
    let part = tagged_part();
    let compact = part.to_compact();
    assert_eq!(compact.num_polygons, part.polygon_count());
    assert_eq!(compact.shared.len(), 2);

    let decoded = Solid::from_compact(&compact).expect("decode");
    assert!(decoded.is_canonicalized() && decoded.is_retesselated());
    assert_eq!(decoded.to_compact(), compact);
    assert!((decoded.volume() - part.volume()).abs() < 1e-12);
    for (a, b) in decoded.polygons().iter().zip(part.polygons()) {
        assert_eq!(a.plane, b.plane);
        assert_eq!(a.shared, b.shared);
        // vertex normals are rebuilt from the plane
        assert!(a.vertices.iter().all(|v| v.normal == a.plane.normal()));
    }
}

#[test]
fn compact_json_round_trips() {
    let part = tagged_part();
    let json = part.to_compact_json().expect("encode");
    let back = Solid::<String>::from_compact_json(&json).expect("decode");
    assert_eq!(back.to_compact(), part.to_compact());
}

#[test]
fn object_json_keeps_everything() {
    let part = tagged_part();
    let json = part.to_object_json().expect("encode");
    assert!(json.contains("\"isRetesselated\":true"));
    let back = Solid::<String>::from_object_json(&json).expect("decode");
    assert_eq!(back, part);
}

#[test]
fn inconsistent_tables_are_rejected() {
    let good: CompactSolid<()> = Solid::cube(1.0, None).to_compact();

    let mut short = good.clone();
    short.num_vertices_per_polygon.pop();
    assert!(matches!(
        Solid::from_compact(&short),
        Err(IoError::Validation(ValidationError::Other(_)))
    ));

    let mut bad_plane = good.clone();
    bad_plane.polygon_plane_indexes[0] = 6;
    assert!(matches!(
        Solid::from_compact(&bad_plane),
        Err(IoError::Validation(ValidationError::IndexOutOfRange { table: "plane", .. }))
    ));

    let mut bad_shared = good;
    bad_shared.polygon_shared_indexes[2] = 1;
    assert!(matches!(
        Solid::from_compact(&bad_shared),
        Err(IoError::Validation(ValidationError::IndexOutOfRange { table: "shared", .. }))
    ));
}

#[test]
fn object_with_a_short_polygon_is_rejected() {
    let mut object: SolidObject<()> = Solid::cube(1.0, None).to_object();
    object.polygons[3].vertices.truncate(2);
    assert_eq!(
        Solid::from_object(object),
        Err(ValidationError::TooFewPoints(2))
    );
}
