mod support;

use csg_kernel::{
    CSGOps, OrthoNormalBasis, Plane, Solid,
    io::{CompactSolid, SolidObject},
};
use nalgebra::{Matrix4, Point3, Vector3};

fn empty() -> Solid<()> {
    Solid::new()
}

#[test]
fn empty_has_nothing() {
    let solid = empty();
    assert!(solid.is_empty());
    assert_eq!(solid.polygon_count(), 0);
    assert_eq!(solid.volume(), 0.0);
    assert_eq!(solid.area(), 0.0);
    assert_eq!(solid.bounds(), [Point3::origin(), Point3::origin()]);
    assert!(solid.is_canonicalized() && solid.is_retesselated());
}

#[test]
fn from_no_polygons_is_not_post_processed() {
    let solid: Solid<()> = Solid::from_polygons(&[]);
    assert!(solid.is_empty());
    assert!(!solid.is_canonicalized());
    assert!(!solid.is_retesselated());
    assert_ne!(solid, empty());
}

#[test]
fn post_processing_keeps_the_empty_solid() {
    assert_eq!(empty().set_shared(()), empty());
    assert_eq!(empty().canonicalized(), empty());
    assert_eq!(empty().retesselated(), empty());
    assert_eq!(empty().fix_t_junctions(), empty());
}

#[test]
fn transforms_keep_the_empty_solid() {
    let e = empty();
    assert_eq!(e.translate(1.0, 2.0, 3.0), e);
    assert_eq!(e.scale(2.0, 3.0, 4.0), e);
    assert_eq!(e.rotate(10.0, 20.0, 30.0), e);
    assert_eq!(e.rotate_around_axis(&Point3::new(1.0, 0.0, 0.0), &Vector3::y(), 45.0), e);
    assert_eq!(e.mirror(Plane::from_normal(Vector3::new(1.0, 1.0, 0.0), 2.0)), e);
    assert_eq!(e.mirror_x(), e);
    assert_eq!(e.mirror_y(), e);
    assert_eq!(e.mirror_z(), e);
    assert_eq!(e.center(), e);
    assert_eq!(e.float(), e);
    assert_eq!(e.lie_flat(), e);

    let arbitrary = Matrix4::new(
        1.0, 2.0, 0.0, 4.0,
        0.0, 1.0, 3.0, 0.0,
        2.0, 0.0, 1.0, 1.0,
        0.0, 0.0, 0.0, 1.0,
    );
    assert_eq!(e.transform(&arbitrary), e);
    assert_eq!(e.try_transform(&Matrix4::zeros()), Ok(e.clone()));
}

#[test]
fn derived_operations_keep_the_empty_solid() {
    let e = empty();
    assert_eq!(e.expand(2.0, 36), e);
    assert_eq!(e.contract(2.0, 36), e);
    assert_eq!(e.cut_by_plane(&Plane::from_normal(Vector3::z(), 0.0)), e);
    assert_eq!(e.to_point_cloud(0.1), e);
    assert_eq!(
        e.stretch_at_plane(&Vector3::x(), &Point3::origin(), 2.0),
        Ok(e.clone())
    );
    assert_eq!(e.inverse().polygon_count(), 0);
}

#[test]
fn projections_of_the_empty_solid_are_empty() {
    let e = empty();
    let basis = OrthoNormalBasis::z0_plane();
    assert!(e.project_to_orthonormal_basis(&basis).is_empty());
    assert!(e.section_cut(&basis).is_empty());
}

#[test]
fn flat_lying_transforms_are_identity() {
    let (forward, backward) = empty().transformation_and_inverse_to_flat_lying();
    assert_eq!(forward, Matrix4::identity());
    assert_eq!(backward, Matrix4::identity());
    assert_eq!(empty().transformation_to_flat_lying(), Matrix4::identity());
}

#[test]
fn serialized_forms_round_trip() {
    let compact: CompactSolid<()> = empty().to_compact();
    assert_eq!(compact.class, "CSG");
    assert_eq!(compact.num_polygons, 0);
    assert!(compact.num_vertices_per_polygon.is_empty());
    assert!(compact.polygon_plane_indexes.is_empty());
    assert!(compact.polygon_shared_indexes.is_empty());
    assert!(compact.polygon_vertices.is_empty());
    assert!(compact.vertex_data.is_empty());
    assert!(compact.plane_data.is_empty());
    assert!(compact.shared.is_empty());
    assert_eq!(Solid::from_compact(&compact).expect("decode"), empty());

    let object = SolidObject {
        polygons: Vec::new(),
        is_canonicalized: true,
        is_retesselated: true,
    };
    assert_eq!(Solid::from_object(object).expect("decode"), empty());
    assert_eq!(Solid::from_object(empty().to_object()).expect("decode"), empty());
}
