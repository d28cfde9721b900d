mod support;

use csg_kernel::{
    float_types::EPSILON,
    solid::{
        plane::{BACK, COPLANAR, FRONT, Plane, SPANNING},
        polygon::Polygon,
        vertex::Vertex,
    },
};
use nalgebra::{Point3, Vector3};

use crate::support::make_polygon_3d;

#[test]
fn flip() {
    let mut plane = Plane::from_normal(Vector3::y(), 2.0);
    plane.flip();
    assert_eq!(plane.normal(), Vector3::new(0.0, -1.0, 0.0));
    assert_eq!(plane.offset(), -2.0);
}

#[test]
fn from_normal_rescales() {
    let plane = Plane::from_normal(Vector3::new(0.0, 0.0, 2.0), 4.0);
    assert_eq!(plane.normal(), Vector3::z());
    assert_eq!(plane.offset(), 2.0);
}

#[test]
fn collinear_points_have_no_plane() {
    let a = Point3::origin();
    let b = Point3::new(1.0, 1.0, 1.0);
    let c = Point3::new(2.0, 2.0, 2.0);
    assert!(Plane::from_points(&a, &b, &c).is_none());
}

#[test]
fn orient_point_uses_tolerance() {
    let plane = Plane::from_normal(Vector3::z(), 0.0);
    assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, EPSILON * 0.5)), COPLANAR);
    assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, 1.0)), FRONT);
    assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, -1.0)), BACK);
}

#[test]
fn split_polygon() {
    // Define a plane that splits the XY plane at y=0
    let plane = Plane::from_normal(Vector3::new(0.0, 1.0, 0.0), 0.0);

    // A polygon that crosses y=0 line: a square from ( -1, -1 ) to (1, 1 )
    let poly: Polygon<()> = Polygon::new(
        vec![
            Vertex::new(Point3::new(-1.0, -1.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(1.0, -1.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(1.0, 1.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(-1.0, 1.0, 0.0), Vector3::z()),
        ],
        None,
    )
    .expect("valid square");

    assert_eq!(plane.classify_polygon(&poly), SPANNING);
    let (cf, cb, f, b) = plane.split_polygon(&poly);
    assert_eq!(cf.len(), 0);
    assert_eq!(cb.len(), 0);
    assert_eq!(f.len(), 1);
    assert_eq!(b.len(), 1);

    let front_poly = &f[0];
    let back_poly = &b[0];
    assert_eq!(front_poly.vertices.len(), 4);
    assert_eq!(back_poly.vertices.len(), 4);
    for v in &front_poly.vertices {
        assert!(v.pos.y >= -EPSILON);
    }
    for v in &back_poly.vertices {
        assert!(v.pos.y <= EPSILON);
    }
    // fragments keep the source plane
    assert_eq!(front_poly.plane, poly.plane);
    assert!((front_poly.area() + back_poly.area() - poly.area()).abs() < 1e-12);
}

#[test]
fn coplanar_polygons_sort_by_facing() {
    let plane = Plane::from_normal(Vector3::z(), 0.0);
    let up = make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let down = up.flipped();

    let (cf, cb, f, b) = plane.split_polygon(&up);
    assert_eq!((cf.len(), cb.len(), f.len(), b.len()), (1, 0, 0, 0));
    let (cf, cb, f, b) = plane.split_polygon(&down);
    assert_eq!((cf.len(), cb.len(), f.len(), b.len()), (0, 1, 0, 0));
}

#[test]
fn touching_polygon_is_not_split() {
    let plane = Plane::from_normal(Vector3::x(), 0.0);
    // one vertex on the plane, the rest in front
    let tri = make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
    assert_eq!(plane.classify_polygon(&tri), FRONT);
    let (_, _, f, b) = plane.split_polygon(&tri);
    assert_eq!(f.len(), 1);
    assert!(b.is_empty());
}

#[test]
fn sliver_fragments_are_dropped() {
    let plane = Plane::from_normal(Vector3::x(), 0.0);
    // only a tip within tolerance crosses the plane
    let tri = make_polygon_3d(&[[-EPSILON * 2.0, 0.0, 0.0], [1.0, -1.0, 0.0], [1.0, 1.0, 0.0]]);
    let (_, _, f, b) = plane.split_polygon(&tri);
    assert_eq!(f.len(), 1);
    assert!(b.len() <= 1);
    for poly in &b {
        assert!(poly.area() < 1e-8);
    }
}

#[test]
fn mirror_point_reflects() {
    let plane = Plane::from_normal(Vector3::x(), 1.0);
    let mirrored = plane.mirror_point(&Point3::new(3.0, 2.0, -1.0));
    assert!((mirrored - Point3::new(-1.0, 2.0, -1.0)).norm() < 1e-12);
}
