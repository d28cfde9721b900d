//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use csg_kernel::{
    float_types::Real,
    solid::{Solid, polygon::Polygon, vertex::Vertex},
};
use nalgebra::{Point3, Vector3};

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// for a set of polygons.
pub fn bounding_box(polygons: &[Polygon<()>]) -> [Real; 6] {
    let mut min = [Real::MAX; 3];
    let mut max = [Real::MIN; 3];

    for poly in polygons {
        for v in &poly.vertices {
            for (axis, c) in v.pos.coords.iter().enumerate() {
                min[axis] = min[axis].min(*c);
                max[axis] = max[axis].max(*c);
            }
        }
    }

    [min[0], min[1], min[2], max[0], max[1], max[2]]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon<()> {
    let verts = points
        .iter()
        .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
        .collect();
    Polygon::new(verts, None).expect("test polygon must be valid")
}

/// Axis-aligned box spanning `min..max`.
pub fn block(min: [Real; 3], max: [Real; 3]) -> Solid<()> {
    use csg_kernel::CSGOps;
    Solid::cuboid(max[0] - min[0], max[1] - min[1], max[2] - min[2], None)
        .translate(min[0], min[1], min[2])
}

/// Every edge of the solid is matched by an edge running the other way.
pub fn is_watertight(solid: &Solid<()>) -> bool {
    use std::collections::HashMap;
    let key = |p: &Point3<Real>| (p.x.to_bits(), p.y.to_bits(), p.z.to_bits());
    let mut balance: HashMap<_, i32> = HashMap::new();
    for polygon in solid.polygons() {
        for (a, b) in polygon.edges() {
            *balance.entry((key(&a.pos), key(&b.pos))).or_default() += 1;
            *balance.entry((key(&b.pos), key(&a.pos))).or_default() -= 1;
        }
    }
    balance.values().all(|&v| v == 0)
}
