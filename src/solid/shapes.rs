//! Primitive solids

use crate::float_types::{PI, Real, TAU};
use crate::solid::Solid;
use crate::solid::plane::Plane;
use crate::solid::polygon::Polygon;
use crate::solid::vertex::Vertex;
use nalgebra::{Point3, Vector3};

impl<S: Clone + Send + Sync + PartialEq> Solid<S> {
    /// Axis-aligned box with one corner at the origin and the opposite one at
    /// `(width, length, height)`.
    ///
    /// ```text
    ///       4-------5
    ///      /|      /|
    ///     7-------6 |
    ///     | 0-----|-1
    ///     |/      |/
    ///     3-------2
    /// ```
    pub fn cuboid(width: Real, length: Real, height: Real, shared: Option<S>) -> Solid<S> {
        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(width, 0.0, 0.0),
            Point3::new(width, length, 0.0),
            Point3::new(0.0, length, 0.0),
            Point3::new(0.0, 0.0, height),
            Point3::new(width, 0.0, height),
            Point3::new(width, length, height),
            Point3::new(0.0, length, height),
        ];

        // counter-clockwise seen from outside
        let faces: [([usize; 4], Vector3<Real>); 6] = [
            ([0, 3, 2, 1], -Vector3::z()),
            ([4, 5, 6, 7], Vector3::z()),
            ([0, 1, 5, 4], -Vector3::y()),
            ([3, 7, 6, 2], Vector3::y()),
            ([0, 4, 7, 3], -Vector3::x()),
            ([1, 2, 6, 5], Vector3::x()),
        ];

        let polygons = faces
            .iter()
            .map(|(indices, normal)| {
                let vertices = indices
                    .iter()
                    .map(|&i| Vertex::new(corners[i], *normal))
                    .collect();
                let plane = Plane::from_normal(*normal, normal.dot(&corners[indices[0]].coords));
                Polygon::with_plane(vertices, plane, shared.clone())
            })
            .collect();

        Solid::from_polygon_vec(polygons)
    }

    pub fn cube(width: Real, shared: Option<S>) -> Solid<S> {
        Self::cuboid(width, width, width, shared)
    }

    /// UV sphere centred at the origin with its poles on the Z axis.
    ///
    /// Fewer than 3 segments or 2 stacks, or a non-positive radius, gives the
    /// empty solid.
    pub fn sphere(radius: Real, segments: usize, stacks: usize, shared: Option<S>) -> Solid<S> {
        Self::sphere_with_axes(
            &Point3::origin(),
            radius,
            segments,
            stacks,
            [Vector3::x(), Vector3::y(), Vector3::z()],
            shared,
        )
    }

    /// UV sphere around `center` in the frame `axes = [x, y, z]` (poles on
    /// `z`, first meridian towards `x`), so its facets can be aligned with
    /// nearby geometry.
    pub fn sphere_with_axes(
        center: &Point3<Real>,
        radius: Real,
        segments: usize,
        stacks: usize,
        axes: [Vector3<Real>; 3],
        shared: Option<S>,
    ) -> Solid<S> {
        if segments < 3 || stacks < 2 || radius <= 0.0 {
            return Solid::from_polygon_vec(Vec::new());
        }
        let [x, y, z] = axes;
        let vertex = |i: usize, j: usize| {
            let theta = TAU * (i % segments) as Real / segments as Real;
            let phi = PI * j as Real / stacks as Real;
            let dir = x * (phi.sin() * theta.cos()) + y * (phi.sin() * theta.sin()) + z * phi.cos();
            Vertex::new(center + dir * radius, dir)
        };

        let mut polygons = Vec::with_capacity(segments * stacks);
        for i in 0..segments {
            for j in 0..stacks {
                let vertices = if j == 0 {
                    vec![vertex(i, 0), vertex(i, 1), vertex(i + 1, 1)]
                } else if j == stacks - 1 {
                    vec![vertex(i, j), vertex(i, stacks), vertex(i + 1, j)]
                } else {
                    vec![vertex(i, j), vertex(i, j + 1), vertex(i + 1, j + 1), vertex(i + 1, j)]
                };
                if let Ok(polygon) = Polygon::new(vertices, shared.clone()) {
                    polygons.push(polygon);
                }
            }
        }
        Solid::from_polygon_vec(polygons)
    }

    /// Cylinder standing on the XY plane, axis along +Z.
    pub fn cylinder(radius: Real, height: Real, segments: usize, shared: Option<S>) -> Solid<S> {
        Self::cylinder_between(
            &Point3::origin(),
            &Point3::new(0.0, 0.0, height),
            radius,
            segments,
            shared,
        )
    }

    /// Cylinder whose axis runs from `start` to `end`.
    pub fn cylinder_between(
        start: &Point3<Real>,
        end: &Point3<Real>,
        radius: Real,
        segments: usize,
        shared: Option<S>,
    ) -> Solid<S> {
        let axis = end - start;
        let Some(z) = axis.try_normalize(Real::EPSILON) else {
            return Solid::from_polygon_vec(Vec::new());
        };
        if segments < 3 || radius <= 0.0 {
            return Solid::from_polygon_vec(Vec::new());
        }
        let x = z.cross(&crate::solid::connector::least_aligned_axis(&z)).normalize();
        let y = z.cross(&x);

        let ring: Vec<Vector3<Real>> = (0..segments)
            .map(|i| {
                let theta = TAU * i as Real / segments as Real;
                x * theta.cos() + y * theta.sin()
            })
            .collect();

        let mut polygons = Vec::with_capacity(segments + 2);
        let bottom: Vec<Vertex> = ring
            .iter()
            .rev()
            .map(|d| Vertex::new(start + d * radius, -z))
            .collect();
        let top: Vec<Vertex> = ring
            .iter()
            .map(|d| Vertex::new(end + d * radius, z))
            .collect();
        polygons.extend(Polygon::new(bottom, shared.clone()).ok());
        polygons.extend(Polygon::new(top, shared.clone()).ok());

        for i in 0..segments {
            let (d0, d1) = (ring[i], ring[(i + 1) % segments]);
            let side = vec![
                Vertex::new(start + d0 * radius, d0),
                Vertex::new(start + d1 * radius, d1),
                Vertex::new(end + d1 * radius, d1),
                Vertex::new(end + d0 * radius, d0),
            ];
            polygons.extend(Polygon::new(side, shared.clone()).ok());
        }
        Solid::from_polygon_vec(polygons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_volume_and_area() {
        let c: Solid<()> = Solid::cuboid(1.0, 2.0, 3.0, None);
        assert_eq!(c.polygon_count(), 6);
        assert!((c.volume() - 6.0).abs() < 1e-12);
        assert!((c.area() - 22.0).abs() < 1e-12);
    }

    #[test]
    fn sphere_faces_point_outward() {
        let s: Solid<()> = Solid::sphere(1.0, 12, 6, None);
        assert_eq!(s.polygon_count(), 72);
        for p in s.polygons() {
            let centroid = p.vertices.iter().fold(Vector3::zeros(), |acc, v| acc + v.pos.coords)
                / p.vertices.len() as Real;
            assert!(p.plane.normal.dot(&centroid) > 0.0);
        }
        assert!(s.volume() > 3.0 && s.volume() < 4.0 * PI / 3.0);
    }

    #[test]
    fn cylinder_volume_is_prism_volume() {
        let c: Solid<()> = Solid::cylinder(1.0, 2.0, 4, None);
        // square cross-section of diagonal 2
        assert!((c.volume() - 4.0).abs() < 1e-9);
    }
}
