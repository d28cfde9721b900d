//! Oriented planes, point classification and polygon splitting.

use crate::float_types::{EPSILON, Real};
use crate::solid::polygon::{Polygon, is_degenerate, remove_duplicate_vertices};
use crate::solid::vertex::Vertex;
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

// Classification bit flags. A polygon's type is the OR of its vertices' types.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane in Hessian normal form: every point `p` on it satisfies `normal · p = w`.
///
/// `normal` is kept at unit length by every constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

/// The four output buckets of [`Plane::split_polygon`]:
/// `(coplanar_front, coplanar_back, front, back)`.
pub type SplitResult<S> = (Vec<Polygon<S>>, Vec<Polygon<S>>, Vec<Polygon<S>>, Vec<Polygon<S>>);

impl Plane {
    /// Build a plane from a (not necessarily unit) normal and the offset measured
    /// in units of that normal. Both are rescaled so the stored normal is unit.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let len = normal.norm();
        if len > 0.0 {
            Plane {
                normal: normal / len,
                w: w / len,
            }
        } else {
            Plane { normal, w }
        }
    }

    /// The plane through `point` with the given normal direction.
    pub fn from_normal_and_point(normal: Vector3<Real>, point: &Point3<Real>) -> Self {
        let n = normal.normalize();
        Plane {
            normal: n,
            w: n.dot(&point.coords),
        }
    }

    /// Plane through three points, normal following the right-hand rule
    /// `(b - a) × (c - a)`. Returns `None` when the triangle has (near) zero area.
    pub fn from_points(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Option<Self> {
        let n = (b - a).cross(&(c - a));
        if n.norm_squared() < EPSILON * EPSILON * EPSILON * EPSILON {
            return None;
        }
        let normal = n.normalize();
        Some(Plane {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    /// Best-fit plane of a polygon's vertices.
    ///
    /// Uses the triangle formed by the longest chord and the vertex farthest
    /// from it, then orients the result to agree with the Newell normal so the
    /// winding decides which side is front. `None` for fewer than three
    /// vertices or when all vertices are (nearly) collinear.
    pub fn from_vertices(vertices: &[Vertex]) -> Option<Self> {
        let n = vertices.len();
        if n < 3 {
            return None;
        }

        let (i0, i1, chord2) = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .map(|(i, j)| (i, j, vertices[i].distance_squared_to(&vertices[j])))
            .max_by(|a, b| a.2.total_cmp(&b.2))?;
        if chord2 < EPSILON * EPSILON {
            return None;
        }

        let p0 = vertices[i0].pos;
        let p1 = vertices[i1].pos;
        let dir = p1 - p0;
        let (i2, _) = vertices
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != i0 && *idx != i1)
            .map(|(idx, v)| (idx, (v.pos - p0).cross(&dir).norm_squared()))
            .max_by(|a, b| a.1.total_cmp(&b.1))?;

        let mut plane = Self::from_points(&p0, &p1, &vertices[i2].pos)?;

        // Newell's method gives the winding-consistent direction
        let reference = newell_normal(vertices);
        if plane.normal.dot(&reference) < 0.0 {
            plane.flip();
        }
        Some(plane)
    }

    #[inline]
    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    #[inline]
    pub const fn offset(&self) -> Real {
        self.w
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn flipped(&self) -> Plane {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// `normal · p - w`: positive in front, negative behind.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as [`FRONT`], [`BACK`] or [`COPLANAR`] within [`EPSILON`].
    #[inline]
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let t = self.signed_distance(point);
        if t < -EPSILON {
            BACK
        } else if t > EPSILON {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// OR of the vertex classifications of `polygon`.
    pub fn classify_polygon<S: Clone>(&self, polygon: &Polygon<S>) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Point where the segment `p1 → p2` crosses the plane.
    ///
    /// Falls back to `p1` when the segment is parallel to the plane.
    pub fn split_line_between_points(&self, p1: &Point3<Real>, p2: &Point3<Real>) -> Point3<Real> {
        let direction = p2 - p1;
        let denom = self.normal.dot(&direction);
        if denom.abs() < Real::EPSILON {
            return *p1;
        }
        let lambda = (self.w - self.normal.dot(&p1.coords)) / denom;
        p1 + direction * lambda.clamp(0.0, 1.0)
    }

    /// Split `polygon` by this plane into `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// A polygon lying in the plane goes to `coplanar_front` when its own normal
    /// points the same way as this plane's, otherwise to `coplanar_back`.
    /// Spanning polygons are cut along the plane: the crossing vertex of every
    /// straddling edge is emitted into both fragments, `FRONT`/`COPLANAR`
    /// vertices feed the front fragment and `BACK`/`COPLANAR` vertices the back
    /// one. Fragments that collapse below three distinct vertices, or to zero
    /// area, are dropped.
    pub fn split_polygon<S: Clone + Send + Sync>(&self, polygon: &Polygon<S>) -> SplitResult<S> {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(count + 1);
                let mut split_back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let type_i = types[i];
                    let type_j = types[j];
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(*vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(*vertex_i);
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        if denom.abs() > Real::EPSILON {
                            let t = (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                            let crossing = vertex_i.interpolate(vertex_j, t);
                            split_front.push(crossing);
                            split_back.push(crossing);
                        }
                    }
                }

                for (mut fragment, bucket) in [(split_front, &mut front), (split_back, &mut back)] {
                    remove_duplicate_vertices(&mut fragment);
                    if fragment.len() >= 3 && !is_degenerate(&fragment) {
                        bucket.push(Polygon::with_plane(
                            fragment,
                            polygon.plane.clone(),
                            polygon.shared.clone(),
                        ));
                    } else {
                        log::trace!("dropping degenerate split fragment ({} vertices)", fragment.len());
                    }
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }

    /// Map the plane through a homogeneous transform.
    ///
    /// The normal goes through `normal_matrix` (the inverse-transpose of
    /// `matrix`) so it stays perpendicular under non-uniform scale; the offset
    /// is recomputed from the image of a point on the plane.
    pub fn transform(&self, matrix: &Matrix4<Real>, normal_matrix: &Matrix4<Real>) -> Plane {
        let point_on_plane = Point3::from(self.normal * self.w);
        let moved = matrix.transform_point(&point_on_plane);
        // linear block only: the bottom row carries the negated translation
        let n = normal_matrix.fixed_view::<3, 3>(0, 0) * self.normal;
        match n.try_normalize(Real::EPSILON) {
            Some(normal) => Plane {
                normal,
                w: normal.dot(&moved.coords),
            },
            None => self.clone(),
        }
    }

    /// Reflection of `point` through the plane.
    pub fn mirror_point(&self, point: &Point3<Real>) -> Point3<Real> {
        point - self.normal * (2.0 * self.signed_distance(point))
    }
}

/// Newell normal of a vertex loop. Its length is twice the polygon area.
pub(crate) fn newell_normal(vertices: &[Vertex]) -> Vector3<Real> {
    vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .fold(Vector3::zeros(), |acc, (curr, next)| acc + curr.pos.coords.cross(&next.pos.coords))
}
