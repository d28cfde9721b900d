//! Struct and functions for working with planar `Polygon`s without holes

use crate::errors::ValidationError;
use crate::float_types::{
    EPSILON, Real,
    parry3d::bounding_volume::Aabb,
};
use crate::solid::plane::{Plane, newell_normal};
use crate::solid::vertex::Vertex;
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A convex, planar polygon with a cached plane and an optional shared tag.
///
/// Vertex order is counter-clockwise when viewed from the side the plane
/// normal points to; that side is the outside of the solid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon<S: Clone> {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,

    /// Opaque tag (colour, material, ...) carried unchanged through splitting.
    pub shared: Option<S>,

    /// Lazily‑computed bounding box that spans `vertices`.
    #[serde(skip)]
    pub bounding_box: OnceLock<Aabb>,
}

impl<S: Clone + PartialEq> PartialEq for Polygon<S> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
            && self.plane == other.plane
            && self.shared == other.shared
    }
}

impl<S: Clone + Send + Sync> Polygon<S> {
    /// Create a polygon from caller-supplied vertices, deriving its plane.
    ///
    /// ## Errors
    /// Fewer than three vertices, a non-finite coordinate, or vertices that do
    /// not span a plane.
    pub fn new(vertices: Vec<Vertex>, shared: Option<S>) -> Result<Self, ValidationError> {
        if vertices.len() < 3 {
            return Err(ValidationError::TooFewPoints(vertices.len()));
        }
        if let Some(bad) = vertices
            .iter()
            .find(|v| v.pos.coords.iter().any(|c| !c.is_finite()))
        {
            return Err(ValidationError::InvalidCoordinate(bad.pos));
        }
        let plane = Plane::from_vertices(&vertices)
            .ok_or(ValidationError::DegeneratePolygon(vertices[0].pos))?;
        Ok(Self::with_plane(vertices, plane, shared))
    }

    /// Build a polygon from bare positions; every vertex normal is the plane normal.
    pub fn from_points(points: &[Point3<Real>], shared: Option<S>) -> Result<Self, ValidationError> {
        let vertices: Vec<Vertex> = points
            .iter()
            .map(|p| Vertex::new(*p, Vector3::zeros()))
            .collect();
        let mut polygon = Self::new(vertices, shared)?;
        polygon.set_new_normal();
        Ok(polygon)
    }

    /// Create a polygon whose plane is already known (splitting, canonicalization, decoding).
    pub fn with_plane(vertices: Vec<Vertex>, plane: Plane, shared: Option<S>) -> Self {
        Polygon {
            vertices,
            plane,
            shared,
            bounding_box: OnceLock::new(),
        }
    }

    /// Axis aligned bounding box of this polygon (cached after first call).
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins = mins.inf(&v.pos);
                maxs = maxs.sup(&v.pos);
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Reverse winding order, flip vertex normals and the plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    pub fn flipped(&self) -> Self {
        let mut polygon = self.clone();
        polygon.flip();
        polygon
    }

    /// Iterate over the directed edges `(v[i], v[i+1])`, wrapping around.
    pub fn edges(&self) -> impl Iterator<Item = (&Vertex, &Vertex)> {
        self.vertices.iter().zip(self.vertices.iter().cycle().skip(1))
    }

    /// Fan triangulation from the first vertex. Polygons in a solid are convex.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        let v0 = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(|pair| [v0, pair[0], pair[1]])
            .collect()
    }

    /// Triangles as polygons sharing this polygon's plane and tag.
    pub fn to_triangles(&self) -> Vec<Polygon<S>> {
        self.triangulate()
            .into_iter()
            .map(|tri| Polygon::with_plane(tri.to_vec(), self.plane.clone(), self.shared.clone()))
            .collect()
    }

    /// Surface area (half the length of the Newell normal).
    pub fn area(&self) -> Real {
        0.5 * newell_normal(&self.vertices).norm()
    }

    /// Signed volume of the tetrahedra spanned by the origin and the fan
    /// triangles of this polygon. Summed over a closed solid this is its volume.
    pub fn signed_volume(&self) -> Real {
        self.triangulate()
            .iter()
            .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)) / 6.0)
            .sum()
    }

    /// Recompute the plane from the vertices and give every vertex the plane normal.
    pub fn set_new_normal(&mut self) {
        if let Some(plane) = Plane::from_vertices(&self.vertices) {
            self.plane = plane;
        }
        for v in &mut self.vertices {
            v.normal = self.plane.normal;
        }
    }

    pub fn translated(&self, offset: &Vector3<Real>) -> Self {
        let vertices = self
            .vertices
            .iter()
            .map(|v| Vertex::new(v.pos + offset, v.normal))
            .collect();
        let plane = Plane {
            normal: self.plane.normal,
            w: self.plane.w + self.plane.normal.dot(offset),
        };
        Polygon::with_plane(vertices, plane, self.shared.clone())
    }

    /// Apply a homogeneous transform.
    ///
    /// `reverse` must be set for orientation-reversing matrices (negative
    /// determinant): the vertex order is reversed so the winding keeps matching
    /// the transformed plane normal.
    pub fn transform(
        &self,
        matrix: &Matrix4<Real>,
        normal_matrix: &Matrix4<Real>,
        reverse: bool,
    ) -> Self {
        let mut vertices: Vec<Vertex> = self
            .vertices
            .iter()
            .map(|v| v.transform(matrix, normal_matrix))
            .collect();
        if reverse {
            vertices.reverse();
        }
        Polygon::with_plane(
            vertices,
            self.plane.transform(matrix, normal_matrix),
            self.shared.clone(),
        )
    }

    /// Sweep this polygon along `offset` into a closed prism.
    ///
    /// The returned polygons are a bottom cap, a top cap and one wall per edge,
    /// all facing outward. An offset parallel to the polygon yields nothing.
    pub fn extrude(&self, offset: &Vector3<Real>) -> Vec<Polygon<S>> {
        let along = self.plane.normal.dot(offset);
        if along.abs() < EPSILON {
            return Vec::new();
        }
        // base faces along the offset
        let base = if along > 0.0 {
            self.clone()
        } else {
            self.flipped()
        };

        let mut polygons = Vec::with_capacity(base.vertices.len() + 2);
        polygons.push(base.flipped());
        polygons.push(base.translated(offset));
        for (a, b) in base.edges() {
            let wall = [a.pos, b.pos, b.pos + offset, a.pos + offset];
            if let Ok(polygon) = Polygon::from_points(&wall, base.shared.clone()) {
                polygons.push(polygon);
            }
        }
        polygons
    }
}

/// Remove consecutive vertices closer than [`EPSILON`], including the pair
/// formed by the last and the first vertex.
pub(crate) fn remove_duplicate_vertices(vertices: &mut Vec<Vertex>) {
    let eps2 = EPSILON * EPSILON;
    vertices.dedup_by(|b, a| a.distance_squared_to(b) < eps2);
    while vertices.len() > 1 {
        let (first, last) = (vertices[0], vertices[vertices.len() - 1]);
        if first.distance_squared_to(&last) < eps2 {
            vertices.pop();
        } else {
            break;
        }
    }
}

/// True when the loop encloses (near) zero area.
pub(crate) fn is_degenerate(vertices: &[Vertex]) -> bool {
    newell_normal(vertices).norm() < EPSILON * EPSILON
}
