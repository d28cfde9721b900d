//! Struct and functions for working with `Vertex`s from which `Polygon`s are composed.

use crate::float_types::Real;
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A vertex of a polygon, holding position and normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
}

impl Vertex {
    /// Create a new [`Vertex`].
    ///
    /// * `pos`    – the position in model space
    /// * `normal` – (optionally non‑unit) normal; it is **copied verbatim**, so
    ///   orient it the way shading expects.
    ///
    /// Non-finite components are replaced by `0.0`.
    #[inline]
    pub fn new(mut pos: Point3<Real>, mut normal: Vector3<Real>) -> Self {
        // Sanitise position
        for c in pos.coords.iter_mut() {
            if !c.is_finite() {
                *c = 0.0;
            }
        }

        // Sanitise normal
        for c in normal.iter_mut() {
            if !c.is_finite() {
                *c = 0.0;
            }
        }

        Vertex { pos, normal }
    }

    /// Flip vertex normal in place.
    ///
    /// # Example
    /// ```rust
    /// # use nalgebra::{Point3, Vector3};
    /// # use csg_kernel::solid::vertex::Vertex;
    /// let mut v = Vertex::new(Point3::new(1.0, 2.0, 3.0), Vector3::x());
    /// v.flip();
    /// assert_eq!(v.pos, Point3::new(1.0, 2.0, 3.0), "position remains the same");
    /// assert_eq!(v.normal, -Vector3::x(), "the normal is negated");
    /// ```
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Return a copy with the normal negated.
    pub fn flipped(&self) -> Vertex {
        Vertex {
            pos: self.pos,
            normal: -self.normal,
        }
    }

    /// **Mathematical Foundation: Barycentric Linear Interpolation**
    ///
    /// Compute the linear blend between `self` (`t = 0`) and `other` (`t = 1`):
    /// ```text
    /// p(t) = p₀ + t·(p₁ - p₀)
    /// n(t) = n₀ + t·(n₁ - n₀)
    /// ```
    ///
    /// Splitting uses this with `t` at the root of the plane's signed-distance
    /// function along the edge, so the new vertex lies exactly on the plane up
    /// to rounding. Normals are blended linearly and not renormalized.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        let new_pos = self.pos + (other.pos - self.pos) * t;
        let new_normal = self.normal + (other.normal - self.normal) * t;
        Vertex::new(new_pos, new_normal)
    }

    /// Squared Euclidean distance between the two positions.
    pub fn distance_squared_to(&self, other: &Vertex) -> Real {
        (self.pos - other.pos).norm_squared()
    }

    /// Apply a homogeneous transform.
    ///
    /// `normal_matrix` is the inverse-transpose of `matrix`, computed once by
    /// the caller for a whole solid.
    pub fn transform(&self, matrix: &Matrix4<Real>, normal_matrix: &Matrix4<Real>) -> Vertex {
        let pos = matrix.transform_point(&self.pos);
        // linear block only: the bottom row carries the negated translation
        let n = normal_matrix.fixed_view::<3, 3>(0, 0) * self.normal;
        let normal = match n.try_normalize(Real::EPSILON) {
            Some(unit) => unit,
            None => n,
        };
        Vertex::new(pos, normal)
    }
}
