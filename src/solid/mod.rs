//! `Solid` struct and implementations of the `CSGOps` trait for `Solid`

use crate::errors::ValidationError;
use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::solid::{bsp::Node, polygon::Polygon, vertex::Vertex};
use crate::traits::CSGOps;
use nalgebra::{Matrix4, Point3};
use std::sync::OnceLock;

pub mod bsp;
pub mod canonical;
pub mod connector;
pub mod ops;
pub mod plane;
pub mod polygon;
pub mod retesselate;
pub mod shapes;
pub mod vertex;

/// A closed 3‑D solid stored as its boundary polygons.
///
/// The bounding box is memoized per instance. Every operation that changes
/// geometry builds a new `Solid` (fresh memo, flags recomputed); the only
/// in-place mutation is [`Solid::set_polygons`], which resets both.
#[derive(Clone, Debug)]
pub struct Solid<S: Clone> {
    pub(crate) polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    pub(crate) bounding_box: OnceLock<Aabb>,

    pub(crate) is_canonicalized: bool,
    pub(crate) is_retesselated: bool,
}

/// Which post-passes a boolean runs on its raw BSP output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanOptions {
    pub canonicalize: bool,
    /// Implies `canonicalize`.
    pub retesselate: bool,
}

impl Default for BooleanOptions {
    fn default() -> Self {
        Self {
            canonicalize: true,
            retesselate: true,
        }
    }
}

impl BooleanOptions {
    /// Raw BSP output, no post-processing.
    pub const RAW: Self = Self {
        canonicalize: false,
        retesselate: false,
    };
}

impl<S: Clone + PartialEq> PartialEq for Solid<S> {
    fn eq(&self, other: &Self) -> bool {
        self.is_canonicalized == other.is_canonicalized
            && self.is_retesselated == other.is_retesselated
            && self.polygons == other.polygons
    }
}

impl<S: Clone + Send + Sync + PartialEq> Default for Solid<S> {
    fn default() -> Self {
        <Self as CSGOps>::new()
    }
}

impl<S: Clone + Send + Sync + PartialEq> Solid<S> {
    /// Build a Solid from an existing polygon list. The result is neither
    /// canonicalized nor retesselated, even when `polygons` is empty.
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        Self::from_polygon_vec(polygons.to_vec())
    }

    pub(crate) fn from_polygon_vec(polygons: Vec<Polygon<S>>) -> Self {
        Solid {
            polygons,
            bounding_box: OnceLock::new(),
            is_canonicalized: false,
            is_retesselated: false,
        }
    }

    /// Replace the polygon list, clearing the bounding-box memo and both flags.
    pub fn set_polygons(&mut self, polygons: Vec<Polygon<S>>) {
        self.polygons = polygons;
        self.bounding_box = OnceLock::new();
        self.is_canonicalized = false;
        self.is_retesselated = false;
    }

    pub fn polygons(&self) -> &[Polygon<S>] {
        &self.polygons
    }

    pub fn to_polygons(&self) -> Vec<Polygon<S>> {
        self.polygons.clone()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub const fn is_canonicalized(&self) -> bool {
        self.is_canonicalized
    }

    pub const fn is_retesselated(&self) -> bool {
        self.is_retesselated
    }

    /// Helper to collect all vertices, one per polygon corner.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.iter().copied())
            .collect()
    }

    /// Fan-triangulate every polygon.
    pub fn to_triangles(&self) -> Vec<Polygon<S>> {
        self.polygons.iter().flat_map(|p| p.to_triangles()).collect()
    }

    /// Enclosed volume: signed tetrahedra from the origin to every face
    /// triangle. Zero for the empty solid.
    pub fn volume(&self) -> Real {
        self.polygons.iter().map(|p| p.signed_volume()).sum()
    }

    /// Sum of polygon areas. Zero for the empty solid.
    pub fn area(&self) -> Real {
        self.polygons.iter().map(|p| p.area()).sum()
    }

    /// `[min, max]` corners of the bounding box.
    pub fn bounds(&self) -> [Point3<Real>; 2] {
        let aabb = CSGOps::bounding_box(self);
        [aabb.mins, aabb.maxs]
    }

    /// Tag every polygon with `shared`.
    ///
    /// Geometry is untouched, so canonical form survives; retesselation
    /// groups by tag and has to run again.
    pub fn set_shared(&self, shared: S) -> Solid<S> {
        if self.polygons.is_empty() {
            return self.clone();
        }
        let polygons = self
            .polygons
            .iter()
            .map(|p| Polygon::with_plane(p.vertices.clone(), p.plane.clone(), Some(shared.clone())))
            .collect();
        Solid {
            polygons,
            bounding_box: OnceLock::new(),
            is_canonicalized: self.is_canonicalized,
            is_retesselated: false,
        }
    }

    /// Apply a homogeneous transform to every polygon.
    ///
    /// Positions use `matrix`; vertex and plane normals use its
    /// inverse-transpose. A reflection (negative determinant of the linear
    /// part) reverses every polygon's vertex order so faces keep pointing
    /// outward. The empty solid is returned unchanged.
    ///
    /// ## Errors
    /// [`ValidationError::NonInvertibleMatrix`] for singular or non-finite matrices.
    pub fn try_transform(&self, matrix: &Matrix4<Real>) -> Result<Solid<S>, ValidationError> {
        if self.polygons.is_empty() {
            return Ok(self.clone());
        }
        if matrix.iter().any(|c| !c.is_finite()) {
            return Err(ValidationError::NonInvertibleMatrix);
        }
        let inverse = matrix
            .try_inverse()
            .ok_or(ValidationError::NonInvertibleMatrix)?;
        let normal_matrix = inverse.transpose();
        let reverse = matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0;

        let polygons = self
            .polygons
            .iter()
            .map(|p| p.transform(matrix, &normal_matrix, reverse))
            .collect();
        Ok(Solid::from_polygon_vec(polygons))
    }

    /// Union with explicit post-processing.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    pub fn union_with(&self, other: &Solid<S>, options: BooleanOptions) -> Solid<S> {
        if other.polygons.is_empty() {
            return self.clone();
        }
        if self.polygons.is_empty() {
            return other.clone();
        }

        let polygons = if !CSGOps::bounding_box(self).intersects(&CSGOps::bounding_box(other)) {
            log::debug!("union: disjoint bounds, concatenating");
            let mut polygons = self.polygons.clone();
            polygons.extend_from_slice(&other.polygons);
            polygons
        } else {
            let mut a = Node::from_polygons(&self.polygons);
            let mut b = Node::from_polygons(&other.polygons);

            a.clip_to(&b);
            b.clip_to(&a);
            b.invert();
            b.clip_to(&a);
            b.invert();

            let mut polygons = a.all_polygons();
            polygons.extend(b.all_polygons());
            polygons
        };

        log::debug!(
            "union: {} + {} polygons -> {}",
            self.polygons.len(),
            other.polygons.len(),
            polygons.len()
        );
        Solid::from_polygon_vec(polygons).post_process(options)
    }

    /// Difference with explicit post-processing.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn difference_with(&self, other: &Solid<S>, options: BooleanOptions) -> Solid<S> {
        if other.polygons.is_empty() {
            return self.clone();
        }
        if self.polygons.is_empty() {
            return <Self as CSGOps>::new();
        }
        if !CSGOps::bounding_box(self).intersects(&CSGOps::bounding_box(other)) {
            return self.clone();
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.invert();
        // the kept part of b's surface bounds the cavity and must face into it
        b.invert();

        let mut polygons = a.all_polygons();
        polygons.extend(b.all_polygons());

        log::debug!(
            "difference: {} - {} polygons -> {}",
            self.polygons.len(),
            other.polygons.len(),
            polygons.len()
        );
        Solid::from_polygon_vec(polygons).post_process(options)
    }

    /// Intersection with explicit post-processing.
    ///
    /// ```text
    /// let c = a.intersection(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn intersection_with(&self, other: &Solid<S>, options: BooleanOptions) -> Solid<S> {
        if self.polygons.is_empty()
            || other.polygons.is_empty()
            || !CSGOps::bounding_box(self).intersects(&CSGOps::bounding_box(other))
        {
            return <Self as CSGOps>::new();
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.invert();
        b.invert();

        let mut polygons = a.all_polygons();
        polygons.extend(b.all_polygons());

        log::debug!(
            "intersection: {} & {} polygons -> {}",
            self.polygons.len(),
            other.polygons.len(),
            polygons.len()
        );
        Solid::from_polygon_vec(polygons).post_process(options)
    }

    /// Union of many solids, post-processed once at the end.
    pub fn union_all(solids: &[Solid<S>]) -> Solid<S> {
        let Some((first, rest)) = solids.split_first() else {
            return <Self as CSGOps>::new();
        };
        rest.iter()
            .fold(first.clone(), |acc, solid| acc.union_with(solid, BooleanOptions::RAW))
            .post_process(BooleanOptions::default())
    }

    fn post_process(self, options: BooleanOptions) -> Solid<S> {
        if options.retesselate {
            self.retesselated()
        } else if options.canonicalize {
            self.canonicalized()
        } else {
            self
        }
    }
}

impl<S: Clone + Send + Sync + PartialEq> CSGOps for Solid<S> {
    /// The empty solid: identity for union, canonical and retesselated.
    fn new() -> Self {
        Solid {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
            is_canonicalized: true,
            is_retesselated: true,
        }
    }

    fn union(&self, other: &Solid<S>) -> Solid<S> {
        self.union_with(other, BooleanOptions::default())
    }

    fn difference(&self, other: &Solid<S>) -> Solid<S> {
        self.difference_with(other, BooleanOptions::default())
    }

    fn intersection(&self, other: &Solid<S>) -> Solid<S> {
        self.intersection_with(other, BooleanOptions::default())
    }

    /// `(a - b) ∪ (b - a)`
    fn xor(&self, other: &Solid<S>) -> Solid<S> {
        let a_sub_b = self.difference_with(other, BooleanOptions::RAW);
        let b_sub_a = other.difference_with(self, BooleanOptions::RAW);
        a_sub_b.union(&b_sub_a)
    }

    fn transform(&self, matrix: &Matrix4<Real>) -> Solid<S> {
        match self.try_transform(matrix) {
            Ok(solid) => solid,
            Err(err) => {
                log::warn!("transform skipped: {err}");
                self.clone()
            },
        }
    }

    /// Returns an [`Aabb`] spanning all polygons; `[(0,0,0),(0,0,0)]` when empty.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut polygons = self.polygons.iter();
            let Some(first) = polygons.next() else {
                return Aabb::new(Point3::origin(), Point3::origin());
            };
            polygons.fold(first.bounding_box(), |acc, p| acc.merged(&p.bounding_box()))
        })
    }

    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Flip every polygon: inside becomes outside.
    fn inverse(&self) -> Solid<S> {
        Solid::from_polygon_vec(self.polygons.iter().map(|p| p.flipped()).collect())
    }
}
