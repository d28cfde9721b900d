//! Snapping near-identical coordinates and planes onto shared representatives.
//!
//! Every value is looked up by its `EPSILON` grid cell (`round(v / EPSILON)`
//! per component). The first value to reach an empty cell becomes the
//! representative and claims all neighbouring cells it could round into
//! (floor/ceil per component), so two values closer than `EPSILON` resolve to
//! the same representative regardless of where the grid lines fall.

use crate::float_types::{EPSILON, Real};
use crate::solid::Solid;
use crate::solid::plane::Plane;
use crate::solid::polygon::Polygon;
use crate::solid::vertex::Vertex;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

/// Fuzzy lookup table from `N` coordinates to a representative value.
#[derive(Debug, Clone)]
pub struct FuzzyFactory<const N: usize, T: Clone> {
    multiplier: Real,
    lookup: HashMap<[i64; N], T>,
}

impl<const N: usize, T: Clone> Default for FuzzyFactory<N, T> {
    fn default() -> Self {
        Self::new(EPSILON)
    }
}

impl<const N: usize, T: Clone> FuzzyFactory<N, T> {
    pub fn new(tolerance: Real) -> Self {
        Self {
            multiplier: 1.0 / tolerance,
            lookup: HashMap::new(),
        }
    }

    /// Representative for `values`, creating one with `create` when the cell is unclaimed.
    ///
    /// Cells already claimed are never reassigned.
    pub fn lookup_or_create(&mut self, values: [Real; N], create: impl FnOnce() -> T) -> T {
        let key = values.map(|v| (v * self.multiplier).round() as i64);
        if let Some(found) = self.lookup.get(&key) {
            return found.clone();
        }

        let item = create();
        let cells = values.map(|v| {
            let scaled = v * self.multiplier;
            [scaled.floor() as i64, scaled.ceil() as i64]
        });
        for mask in 0..(1usize << N) {
            let mut cell = [0i64; N];
            for (i, c) in cell.iter_mut().enumerate() {
                *c = cells[i][(mask >> i) & 1];
            }
            self.lookup.entry(cell).or_insert_with(|| item.clone());
        }
        item
    }

    /// Number of claimed cells.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

/// The three tables used while canonicalizing one solid.
#[derive(Debug, Default)]
pub struct CanonicalTables {
    positions: FuzzyFactory<3, Point3<Real>>,
    normals: FuzzyFactory<3, Vector3<Real>>,
    planes: FuzzyFactory<4, Plane>,
}

impl CanonicalTables {
    pub fn position(&mut self, pos: &Point3<Real>) -> Point3<Real> {
        self.positions.lookup_or_create([pos.x, pos.y, pos.z], || *pos)
    }

    pub fn normal(&mut self, normal: &Vector3<Real>) -> Vector3<Real> {
        self.normals
            .lookup_or_create([normal.x, normal.y, normal.z], || *normal)
    }

    pub fn plane(&mut self, plane: &Plane) -> Plane {
        let n = plane.normal;
        self.planes
            .lookup_or_create([n.x, n.y, n.z, plane.w], || plane.clone())
    }

    /// Canonical copy of `polygon`, or `None` when snapping collapses it
    /// below three distinct vertices.
    pub fn polygon<S: Clone + Send + Sync>(&mut self, polygon: &Polygon<S>) -> Option<Polygon<S>> {
        let plane = self.plane(&polygon.plane);
        let mut vertices: Vec<Vertex> = polygon
            .vertices
            .iter()
            .map(|v| Vertex {
                pos: self.position(&v.pos),
                normal: self.normal(&v.normal),
            })
            .collect();

        vertices.dedup_by(|b, a| a.pos == b.pos);
        while vertices.len() > 1 && vertices[0].pos == vertices[vertices.len() - 1].pos {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return None;
        }
        Some(Polygon::with_plane(vertices, plane, polygon.shared.clone()))
    }
}

impl<S: Clone + Send + Sync + PartialEq> Solid<S> {
    /// Snap every vertex position, vertex normal and polygon plane onto its
    /// `EPSILON`-grid representative and drop polygons that collapse.
    ///
    /// Returns `self` unchanged when it is already canonical.
    pub fn canonicalized(&self) -> Solid<S> {
        if self.is_canonicalized {
            return self.clone();
        }

        let mut tables = CanonicalTables::default();
        let mut polygons = Vec::with_capacity(self.polygons.len());
        for polygon in &self.polygons {
            if let Some(canonical) = tables.polygon(polygon) {
                polygons.push(canonical);
            }
        }

        let dropped = self.polygons.len() - polygons.len();
        if dropped > 0 {
            log::debug!("canonicalize: dropped {dropped} collapsed polygons");
        }

        Solid {
            polygons,
            bounding_box: OnceLock::new(),
            is_canonicalized: true,
            is_retesselated: false,
        }
    }
}
