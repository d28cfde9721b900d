//! A minimal 2‑D complex used as the input and output of the extrusion bridge.
//!
//! Geometry is a `geo::MultiPolygon` kept in the default orientation:
//! exterior rings counter-clockwise, holes clockwise. Boundary edges
//! returned by [`Sketch::sides`] therefore always have the interior on
//! their left.

use crate::float_types::{EPSILON, Real};
use geo::{
    Area, BooleanOps, Coord, LineString, MultiPolygon, Orient, Polygon as GeoPolygon,
    TriangulateEarcut, orient::Direction,
};
use nalgebra::Point2;

pub mod placement;
pub mod shapes;

pub use placement::CapPlacement;

#[derive(Debug, Clone, PartialEq)]
pub struct Sketch<S> {
    pub geometry: MultiPolygon<Real>,
    pub shared: Option<S>,
}

impl<S: Clone + Send + Sync> Default for Sketch<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Send + Sync> Sketch<S> {
    /// The empty sketch.
    pub fn new() -> Self {
        Sketch {
            geometry: MultiPolygon::new(Vec::new()),
            shared: None,
        }
    }

    /// Wrap `geometry`, normalizing ring orientation.
    pub fn from_multipolygon(geometry: MultiPolygon<Real>, shared: Option<S>) -> Self {
        Sketch {
            geometry: geometry.orient(Direction::Default),
            shared,
        }
    }

    /// Union of simple polygons given as point rings (either winding).
    ///
    /// Rings with fewer than three points or no area are skipped.
    pub fn from_polygons(polygons: &[Vec<Point2<Real>>], shared: Option<S>) -> Self {
        let mut geometry = MultiPolygon::new(Vec::new());
        for ring in polygons {
            if ring.len() < 3 {
                continue;
            }
            let coords: Vec<Coord<Real>> = ring.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
            let polygon = GeoPolygon::new(LineString::new(coords), Vec::new());
            if polygon.unsigned_area() < EPSILON * EPSILON {
                log::trace!("sketch: skipping zero-area ring");
                continue;
            }
            let polygon = MultiPolygon::new(vec![polygon.orient(Direction::Default)]);
            geometry = if geometry.0.is_empty() {
                polygon
            } else {
                geometry.union(&polygon)
            };
        }
        Self::from_multipolygon(geometry, shared)
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.0.is_empty()
    }

    pub fn union(&self, other: &Sketch<S>) -> Sketch<S> {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        Self::from_multipolygon(self.geometry.union(&other.geometry), self.shared.clone())
    }

    pub fn translate(&self, dx: Real, dy: Real) -> Sketch<S> {
        use geo::Translate;
        Sketch {
            geometry: self.geometry.translate(dx, dy),
            shared: self.shared.clone(),
        }
    }

    pub fn area(&self) -> Real {
        self.geometry.unsigned_area()
    }

    /// Directed boundary edges `[start, end]`, interior on the left.
    pub fn sides(&self) -> Vec<[Point2<Real>; 2]> {
        let mut sides = Vec::new();
        for polygon in &self.geometry.0 {
            for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                for line in ring.lines() {
                    let (a, b) = (line.start, line.end);
                    if (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON {
                        continue;
                    }
                    sides.push([Point2::new(a.x, a.y), Point2::new(b.x, b.y)]);
                }
            }
        }
        sides
    }

    /// Counter-clockwise triangles covering the sketch.
    pub fn triangulate(&self) -> Vec<[Point2<Real>; 3]> {
        let mut triangles = Vec::new();
        for polygon in &self.geometry.0 {
            for triangle in polygon.earcut_triangles() {
                let [a, b, c] = triangle.to_array().map(|c| Point2::new(c.x, c.y));
                let cross = (b - a).perp(&(c - a));
                if cross.abs() < EPSILON * EPSILON {
                    continue;
                }
                triangles.push(if cross > 0.0 { [a, b, c] } else { [a, c, b] });
            }
        }
        triangles
    }
}
