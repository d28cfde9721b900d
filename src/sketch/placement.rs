//! Turning a sketch into 3‑D polygons: flat caps and the side walls between
//! two placements of the same outline.

use crate::float_types::Real;
use crate::sketch::Sketch;
use crate::solid::connector::Connector;
use crate::solid::polygon::Polygon;
use nalgebra::{Matrix4, Point2, Point3, Vector3};

/// Where a flat cap goes.
///
/// The sketch's own frame is [`Connector::default`]: origin, axis +Z, normal +Y.
/// A placement moves that frame onto the target. An unflipped cap faces
/// along the target axis.
#[derive(Debug, Clone, PartialEq)]
pub enum CapPlacement {
    /// Target frame at `translation` with axis +Z and the given normal.
    Translation {
        translation: Vector3<Real>,
        normal: Vector3<Real>,
        flipped: bool,
    },
    Connector { connector: Connector, flipped: bool },
}

impl CapPlacement {
    fn connector_and_flip(&self) -> (Connector, bool) {
        match self {
            CapPlacement::Translation {
                translation,
                normal,
                flipped,
            } => (
                Connector::new(Point3::from(*translation), Vector3::z(), *normal),
                *flipped,
            ),
            CapPlacement::Connector { connector, flipped } => (connector.clone(), *flipped),
        }
    }
}

fn lift(matrix: &Matrix4<Real>, p: &Point2<Real>) -> Point3<Real> {
    matrix.transform_point(&Point3::new(p.x, p.y, 0.0))
}

/// Rigid motion from the sketch frame onto `target`, or `None` when the
/// target frame is degenerate.
fn placement_matrix(target: &Connector) -> Option<Matrix4<Real>> {
    match Connector::default().transformation_to(target, false, 0.0) {
        Ok(matrix) => Some(matrix),
        Err(err) => {
            log::debug!("sketch placement skipped: {err}");
            None
        },
    }
}

impl<S: Clone + Send + Sync> Sketch<S> {
    /// Triangulated cap placed in 3‑D.
    pub fn to_plane_polygons(&self, placement: &CapPlacement) -> Vec<Polygon<S>> {
        let (connector, flipped) = placement.connector_and_flip();
        let Some(matrix) = placement_matrix(&connector) else {
            return Vec::new();
        };

        self.triangulate()
            .iter()
            .filter_map(|triangle| {
                let mut points = triangle.map(|p| lift(&matrix, &p));
                if flipped {
                    points.reverse();
                }
                Polygon::from_points(&points, self.shared.clone()).ok()
            })
            .collect()
    }

    /// Two triangles per side joining the outline placed at `from` to the
    /// outline placed at `to`.
    ///
    /// Faces point outward when `to` lies along the `from` axis (or, for a
    /// sweep, when the motion is clockwise about the axis of revolution);
    /// callers flip them otherwise.
    pub fn to_wall_polygons(&self, from: &Connector, to: &Connector) -> Vec<Polygon<S>> {
        let (Some(m0), Some(m1)) = (placement_matrix(from), placement_matrix(to)) else {
            return Vec::new();
        };

        let mut polygons = Vec::new();
        for [a, b] in self.sides() {
            let (a0, b0) = (lift(&m0, &a), lift(&m0, &b));
            let (a1, b1) = (lift(&m1, &a), lift(&m1, &b));
            for triangle in [[a0, b0, b1], [a0, b1, a1]] {
                match Polygon::from_points(&triangle, self.shared.clone()) {
                    Ok(polygon) => polygons.push(polygon),
                    Err(_) => log::trace!("wall: dropped degenerate triangle at {a0}"),
                }
            }
        }
        polygons
    }
}
