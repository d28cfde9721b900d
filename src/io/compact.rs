//! Flat, index-based encoding of a solid.

use crate::errors::{IoError, ValidationError};
use crate::float_types::Real;
use crate::solid::Solid;
use crate::solid::plane::Plane;
use crate::solid::polygon::Polygon;
use crate::solid::vertex::Vertex;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const COMPACT_CLASS: &str = "CSG";

/// Indexed form: deduplicated position, plane and tag tables plus per-polygon
/// index lists.
///
/// Polygon `i` has `num_vertices_per_polygon[i]` consecutive entries in
/// `polygon_vertices`, each an index into the xyz triples of `vertex_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactSolid<S> {
    pub class: String,
    pub num_polygons: usize,
    pub num_vertices_per_polygon: Vec<usize>,
    pub polygon_plane_indexes: Vec<usize>,
    pub polygon_shared_indexes: Vec<usize>,
    pub polygon_vertices: Vec<usize>,
    pub vertex_data: Vec<Real>,
    /// `nx, ny, nz, w` per plane.
    pub plane_data: Vec<Real>,
    pub shared: Vec<Option<S>>,
}

fn bits(values: &[Real]) -> Vec<u64> {
    values.iter().map(|v| v.to_bits() as u64).collect()
}

fn check_index(table: &'static str, index: usize, len: usize) -> Result<usize, ValidationError> {
    if index < len {
        Ok(index)
    } else {
        Err(ValidationError::IndexOutOfRange { table, index, len })
    }
}

fn check_count(what: &str, expected: usize, got: usize) -> Result<(), ValidationError> {
    if expected == got {
        Ok(())
    } else {
        Err(ValidationError::Other(format!(
            "{what}: expected {expected} entries, got {got}"
        )))
    }
}

impl<S: Clone + Send + Sync + PartialEq> Solid<S> {
    /// Encode the retesselated form, so a decoded solid's post-processing
    /// flags hold.
    pub fn to_compact(&self) -> CompactSolid<S> {
        let solid = self.retesselated();
        let mut vertex_data = Vec::new();
        let mut vertex_index: HashMap<Vec<u64>, usize> = HashMap::new();
        let mut plane_data = Vec::new();
        let mut plane_index: HashMap<Vec<u64>, usize> = HashMap::new();
        let mut shared: Vec<Option<S>> = Vec::new();

        let mut num_vertices_per_polygon = Vec::with_capacity(solid.polygons.len());
        let mut polygon_plane_indexes = Vec::with_capacity(solid.polygons.len());
        let mut polygon_shared_indexes = Vec::with_capacity(solid.polygons.len());
        let mut polygon_vertices = Vec::new();

        for polygon in &solid.polygons {
            num_vertices_per_polygon.push(polygon.vertices.len());

            for vertex in &polygon.vertices {
                let xyz = [vertex.pos.x, vertex.pos.y, vertex.pos.z];
                let idx = *vertex_index.entry(bits(&xyz)).or_insert_with(|| {
                    vertex_data.extend_from_slice(&xyz);
                    vertex_data.len() / 3 - 1
                });
                polygon_vertices.push(idx);
            }

            let n = polygon.plane.normal;
            let plane = [n.x, n.y, n.z, polygon.plane.w];
            let idx = *plane_index.entry(bits(&plane)).or_insert_with(|| {
                plane_data.extend_from_slice(&plane);
                plane_data.len() / 4 - 1
            });
            polygon_plane_indexes.push(idx);

            let idx = match shared.iter().position(|s| *s == polygon.shared) {
                Some(idx) => idx,
                None => {
                    shared.push(polygon.shared.clone());
                    shared.len() - 1
                },
            };
            polygon_shared_indexes.push(idx);
        }

        CompactSolid {
            class: COMPACT_CLASS.to_string(),
            num_polygons: solid.polygons.len(),
            num_vertices_per_polygon,
            polygon_plane_indexes,
            polygon_shared_indexes,
            polygon_vertices,
            vertex_data,
            plane_data,
            shared,
        }
    }

    /// Rebuild a solid from its compact form. Vertex normals are taken from
    /// the polygon planes; the result is marked canonicalized and retesselated.
    ///
    /// ## Errors
    /// [`IoError::UnexpectedClass`] for a foreign `class`, and a
    /// [`ValidationError`] for inconsistent counts, out-of-range indices or
    /// polygons with fewer than three vertices.
    pub fn from_compact(compact: &CompactSolid<S>) -> Result<Solid<S>, IoError> {
        if compact.class != COMPACT_CLASS {
            return Err(IoError::UnexpectedClass(compact.class.clone()));
        }
        let n = compact.num_polygons;
        check_count("numVerticesPerPolygon", n, compact.num_vertices_per_polygon.len())?;
        check_count("polygonPlaneIndexes", n, compact.polygon_plane_indexes.len())?;
        check_count("polygonSharedIndexes", n, compact.polygon_shared_indexes.len())?;
        let total = compact
            .num_vertices_per_polygon
            .iter()
            .try_fold(0usize, |acc, &count| acc.checked_add(count))
            .ok_or_else(|| ValidationError::Other("numVerticesPerPolygon overflows".into()))?;
        check_count("polygonVertices", total, compact.polygon_vertices.len())?;
        if compact.vertex_data.len() % 3 != 0 {
            return Err(ValidationError::Other("vertexData length is not a multiple of 3".into()).into());
        }
        if compact.plane_data.len() % 4 != 0 {
            return Err(ValidationError::Other("planeData length is not a multiple of 4".into()).into());
        }

        let points: Vec<Point3<Real>> = compact
            .vertex_data
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let planes: Vec<Plane> = compact
            .plane_data
            .chunks_exact(4)
            .map(|c| Plane {
                normal: Vector3::new(c[0], c[1], c[2]),
                w: c[3],
            })
            .collect();

        let mut polygons = Vec::with_capacity(n);
        let mut cursor: usize = 0;
        for i in 0..n {
            let count = compact.num_vertices_per_polygon[i];
            if count < 3 {
                return Err(ValidationError::TooFewPoints(count).into());
            }
            let plane = &planes[check_index("plane", compact.polygon_plane_indexes[i], planes.len())?];
            let shared = &compact.shared
                [check_index("shared", compact.polygon_shared_indexes[i], compact.shared.len())?];

            let len = compact.polygon_vertices.len();
            let indices = cursor
                .checked_add(count)
                .and_then(|end| compact.polygon_vertices.get(cursor..end))
                .ok_or(ValidationError::IndexOutOfRange {
                    table: "polygonVertices",
                    index: cursor,
                    len,
                })?;
            let vertices = indices
                .iter()
                .map(|&idx| {
                    let pos = points[check_index("vertex", idx, points.len())?];
                    Ok(Vertex::new(pos, plane.normal))
                })
                .collect::<Result<Vec<_>, ValidationError>>()?;
            cursor += count;

            polygons.push(Polygon::with_plane(vertices, plane.clone(), shared.clone()));
        }

        Ok(Solid {
            polygons,
            bounding_box: OnceLock::new(),
            is_canonicalized: true,
            is_retesselated: true,
        })
    }
}
