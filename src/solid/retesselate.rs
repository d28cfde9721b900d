//! Merging coplanar fragments and repairing T-junctions.
//!
//! Both passes work on canonicalized solids, where coincident positions and
//! planes are bit-identical, so adjacency is found with exact comparisons.

use crate::float_types::{EPSILON, Real};
use crate::solid::Solid;
use crate::solid::polygon::{Polygon, is_degenerate};
use crate::solid::vertex::Vertex;
use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use std::sync::OnceLock;

pub(crate) type PositionKey = [u64; 3];
type PlaneKey = [u64; 4];

pub(crate) fn position_key(p: &Point3<Real>) -> PositionKey {
    [p.x.to_bits() as u64, p.y.to_bits() as u64, p.z.to_bits() as u64]
}

fn plane_key<S: Clone>(polygon: &Polygon<S>) -> PlaneKey {
    let n = polygon.plane.normal;
    [
        n.x.to_bits() as u64,
        n.y.to_bits() as u64,
        n.z.to_bits() as u64,
        polygon.plane.w.to_bits() as u64,
    ]
}

impl<S: Clone + Send + Sync + PartialEq> Solid<S> {
    /// Merge coplanar fragments left behind by booleans and make every edge
    /// shared vertex-for-vertex with its neighbours.
    ///
    /// Canonicalizes first. Merging and T-junction repair alternate until
    /// neither changes anything. Returns `self` unchanged when it is already
    /// retesselated.
    pub fn retesselated(&self) -> Solid<S> {
        if self.is_retesselated {
            return self.clone();
        }
        let canonical = self.canonicalized();
        let mut polygons = canonical.polygons;

        // merges shrink the polygon count, repairs only add existing positions
        let max_iterations = polygons.len() + polygons.iter().map(|p| p.vertices.len()).sum::<usize>() + 1;
        let mut converged = false;
        let mut iterations = 0;
        while iterations < max_iterations {
            iterations += 1;
            let (merged, did_merge) = merge_coplanar(polygons);
            let (repaired, did_repair) = insert_t_junction_vertices(merged);
            polygons = repaired;
            if !did_merge && !did_repair {
                converged = true;
                break;
            }
        }
        if converged {
            log::debug!("retesselate: {} polygons after {iterations} passes", polygons.len());
        } else {
            log::warn!("retesselate: stopped after {iterations} passes without converging");
        }

        Solid {
            polygons,
            bounding_box: OnceLock::new(),
            is_canonicalized: true,
            is_retesselated: true,
        }
    }

    /// Only the T-junction repair, on the canonicalized solid.
    pub fn fix_t_junctions(&self) -> Solid<S> {
        if self.is_retesselated {
            return self.clone();
        }
        let canonical = self.canonicalized();
        let (polygons, _) = insert_t_junction_vertices(canonical.polygons);
        Solid {
            polygons,
            bounding_box: OnceLock::new(),
            is_canonicalized: true,
            is_retesselated: false,
        }
    }
}

/// Group by exact plane and shared tag (first-appearance order), then merge
/// neighbours inside each group.
pub(crate) fn merge_coplanar<S: Clone + Send + Sync + PartialEq>(
    polygons: Vec<Polygon<S>>,
) -> (Vec<Polygon<S>>, bool) {
    let mut groups: Vec<Vec<Polygon<S>>> = Vec::new();
    let mut by_plane: HashMap<PlaneKey, Vec<usize>> = HashMap::new();

    for polygon in polygons {
        let candidates = by_plane.entry(plane_key(&polygon)).or_default();
        let existing = candidates
            .iter()
            .copied()
            .find(|&g| groups[g][0].shared == polygon.shared);
        match existing {
            Some(g) => groups[g].push(polygon),
            None => {
                candidates.push(groups.len());
                groups.push(vec![polygon]);
            },
        }
    }

    let mut changed = false;
    let mut result = Vec::new();
    for group in groups {
        let (merged, group_changed) = merge_group(group);
        changed |= group_changed;
        result.extend(merged);
    }
    (result, changed)
}

fn merge_group<S: Clone + Send + Sync>(mut group: Vec<Polygon<S>>) -> (Vec<Polygon<S>>, bool) {
    let mut changed = false;
    let mut i = 0;
    while i < group.len() {
        let mut j = i + 1;
        while j < group.len() {
            if let Some(merged) = try_merge(&group[i], &group[j]) {
                group[i] = merged;
                group.remove(j);
                changed = true;
                j = i + 1;
            } else {
                j += 1;
            }
        }
        i += 1;
    }
    (group, changed)
}

/// Join two coplanar polygons along an edge they traverse in opposite
/// directions, if the result is still convex.
fn try_merge<S: Clone + Send + Sync>(a: &Polygon<S>, b: &Polygon<S>) -> Option<Polygon<S>> {
    let na = a.vertices.len();
    let nb = b.vertices.len();

    let (ia, ib) = (0..na).find_map(|ia| {
        let p = a.vertices[ia].pos;
        let q = a.vertices[(ia + 1) % na].pos;
        (0..nb)
            .find(|&ib| b.vertices[ib].pos == q && b.vertices[(ib + 1) % nb].pos == p)
            .map(|ib| (ia, ib))
    })?;

    // a from the edge's end back round to its start, then b's far side
    let mut vertices: Vec<Vertex> = (1..=na).map(|k| a.vertices[(ia + k) % na]).collect();
    vertices.extend((2..nb).map(|k| b.vertices[(ib + k) % nb]));
    remove_spikes(&mut vertices);

    if vertices.len() < 3 || is_degenerate(&vertices) || !is_convex(&vertices, a) {
        return None;
    }
    Some(Polygon::with_plane(vertices, a.plane.clone(), a.shared.clone()))
}

/// Drop repeated positions and back-and-forth spikes (`p, q, p`), which appear
/// when the joined polygons shared a run of collinear edges.
fn remove_spikes(vertices: &mut Vec<Vertex>) {
    loop {
        let n = vertices.len();
        if n < 3 {
            return;
        }
        let found = (0..n).find_map(|i| {
            let prev = vertices[(i + n - 1) % n].pos;
            let curr = vertices[i].pos;
            let next = vertices[(i + 1) % n].pos;
            if curr == next {
                Some((i, 1))
            } else if prev == next {
                Some((i, 2))
            } else {
                None
            }
        });
        match found {
            Some((i, 1)) => {
                vertices.remove(i);
            },
            Some((i, _)) => {
                // remove the tip and the repeated base that follows it
                let next = (i + 1) % n;
                let (first, second) = if i > next { (i, next) } else { (next, i) };
                vertices.remove(first);
                vertices.remove(second);
            },
            None => return,
        }
    }
}

/// Every turn is left (or straight) with respect to the polygon's plane.
fn is_convex<S: Clone>(vertices: &[Vertex], reference: &Polygon<S>) -> bool {
    let normal = reference.plane.normal;
    let n = vertices.len();
    (0..n).all(|i| {
        let prev = vertices[(i + n - 1) % n].pos;
        let curr = vertices[i].pos;
        let next = vertices[(i + 1) % n].pos;
        let e1 = curr - prev;
        let e2 = next - curr;
        e1.cross(&e2).dot(&normal) >= -EPSILON * e1.norm() * e2.norm()
    })
}

/// Insert, into every edge, each distinct solid vertex lying strictly inside
/// that edge within `EPSILON`, ordered along the edge.
pub(crate) fn insert_t_junction_vertices<S: Clone + Send + Sync>(
    polygons: Vec<Polygon<S>>,
) -> (Vec<Polygon<S>>, bool) {
    let mut seen: HashSet<PositionKey> = HashSet::new();
    let mut positions: Vec<Point3<Real>> = polygons
        .iter()
        .flat_map(|p| p.vertices.iter().map(|v| v.pos))
        .filter(|pos| seen.insert(position_key(pos)))
        .collect();
    positions.sort_by(|a, b| a.x.total_cmp(&b.x));

    let eps2 = EPSILON * EPSILON;
    let mut changed = false;
    let result = polygons
        .into_iter()
        .map(|polygon| {
            let n = polygon.vertices.len();
            let mut vertices = Vec::with_capacity(n);
            let mut inserted = false;
            for i in 0..n {
                let start = polygon.vertices[i];
                let end = polygon.vertices[(i + 1) % n];
                vertices.push(start);

                let dir = end.pos - start.pos;
                let len2 = dir.norm_squared();
                if len2 <= eps2 {
                    continue;
                }
                let lo = start.pos.x.min(end.pos.x) - EPSILON;
                let hi = start.pos.x.max(end.pos.x) + EPSILON;
                let from = positions.partition_point(|p| p.x < lo);

                let mut on_edge: Vec<(Real, Point3<Real>)> = positions[from..]
                    .iter()
                    .take_while(|p| p.x <= hi)
                    .filter_map(|p| {
                        let t = (p - start.pos).dot(&dir) / len2;
                        if t <= 0.0 || t >= 1.0 {
                            return None;
                        }
                        let foot = start.pos + dir * t;
                        let strictly_inside = (p - start.pos).norm_squared() > eps2
                            && (p - end.pos).norm_squared() > eps2;
                        ((p - foot).norm_squared() < eps2 && strictly_inside).then_some((t, *p))
                    })
                    .collect();
                on_edge.sort_by(|a, b| a.0.total_cmp(&b.0));

                for (t, pos) in on_edge {
                    let mut vertex = start.interpolate(&end, t);
                    vertex.pos = pos;
                    vertices.push(vertex);
                    inserted = true;
                }
            }
            if inserted {
                changed = true;
                Polygon::with_plane(vertices, polygon.plane.clone(), polygon.shared.clone())
            } else {
                polygon
            }
        })
        .collect();

    (result, changed)
}
