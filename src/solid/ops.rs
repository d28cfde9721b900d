//! Operations built purely from booleans, transforms and retesselation.

use crate::float_types::{EPSILON, Real, TAU};
use crate::solid::connector::{Connector, OrthoNormalBasis, least_aligned_axis};
use crate::solid::plane::Plane;
use crate::solid::polygon::Polygon;
use crate::solid::retesselate::{PositionKey, position_key};
use crate::solid::vertex::Vertex;
use crate::solid::{BooleanOptions, Solid};
use crate::traits::CSGOps;
use hashbrown::HashMap;
use nalgebra::{Matrix4, Point2, Point3, Translation3, Vector3};

/// A solid edge with the normals of every face touching it.
struct EdgeInfo {
    start: Point3<Real>,
    end: Point3<Real>,
    normals: Vec<Vector3<Real>>,
}

/// A solid vertex with the normals of every face touching it.
struct CornerInfo {
    pos: Point3<Real>,
    normals: Vec<Vector3<Real>>,
}

impl<S: Clone + Send + Sync + PartialEq> Solid<S> {
    /// Keep the part of the solid behind `plane` (opposite its normal).
    ///
    /// Intersects with a prism that has one face on the plane and is large
    /// enough to hold the whole solid.
    pub fn cut_by_plane(&self, plane: &Plane) -> Solid<S> {
        if self.polygons.is_empty() {
            return <Self as CSGOps>::new();
        }
        let plane_center = Point3::from(plane.normal * plane.w);
        let max_distance = self
            .polygons
            .iter()
            .flat_map(|p| p.vertices.iter())
            .map(|v| (v.pos - plane_center).norm_squared())
            .fold(0.0, Real::max)
            .sqrt()
            * 1.01
            + EPSILON;

        let basis = OrthoNormalBasis::new(plane.clone());
        let corners = [
            Point2::new(max_distance, -max_distance),
            Point2::new(-max_distance, -max_distance),
            Point2::new(-max_distance, max_distance),
            Point2::new(max_distance, max_distance),
        ];
        let flipped = plane.flipped();
        let vertices = corners
            .iter()
            .map(|c| Vertex::new(basis.to_3d(c), flipped.normal))
            .collect();
        let face: Polygon<S> = Polygon::with_plane(vertices, flipped, None);
        let prism = Solid::from_polygon_vec(face.extrude(&(plane.normal * -max_distance)));

        self.intersection(&prism)
    }

    /// The volume swept by a ball of `radius` rolling over the surface: a
    /// prism per face, a cylinder per edge and a sphere per vertex, unioned
    /// without post-processing.
    pub fn expanded_shell(&self, radius: Real, resolution: usize) -> Solid<S> {
        self.expanded_shell_onto(<Self as CSGOps>::new(), radius, resolution)
    }

    fn expanded_shell_onto(&self, start: Solid<S>, radius: Real, resolution: usize) -> Solid<S> {
        let solid = self.retesselated();
        let resolution = resolution.max(4);
        let mut result = start;

        for polygon in &solid.polygons {
            let offset = polygon.plane.normal * (2.0 * radius);
            let prism = polygon.translated(&(offset * -0.5)).extrude(&offset);
            result = result.union_with(&Solid::from_polygon_vec(prism), BooleanOptions::RAW);
        }

        let (edges, corners) = solid.edges_and_corners();
        for edge in &edges {
            let cylinder = edge_cylinder(edge, radius, resolution);
            result = result.union_with(&Solid::from_polygon_vec(cylinder), BooleanOptions::RAW);
        }

        for corner in &corners {
            let x = corner.normals[0].normalize();
            let z = corner
                .normals
                .iter()
                .map(|n| (n, x.cross(&n.normalize()).norm()))
                .filter(|(_, len)| *len > 0.05)
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(n, _)| n.normalize())
                .unwrap_or_else(|| least_aligned_axis(&x));
            // right-handed, or the sphere's faces would point inward
            let y = z.cross(&x).normalize();
            let z = x.cross(&y);
            let sphere = Solid::sphere_with_axes(
                &corner.pos,
                radius,
                resolution,
                (resolution / 2).max(2),
                [x, y, z],
                None,
            );
            result = result.union_with(&sphere, BooleanOptions::RAW);
        }

        log::debug!(
            "expanded shell: {} faces, {} edges, {} corners -> {} polygons",
            solid.polygons.len(),
            edges.len(),
            corners.len(),
            result.polygons.len()
        );
        result
    }

    /// Distinct edges and vertices (first-appearance order) with the normals
    /// of the faces touching them.
    fn edges_and_corners(&self) -> (Vec<EdgeInfo>, Vec<CornerInfo>) {
        let mut edges: Vec<EdgeInfo> = Vec::new();
        let mut edge_index: HashMap<(PositionKey, PositionKey), usize> = HashMap::new();
        let mut corners: Vec<CornerInfo> = Vec::new();
        let mut corner_index: HashMap<PositionKey, usize> = HashMap::new();

        for polygon in &self.polygons {
            let normal = polygon.plane.normal;
            for (a, b) in polygon.edges() {
                let (ka, kb) = (position_key(&a.pos), position_key(&b.pos));
                let key = if ka < kb { (ka, kb) } else { (kb, ka) };
                let idx = *edge_index.entry(key).or_insert_with(|| {
                    edges.push(EdgeInfo {
                        start: a.pos,
                        end: b.pos,
                        normals: Vec::new(),
                    });
                    edges.len() - 1
                });
                edges[idx].normals.push(normal);

                let idx = *corner_index.entry(ka).or_insert_with(|| {
                    corners.push(CornerInfo {
                        pos: a.pos,
                        normals: Vec::new(),
                    });
                    corners.len() - 1
                });
                corners[idx].normals.push(normal);
            }
        }
        (edges, corners)
    }

    /// Grow the solid by `radius` in every direction.
    pub fn expand(&self, radius: Real, resolution: usize) -> Solid<S> {
        if self.polygons.is_empty() {
            return self.clone();
        }
        self.expanded_shell_onto(self.retesselated(), radius, resolution)
            .retesselated()
    }

    /// Shrink the solid by `radius` in every direction.
    pub fn contract(&self, radius: Real, resolution: usize) -> Solid<S> {
        if self.polygons.is_empty() {
            return self.clone();
        }
        self.difference(&self.expanded_shell(radius, resolution))
    }

    /// Matrices that lay the solid on one of its faces and back.
    ///
    /// Picks the face plane that gives the lowest z-extent once the face
    /// rests on z = 0 (ties: the face whose normal was closest to −Z), centred
    /// over the origin in x and y. The empty solid gives two identities.
    pub fn transformation_and_inverse_to_flat_lying(&self) -> (Matrix4<Real>, Matrix4<Real>) {
        if self.polygons.is_empty() {
            return (Matrix4::identity(), Matrix4::identity());
        }
        let solid = self.canonicalized();

        let mut planes: Vec<&Plane> = Vec::new();
        for polygon in &solid.polygons {
            if !planes.contains(&&polygon.plane) {
                planes.push(&polygon.plane);
            }
        }

        let z0_x = Connector::new(Point3::origin(), -Vector3::z(), Vector3::x());
        let z0_y = Connector::new(Point3::origin(), -Vector3::z(), Vector3::y());

        let mut best: Option<(Real, Real, Matrix4<Real>, Matrix4<Real>)> = None;
        for plane in planes {
            let point_on_plane = Point3::from(plane.normal * plane.w);
            let use_x = plane.normal.cross(&Vector3::x()).norm()
                > plane.normal.cross(&Vector3::y()).norm();
            let (reference, target) = if use_x {
                (Vector3::x(), &z0_x)
            } else {
                (Vector3::y(), &z0_y)
            };
            let plane_connector = Connector::new(point_on_plane, plane.normal, reference);
            let (Ok(forward), Ok(backward)) = (
                plane_connector.transformation_to(target, false, 0.0),
                target.transformation_to(&plane_connector, false, 0.0),
            ) else {
                continue;
            };

            let (mins, maxs) = transformed_bounds(&solid, &forward);
            let height = maxs.z - mins.z;
            let dot_z = -plane.normal.z;

            let is_better = match &best {
                None => true,
                Some((best_height, best_dot, ..)) => {
                    if (height - best_height).abs() < EPSILON {
                        dot_z > best_dot + EPSILON
                    } else {
                        height < *best_height
                    }
                },
            };
            if is_better {
                let shift = Vector3::new(-0.5 * (maxs.x + mins.x), -0.5 * (maxs.y + mins.y), -mins.z);
                let forward = Translation3::from(shift).to_homogeneous() * forward;
                let backward = backward * Translation3::from(-shift).to_homogeneous();
                best = Some((height, dot_z, forward, backward));
            }
        }

        match best {
            Some((_, _, forward, backward)) => (forward, backward),
            None => (Matrix4::identity(), Matrix4::identity()),
        }
    }

    pub fn transformation_to_flat_lying(&self) -> Matrix4<Real> {
        self.transformation_and_inverse_to_flat_lying().0
    }

    /// Rest the solid on its best face on z = 0; see
    /// [`Solid::transformation_and_inverse_to_flat_lying`].
    pub fn lie_flat(&self) -> Solid<S> {
        CSGOps::transform(self, &self.transformation_to_flat_lying())
    }

    /// Union of axis-aligned cubes of half-size `cube_radius` centred on each point.
    pub fn point_cloud(points: &[Point3<Real>], cube_radius: Real, shared: Option<S>) -> Solid<S> {
        let cubes: Vec<Solid<S>> = points
            .iter()
            .map(|p| {
                Solid::cube(2.0 * cube_radius, shared.clone())
                    .translate_vector(p.coords - Vector3::repeat(cube_radius))
            })
            .collect();
        Solid::union_all(&cubes)
    }

    /// [`Solid::point_cloud`] over the distinct vertex positions of this solid.
    pub fn to_point_cloud(&self, cube_radius: Real) -> Solid<S> {
        if self.polygons.is_empty() {
            return self.clone();
        }
        let mut seen = hashbrown::HashSet::new();
        let points: Vec<Point3<Real>> = self
            .polygons
            .iter()
            .flat_map(|p| p.vertices.iter().map(|v| v.pos))
            .filter(|pos| seen.insert(position_key(pos)))
            .collect();
        Self::point_cloud(&points, cube_radius, None)
    }
}

fn transformed_bounds<S: Clone>(solid: &Solid<S>, matrix: &Matrix4<Real>) -> (Point3<Real>, Point3<Real>) {
    let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
    let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
    for v in solid.polygons.iter().flat_map(|p| p.vertices.iter()) {
        let p = matrix.transform_point(&v.pos);
        mins = mins.inf(&p);
        maxs = maxs.sup(&p);
    }
    (mins, maxs)
}

/// Cylinder around one solid edge. Besides `resolution` evenly spaced
/// facets it gets a facet edge at every face normal touching the edge, so
/// the fill meets those faces flush.
fn edge_cylinder<S: Clone + Send + Sync>(edge: &EdgeInfo, radius: Real, resolution: usize) -> Vec<Polygon<S>> {
    let Some(z) = (edge.end - edge.start).try_normalize(EPSILON) else {
        return Vec::new();
    };
    let x = edge.normals[0].normalize();
    let y = x.cross(&z);

    let mut angles: Vec<Real> = (0..resolution)
        .map(|i| i as Real * TAU / resolution as Real)
        .collect();
    for normal in &edge.normals {
        let (si, co) = (y.dot(normal), x.dot(normal));
        for angle in [si.atan2(co), (-si).atan2(-co)] {
            angles.push(if angle < 0.0 { angle + TAU } else { angle });
        }
    }
    angles.sort_by(|a, b| a.total_cmp(b));

    let mut ring: Vec<Vector3<Real>> = Vec::with_capacity(angles.len());
    for angle in angles {
        let offset = x * (angle.cos() * radius) + y * (angle.sin() * radius);
        if ring.last().is_none_or(|prev| (prev - offset).norm() >= EPSILON) {
            ring.push(offset);
        }
    }
    while ring.len() > 1 && (ring[0] - ring[ring.len() - 1]).norm() < EPSILON {
        ring.pop();
    }
    if ring.len() < 3 {
        return Vec::new();
    }

    let n = ring.len();
    let mut polygons: Vec<Polygon<S>> = Vec::with_capacity(n + 2);
    for i in 0..n {
        let (prev, curr) = (ring[(i + n - 1) % n], ring[i]);
        let side = [edge.end + prev, edge.end + curr, edge.start + curr, edge.start + prev];
        polygons.extend(Polygon::from_points(&side, None).ok());
    }
    let start_face: Vec<Point3<Real>> = ring.iter().map(|o| edge.start + o).collect();
    let end_face: Vec<Point3<Real>> = ring.iter().rev().map(|o| edge.end + o).collect();
    polygons.extend(Polygon::from_points(&start_face, None).ok());
    polygons.extend(Polygon::from_points(&end_face, None).ok());
    polygons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> Solid<()> {
        Solid::cube(1.0, None)
    }

    #[test]
    fn cut_keeps_the_part_behind_the_plane() {
        let cube: Solid<()> = Solid::cube(2.0, None);
        let lower = cube.cut_by_plane(&Plane::from_normal(Vector3::z(), 1.0));
        assert!((lower.volume() - 4.0).abs() < 1e-9);
        let [mins, maxs] = lower.bounds();
        assert!(mins.z.abs() < 1e-9);
        assert!((maxs.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cut_of_empty_is_empty() {
        let empty: Solid<()> = Solid::new();
        assert_eq!(empty.cut_by_plane(&Plane::from_normal(Vector3::x(), 0.0)), empty);
    }

    #[test]
    fn contract_shrinks_a_cube_evenly() {
        let shrunk = unit_cube().contract(0.1, 8);
        assert!((shrunk.volume() - 0.512).abs() < 1e-4);
        let [mins, maxs] = shrunk.bounds();
        assert!((mins.x - 0.1).abs() < 1e-4 && (maxs.z - 0.9).abs() < 1e-4);
    }

    #[test]
    fn expand_grows_bounds_by_radius() {
        let grown = unit_cube().expand(0.1, 8);
        let [mins, maxs] = grown.bounds();
        assert!((mins.x + 0.1).abs() < 1e-4);
        assert!((maxs.y - 1.1).abs() < 1e-4);
        assert!(grown.volume() > 1.0 + 6.0 * 0.1);
        assert!(grown.volume() < 1.2 * 1.2 * 1.2);
        assert!(grown.is_retesselated());
    }

    #[test]
    fn lie_flat_rests_on_thinnest_side() {
        let slab: Solid<()> = Solid::cuboid(3.0, 2.0, 1.0, None).rotate(30.0, 10.0, 0.0);
        let flat = slab.lie_flat();
        let [mins, maxs] = flat.bounds();
        assert!(mins.z.abs() < 1e-9);
        assert!((maxs.z - 1.0).abs() < 1e-9);
        assert!((mins.x + maxs.x).abs() < 1e-9);
        assert!((mins.y + maxs.y).abs() < 1e-9);
    }

    #[test]
    fn flat_lying_transforms_are_inverse() {
        let solid: Solid<()> = Solid::cuboid(1.0, 2.0, 3.0, None).translate(5.0, -1.0, 2.0);
        let (forward, backward) = solid.transformation_and_inverse_to_flat_lying();
        assert!((forward * backward - Matrix4::identity()).norm() < 1e-9);
    }

    #[test]
    fn flat_lying_empty_is_identity() {
        let empty: Solid<()> = Solid::new();
        let (forward, backward) = empty.transformation_and_inverse_to_flat_lying();
        assert_eq!(forward, Matrix4::identity());
        assert_eq!(backward, Matrix4::identity());
    }

    #[test]
    fn point_cloud_has_one_cube_per_vertex() {
        let points = [Point3::origin(), Point3::new(5.0, 0.0, 0.0)];
        let cloud: Solid<()> = Solid::point_cloud(&points, 0.5, None);
        assert!((cloud.volume() - 2.0).abs() < 1e-9);

        let corners = unit_cube().to_point_cloud(0.1);
        assert!((corners.volume() - 8.0 * 0.008).abs() < 1e-9);
    }
}
