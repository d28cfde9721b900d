//! Traits defining BSP tree operations for dependency inversion

use crate::float_types::Real;
use crate::solid::bsp::node::Node;
use crate::solid::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::solid::polygon::Polygon;

/// Core BSP operations trait - implements algorithms on BSP nodes
pub trait BspOps<S: Clone + Send + Sync> {
    /// Negate every plane, flip every polygon and swap front/back subtrees,
    /// turning the tree into the complement of the solid it describes.
    fn invert(&self, node: &mut Node<S>);

    /// Return the parts of `polygons` lying in front of the solid described by `node`.
    fn clip_polygons(&self, node: &Node<S>, polygons: &[Polygon<S>]) -> Vec<Polygon<S>>;

    /// Remove all polygons in `node` that are inside the solid described by `other`.
    fn clip_to(&self, node: &mut Node<S>, other: &Node<S>);

    /// Insert `polygons` into the tree rooted at `node`.
    fn build(&self, node: &mut Node<S>, polygons: &[Polygon<S>]);

    /// Collect every polygon stored in the tree.
    fn all_polygons(&self, node: &Node<S>) -> Vec<Polygon<S>>;
}

/// Chooses the partitioning plane of a node from the polygons reaching it.
///
/// Implementations must be deterministic: the same list always yields the
/// same plane, otherwise boolean results stop being reproducible.
pub trait SplittingPlaneStrategy<S: Clone> {
    fn pick_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane;
}

/// The plane of the first polygon. This is the kernel's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPolygonStrategy;

impl<S: Clone> SplittingPlaneStrategy<S> for FirstPolygonStrategy {
    fn pick_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane {
        polygons[0].plane.clone()
    }
}

/// Scores the planes of the first `sample_size` polygons by how many polygons
/// they would split and how unbalanced the halves would be; the lowest score
/// wins, earlier candidates win ties.
///
/// Produces shallower trees on large inputs at the cost of a different
/// fragmentation than [`FirstPolygonStrategy`].
#[derive(Debug, Clone)]
pub struct BalancedSplittingStrategy {
    pub span_weight: Real,
    pub balance_weight: Real,
    pub sample_size: usize,
}

impl Default for BalancedSplittingStrategy {
    fn default() -> Self {
        Self {
            span_weight: 8.0,
            balance_weight: 1.0,
            sample_size: 20,
        }
    }
}

impl<S: Clone> SplittingPlaneStrategy<S> for BalancedSplittingStrategy {
    fn pick_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane {
        let mut best_plane = polygons[0].plane.clone();
        let mut best_score = Real::MAX;

        for candidate in polygons.iter().take(self.sample_size.max(1)) {
            let plane = &candidate.plane;
            let (num_front, num_back, num_spanning) = polygons
                .iter()
                .map(|poly| match plane.classify_polygon(poly) {
                    COPLANAR => (0, 0, 0),
                    FRONT => (1, 0, 0),
                    BACK => (0, 1, 0),
                    _ => (0, 0, 1),
                })
                .fold((0i64, 0i64, 0i64), |acc, x| (acc.0 + x.0, acc.1 + x.1, acc.2 + x.2));

            let score = self.span_weight * num_spanning as Real
                + self.balance_weight * ((num_front - num_back) as Real).abs();

            if score < best_score {
                best_score = score;
                best_plane = plane.clone();
            }
        }

        best_plane
    }
}
