//! Binary Space Partitioning (BSP) tree implementation
//!
//! The algorithms live behind [`BspOps`]; the methods on [`Node`] below run
//! them with the default serial implementation and plane strategy.

pub mod node;
pub mod serial;
pub mod traits;

pub use node::Node;
pub use serial::SerialBspOps;
pub use traits::{BalancedSplittingStrategy, BspOps, FirstPolygonStrategy, SplittingPlaneStrategy};

use crate::solid::polygon::Polygon;

impl<S: Clone + Send + Sync> Node<S> {
    /// Creates a new BSP node from polygons
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        let mut node = Self::new();
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    /// Like [`Node::from_polygons`] with a caller-chosen plane strategy.
    pub fn from_polygons_with<SP: SplittingPlaneStrategy<S>>(
        polygons: &[Polygon<S>],
        strategy: SP,
    ) -> Self {
        let mut node = Self::new();
        SerialBspOps::with_strategy(strategy).build(&mut node, polygons);
        node
    }

    /// Convert solid space to empty space and empty space to solid space.
    pub fn invert(&mut self) {
        SerialBspOps::new().invert(self);
    }

    /// Remove the parts of `polygons` that are inside this tree's solid.
    pub fn clip_polygons(&self, polygons: &[Polygon<S>]) -> Vec<Polygon<S>> {
        SerialBspOps::new().clip_polygons(self, polygons)
    }

    /// Remove all polygons in this tree that are inside the other tree's solid.
    pub fn clip_to(&mut self, other: &Node<S>) {
        SerialBspOps::new().clip_to(self, other);
    }

    /// Return all polygons in this BSP tree
    pub fn all_polygons(&self) -> Vec<Polygon<S>> {
        SerialBspOps::new().all_polygons(self)
    }

    /// Insert polygons, creating planes and children as needed.
    pub fn build(&mut self, polygons: &[Polygon<S>]) {
        SerialBspOps::new().build(self, polygons);
    }
}
