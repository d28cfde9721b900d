//! BSP tree node data structure

use crate::solid::plane::Plane;
use crate::solid::polygon::Polygon;

/// A BSP tree node, containing polygons plus optional front/back subtrees
#[derive(Debug)]
pub struct Node<S: Clone> {
    /// Splitting plane for this node *or* **None** for an empty tree.
    pub plane: Option<Plane>,

    /// Subtree of the half‑space the plane normal points into.
    pub front: Option<Box<Node<S>>>,

    /// Subtree of the opposite half‑space.
    pub back: Option<Box<Node<S>>>,

    /// Polygons that lie in `plane` (after the node has been built).
    pub polygons: Vec<Polygon<S>>,
}

impl<S: Clone + Send + Sync> Default for Node<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Send + Sync> Node<S> {
    /// Create a new empty BSP node
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// True for a node that partitions nothing (an empty tree).
    pub const fn is_empty(&self) -> bool {
        self.plane.is_none()
    }

    /// Number of nodes in the tree rooted here.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.front.as_deref());
            stack.extend(node.back.as_deref());
        }
        count
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.front.as_deref().map(|n| (n, level + 1)));
            stack.extend(node.back.as_deref().map(|n| (n, level + 1)));
        }
        deepest
    }
}

// Unlinks children one by one so dropping a degenerate (list-shaped) tree
// never recurses once per level.
impl<S: Clone> Drop for Node<S> {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node<S>>> = Vec::new();
        stack.extend(self.front.take());
        stack.extend(self.back.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.front.take());
            stack.extend(node.back.take());
        }
    }
}
