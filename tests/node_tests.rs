mod support;

use csg_kernel::{
    float_types::{EPSILON, Real},
    solid::{
        bsp::{BalancedSplittingStrategy, Node},
        polygon::Polygon,
    },
};

use crate::support::{approx_eq, make_polygon_3d};

fn square_at(z: Real) -> Polygon<()> {
    make_polygon_3d(&[[0.0, 0.0, z], [1.0, 0.0, z], [1.0, 1.0, z], [0.0, 1.0, z]])
}

#[test]
fn new_and_build() {
    let p = make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let node: Node<()> = Node::from_polygons(&[p.clone()]);
    assert!(node.plane.is_some());
    assert_eq!(node.polygons.len(), 1);
    assert!(node.front.is_none());
    assert!(node.back.is_none());
}

#[test]
fn invert() {
    let p = make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let mut node: Node<()> = Node::from_polygons(&[p.clone()]);
    let original_normal = node.plane.as_ref().map(|pl| pl.normal()).expect("plane");
    node.invert();
    let flipped_normal = node.plane.as_ref().map(|pl| pl.normal()).expect("plane");
    assert!(approx_eq(flipped_normal.z, -original_normal.z, EPSILON));
    assert_eq!(node.polygons.len(), 1);
    assert_eq!(node.polygons[0], p.flipped());
}

#[test]
fn all_polygons_is_node_then_front_then_back() {
    let middle = square_at(0.0);
    let above = square_at(1.0);
    let below = square_at(-1.0);
    let node = Node::from_polygons(&[middle.clone(), below.clone(), above.clone()]);
    assert_eq!(node.all_polygons(), vec![middle, above, below]);
}

#[test]
fn build_is_deterministic() {
    let polygons: Vec<Polygon<()>> = (0..10).map(|i| square_at(i as Real * 0.5 - 2.0)).collect();
    let a = Node::from_polygons(&polygons);
    let b = Node::from_polygons(&polygons);
    assert_eq!(a.all_polygons(), b.all_polygons());
    assert_eq!(a.depth(), b.depth());
}

#[test]
fn clip_polygons_removes_the_inside() {
    // a single upward face: everything below it is inside
    let node = Node::from_polygons(&[square_at(0.0)]);
    let kept = node.clip_polygons(&[square_at(1.0), square_at(-1.0)]);
    assert_eq!(kept, vec![square_at(1.0)]);
}

#[test]
fn clip_to_strips_covered_polygons() {
    let mut a = Node::from_polygons(&[square_at(-1.0), square_at(2.0)]);
    let b = Node::from_polygons(&[square_at(0.0)]);
    a.clip_to(&b);
    assert_eq!(a.all_polygons(), vec![square_at(2.0)]);
}

#[test]
fn balanced_strategy_keeps_every_polygon() {
    let polygons: Vec<Polygon<()>> = (0..9).map(|i| square_at(i as Real)).collect();
    let node = Node::from_polygons_with(&polygons, BalancedSplittingStrategy::default());
    assert_eq!(node.all_polygons().len(), 9);
    assert!(node.depth() < 9);
}
