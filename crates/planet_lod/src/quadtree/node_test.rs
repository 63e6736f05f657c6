use super::*;
use crate::quadtree::CubeFace;

fn ctx(transform: &DAffine3) -> SplitContext<'_> {
  SplitContext {
    local_to_world: transform,
    radius: 1000.0,
    origin: DVec3::ZERO,
    min_node_size: 50.0,
    comparator: 1.25,
  }
}

fn root(ctx: &SplitContext<'_>) -> QuadtreeNode {
  QuadtreeNode::new(FaceBounds::centered(ctx.radius), 0, ctx)
}

#[test]
fn test_new_node_is_leaf() {
  let transform = CubeFace::PosZ.local_to_world(1000.0);
  let ctx = ctx(&transform);
  let node = root(&ctx);

  assert!(node.is_leaf());
  assert!(node.children().is_none());
  assert_eq!(node.size, DVec2::splat(2000.0));
  assert_eq!(node.center, DVec2::ZERO);
  assert_eq!(node.node_count(), 1);
}

#[test]
fn test_sphere_center_on_sphere_plus_origin() {
  let transform = CubeFace::PosX.local_to_world(1000.0);
  let mut ctx = ctx(&transform);
  ctx.origin = DVec3::new(10.0, 20.0, 30.0);

  let node = QuadtreeNode::new(
    FaceBounds::new(DVec2::new(200.0, -600.0), DVec2::new(400.0, -400.0)),
    2,
    &ctx,
  );
  let local = node.sphere_center - ctx.origin;
  assert!((local.length() - 1000.0).abs() < 1e-9);
  assert!(local.x > 0.0, "+X face node should sit on +X hemisphere");
}

#[test]
fn test_far_viewer_does_not_split() {
  let transform = CubeFace::PosZ.local_to_world(1000.0);
  let ctx = ctx(&transform);
  let mut node = root(&ctx);

  node.insert(DVec3::new(0.0, 0.0, 1.0e6), &ctx);
  assert!(node.is_leaf());
}

#[test]
fn test_near_viewer_splits_into_quadrants() {
  let transform = CubeFace::PosZ.local_to_world(1000.0);
  let ctx = ctx(&transform);
  let mut node = root(&ctx);

  node.insert(DVec3::new(0.0, 0.0, 1100.0), &ctx);
  let children = node.children().expect("root should split");
  let expected = node.bounds.quadrants();
  for (child, bounds) in children.iter().zip(expected) {
    assert_eq!(child.bounds, bounds);
    assert_eq!(child.depth, 1);
  }
}

/// A node whose halves would fall below the floor never splits.
#[test]
fn test_floor_blocks_split() {
  let transform = CubeFace::PosZ.local_to_world(1000.0);
  let ctx = ctx(&transform);
  let mut node = QuadtreeNode::new(
    FaceBounds::new(DVec2::ZERO, DVec2::splat(90.0)),
    5,
    &ctx,
  );

  node.insert(node.sphere_center, &ctx);
  assert!(node.is_leaf(), "90 / 2 < 50, must not split");
}

#[test]
fn test_insert_keeps_existing_children() {
  let transform = CubeFace::PosZ.local_to_world(1000.0);
  let ctx = ctx(&transform);
  let mut node = root(&ctx);

  node.insert(DVec3::new(0.0, 0.0, 1100.0), &ctx);
  let before = node.node_count();
  // Far insert in the same pass must not merge anything.
  node.insert(DVec3::new(0.0, 0.0, 1.0e6), &ctx);
  assert_eq!(node.node_count(), before);
}

#[test]
fn test_collect_leaves_only_childless() {
  let transform = CubeFace::PosZ.local_to_world(1000.0);
  let ctx = ctx(&transform);
  let mut node = root(&ctx);
  node.insert(DVec3::new(0.0, 0.0, 1050.0), &ctx);

  let mut leaves = Vec::new();
  node.collect_leaves(&mut leaves);

  assert!(leaves.len() > 4);
  assert!(leaves.iter().all(|leaf| leaf.is_leaf()));

  // Leaves tile the face exactly.
  let area: f64 = leaves.iter().map(|leaf| leaf.size.x * leaf.size.y).sum();
  assert!((area - 2000.0 * 2000.0).abs() < 1e-6);
}
