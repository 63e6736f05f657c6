//! QuadtreeNode - one rectangle of a cube face, owning its subtree.

use glam::{DAffine3, DVec2, DVec3};

use super::FaceBounds;
use crate::math::project_to_sphere;

/// Shared per-tree inputs needed while subdividing.
#[derive(Clone, Copy, Debug)]
pub struct SplitContext<'a> {
  pub local_to_world: &'a DAffine3,
  pub radius: f64,
  pub origin: DVec3,
  pub min_node_size: f64,
  pub comparator: f64,
}

/// Quadtree node.
///
/// A node is a leaf iff it has no children. Children are exclusively owned.
#[derive(Clone, Debug)]
pub struct QuadtreeNode {
  /// Face-local rectangle.
  pub bounds: FaceBounds,
  /// Rectangle center.
  pub center: DVec2,
  /// Rectangle extent.
  pub size: DVec2,
  /// Center projected onto the sphere, world space. Distance checks only.
  pub sphere_center: DVec3,
  /// 0 for the face root.
  pub depth: u8,
  children: Option<Box<[QuadtreeNode; 4]>>,
}

impl QuadtreeNode {
  pub fn new(bounds: FaceBounds, depth: u8, ctx: &SplitContext<'_>) -> Self {
    let center = bounds.center();
    let sphere_center = project_to_sphere(ctx.local_to_world, center, ctx.radius) + ctx.origin;
    Self {
      bounds,
      center,
      size: bounds.size(),
      sphere_center,
      depth,
      children: None,
    }
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_none()
  }

  /// Children in bottom-left, bottom-right, top-left, top-right order.
  pub fn children(&self) -> Option<&[QuadtreeNode; 4]> {
    self.children.as_deref()
  }

  #[inline]
  pub fn distance_to(&self, point: DVec3) -> f64 {
    self.sphere_center.distance(point)
  }

  /// Split predicate: close enough, and halving would not cross the floor.
  #[inline]
  pub fn should_split(&self, viewer: DVec3, ctx: &SplitContext<'_>) -> bool {
    self.distance_to(viewer) < self.size.x * ctx.comparator
      && self.size.x * 0.5 >= ctx.min_node_size
  }

  /// Evaluate the split predicate against `viewer`, recursing depth-first
  /// into any children. Existing children are kept (no merging).
  pub fn insert(&mut self, viewer: DVec3, ctx: &SplitContext<'_>) {
    if !self.should_split(viewer, ctx) {
      return;
    }

    if self.children.is_none() {
      self.children = Some(Box::new(self.make_children(ctx)));
    }

    if let Some(children) = self.children.as_deref_mut() {
      for child in children.iter_mut() {
        child.insert(viewer, ctx);
      }
    }
  }

  fn make_children(&self, ctx: &SplitContext<'_>) -> [QuadtreeNode; 4] {
    let depth = self.depth.saturating_add(1);
    self
      .bounds
      .quadrants()
      .map(|quadrant| QuadtreeNode::new(quadrant, depth, ctx))
  }

  /// Depth-first leaf collection. Order is unspecified.
  pub fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a QuadtreeNode>) {
    match self.children.as_deref() {
      None => out.push(self),
      Some(children) => {
        for child in children {
          child.collect_leaves(out);
        }
      }
    }
  }

  /// Total nodes in this subtree, including self.
  pub fn node_count(&self) -> usize {
    1 + self
      .children
      .as_deref()
      .map_or(0, |children| children.iter().map(QuadtreeNode::node_count).sum())
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
