//! Quadtree - subdivision of a single cube face.

use glam::{DAffine3, DVec3};

use super::node::SplitContext;
use super::{CubeFace, FaceBounds, QuadtreeNode};
use crate::config::QuadtreeConfig;
use crate::error::ConfigError;

/// One face's quadtree. Root bounds are `[-radius, radius]²`.
#[derive(Clone, Debug)]
pub struct Quadtree {
  face: CubeFace,
  local_to_world: DAffine3,
  config: QuadtreeConfig,
  root: QuadtreeNode,
}

impl Quadtree {
  /// Build an unsplit tree for `face`.
  ///
  /// Fails without building anything if the comparator, floor or radius is
  /// invalid.
  pub fn new(face: CubeFace, config: QuadtreeConfig) -> Result<Self, ConfigError> {
    Self::with_transform(face, face.local_to_world(config.radius), config)
  }

  /// Build with a precomputed face transform.
  pub fn with_transform(
    face: CubeFace,
    local_to_world: DAffine3,
    config: QuadtreeConfig,
  ) -> Result<Self, ConfigError> {
    config.validate()?;
    Ok(Self::from_validated(face, local_to_world, config))
  }

  pub(crate) fn from_validated(
    face: CubeFace,
    local_to_world: DAffine3,
    config: QuadtreeConfig,
  ) -> Self {
    let ctx = split_context(&local_to_world, &config);
    let root = QuadtreeNode::new(FaceBounds::centered(config.radius), 0, &ctx);
    Self {
      face,
      local_to_world,
      config,
      root,
    }
  }

  /// Subdivide for a viewer position.
  pub fn insert(&mut self, viewer: DVec3) {
    let ctx = split_context(&self.local_to_world, &self.config);
    self.root.insert(viewer, &ctx);
  }

  /// All leaves, depth-first. Order is unspecified.
  pub fn leaves(&self) -> Vec<&QuadtreeNode> {
    let mut out = Vec::with_capacity(16);
    self.root.collect_leaves(&mut out);
    out
  }

  #[inline]
  pub fn face(&self) -> CubeFace {
    self.face
  }

  #[inline]
  pub fn local_to_world(&self) -> &DAffine3 {
    &self.local_to_world
  }

  #[inline]
  pub fn config(&self) -> &QuadtreeConfig {
    &self.config
  }

  #[inline]
  pub fn root(&self) -> &QuadtreeNode {
    &self.root
  }
}

fn split_context<'a>(local_to_world: &'a DAffine3, config: &QuadtreeConfig) -> SplitContext<'a> {
  SplitContext {
    local_to_world,
    radius: config.radius,
    origin: config.origin,
    min_node_size: config.min_node_size,
    comparator: config.comparator,
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
