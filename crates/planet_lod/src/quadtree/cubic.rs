//! CubicQuadTree - six face quadtrees covering the sphere.
//!
//! Built fresh each frame for the current viewer and dropped once its leaves
//! and ids are extracted. Faces never interact, so a viewer near a face
//! edge can see asymmetric detail on either side.

use glam::{DAffine3, DVec3};

use super::face::{face_transforms, CUBE_FACES};
use super::{ChunkId, CubeFace, FaceBounds, Quadtree};
use crate::config::QuadtreeConfig;
use crate::error::ConfigError;

/// A leaf tagged with its face and identity. One per desired patch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceLeaf {
  pub id: ChunkId,
  pub face: CubeFace,
  pub bounds: FaceBounds,
  pub sphere_center: DVec3,
  pub depth: u8,
}

impl FaceLeaf {
  /// Patch edge length in face-local units.
  #[inline]
  pub fn size(&self) -> f64 {
    self.bounds.size().x
  }
}

/// Six quadtrees, indexed by [`CubeFace::index`].
#[derive(Clone, Debug)]
pub struct CubicQuadTree {
  sides: [Quadtree; CUBE_FACES],
}

impl CubicQuadTree {
  pub fn new(config: QuadtreeConfig) -> Result<Self, ConfigError> {
    Self::with_transforms(config, &face_transforms(config.radius))
  }

  /// Build from transforms computed once by the owner.
  pub fn with_transforms(
    config: QuadtreeConfig,
    transforms: &[DAffine3; CUBE_FACES],
  ) -> Result<Self, ConfigError> {
    config.validate()?;
    Ok(Self::from_validated(config, transforms))
  }

  pub(crate) fn from_validated(config: QuadtreeConfig, transforms: &[DAffine3; CUBE_FACES]) -> Self {
    let sides =
      CubeFace::ALL.map(|face| Quadtree::from_validated(face, transforms[face.index()], config));
    Self { sides }
  }

  /// Build, subdivide for `viewer` and return the leaf list.
  pub fn build(viewer: DVec3, config: QuadtreeConfig) -> Result<Vec<FaceLeaf>, ConfigError> {
    let mut tree = Self::new(config)?;
    tree.insert(viewer);
    Ok(tree.leaves())
  }

  /// Subdivide every face independently for `viewer`.
  pub fn insert(&mut self, viewer: DVec3) {
    for side in &mut self.sides {
      side.insert(viewer);
    }
  }

  /// Concatenated leaves of all faces with ids.
  pub fn leaves(&self) -> Vec<FaceLeaf> {
    let mut out = Vec::with_capacity(CUBE_FACES * 4);
    for side in &self.sides {
      let face = side.face();
      out.extend(side.leaves().into_iter().map(|node| FaceLeaf {
        id: ChunkId::new(face, node.bounds.min, node.size.x),
        face,
        bounds: node.bounds,
        sphere_center: node.sphere_center,
        depth: node.depth,
      }));
    }
    out
  }

  /// Leaf count for each face, by face index.
  pub fn leaf_count_per_face(&self) -> [usize; CUBE_FACES] {
    let mut counts = [0; CUBE_FACES];
    for side in &self.sides {
      counts[side.face().index()] = side.leaves().len();
    }
    counts
  }

  pub fn side(&self, face: CubeFace) -> &Quadtree {
    &self.sides[face.index()]
  }

  pub fn sides(&self) -> &[Quadtree; CUBE_FACES] {
    &self.sides
  }
}

#[cfg(test)]
#[path = "cubic_test.rs"]
mod cubic_test;
