//! ChunkParams - everything a worker needs to build one patch.

use glam::{DAffine3, DVec2, DVec3};

use crate::config::{PlanetConfig, SkirtConfig, TerrainParams};
use crate::math::project_to_sphere;
use crate::quadtree::{CubeFace, FaceLeaf};

/// Geometry parameters for one patch. Copied into the generation job.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkParams {
  pub face: CubeFace,
  /// Face-local minimum corner of the patch.
  pub offset: DVec2,
  pub width: f64,
  pub height: f64,
  pub radius: f64,
  /// Cells per edge; the grid has `resolution + 1` vertices per edge.
  pub resolution: u32,
  pub origin: DVec3,
  pub local_to_world: DAffine3,
  pub terrain: TerrainParams,
  pub skirt: Option<SkirtConfig>,
  pub inverted: bool,
}

impl ChunkParams {
  /// Parameters for the patch covering `leaf`.
  pub fn new(leaf: &FaceLeaf, config: &PlanetConfig, local_to_world: DAffine3) -> Self {
    let size = leaf.bounds.size();
    Self {
      face: leaf.face,
      offset: leaf.bounds.min,
      width: size.x,
      height: size.y,
      radius: config.radius,
      resolution: config.resolution,
      origin: config.origin,
      local_to_world,
      terrain: config.terrain,
      skirt: config.skirt,
      inverted: config.inverted,
    }
  }

  /// Face-local patch center.
  #[inline]
  pub fn center(&self) -> DVec2 {
    self.offset + DVec2::new(self.width, self.height) * 0.5
  }

  /// World-space point on the undisplaced sphere below the patch center.
  pub fn anchor(&self) -> DVec3 {
    self.origin + project_to_sphere(&self.local_to_world, self.center(), self.radius)
  }

  /// Vertices per edge.
  #[inline]
  pub fn grid_side(&self) -> usize {
    self.resolution as usize + 1
  }

  pub fn vertex_count(&self) -> usize {
    let side = self.grid_side();
    let skirt = if self.skirt.is_some() { 4 * side } else { 0 };
    side * side + skirt
  }

  pub fn index_count(&self) -> usize {
    let res = self.resolution as usize;
    let skirt = if self.skirt.is_some() { 24 * res } else { 0 };
    6 * res * res + skirt
  }
}
