//! CPU-side patch geometry.

use glam::DVec3;

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Generated patch mesh.
///
/// Positions are `f32` offsets from `anchor` so large radii keep precision.
/// Buffers are cleared and refilled in place, keeping their capacity across
/// pool reuse.
#[derive(Clone, Debug, Default)]
pub struct ChunkMesh {
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub uvs: Vec<[f32; 2]>,
  /// Empty when no color field is set.
  pub colors: Vec<[u8; 4]>,
  /// Counter-clockwise triangles seen from the front side.
  pub indices: Vec<u32>,
  /// World-space point the positions are relative to.
  pub anchor: DVec3,
  /// Bounds of `positions`, relative to `anchor`.
  pub bounds: MinMaxAABB,
}

impl ChunkMesh {
  pub fn new() -> Self {
    Self::default()
  }

  /// Clear all buffers, preserving capacity.
  pub fn clear(&mut self) {
    self.positions.clear();
    self.normals.clear();
    self.uvs.clear();
    self.colors.clear();
    self.indices.clear();
    self.anchor = DVec3::ZERO;
    self.bounds = MinMaxAABB::empty();
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  /// Number of triangles in the mesh.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Approximate heap footprint of the current contents.
  pub fn memory_bytes(&self) -> usize {
    self.positions.len() * 12
      + self.normals.len() * 12
      + self.uvs.len() * 8
      + self.colors.len() * 4
      + self.indices.len() * 4
  }
}
