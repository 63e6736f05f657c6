//! PlanetConfig - construction parameters for a streaming planet.
//!
//! Everything that shapes the quadtree, the chunk meshes and the worker pool
//! lives here. `QuadtreeConfig` is the subset the per-frame tree needs.

use glam::DVec3;

use crate::error::ConfigError;

/// Default split aggressiveness.
pub const DEFAULT_LOD_COMPARATOR: f64 = 1.25;

/// Radius / floor ratio above which f32 mesh precision starts to suffer.
pub const PRECISION_WARNING_RATIO: f64 = 50_000.0;

/// Largest chunk resolution. Keeps grid plus skirt vertex indices within `u32`.
pub const MAX_RESOLUTION: u32 = 16_384;

/// Terrain frequency/amplitude pair forwarded to the height field.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainParams {
  /// Scales the sample position handed to the height field.
  pub frequency: f64,
  /// Scales the height field's output.
  pub amplitude: f64,
}

impl Default for TerrainParams {
  fn default() -> Self {
    Self {
      frequency: 1.0,
      amplitude: 1.0,
    }
  }
}

/// Skirt extruded around each patch boundary to hide LOD cracks.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkirtConfig {
  /// Skirt depth as a fraction of the patch width.
  pub depth_factor: f64,
  /// Upper clamp on the skirt depth in world units.
  pub max_depth: f64,
}

impl SkirtConfig {
  /// Depth for a patch of the given width.
  #[inline]
  pub fn depth(&self, patch_width: f64) -> f64 {
    (patch_width * self.depth_factor).min(self.max_depth)
  }
}

impl Default for SkirtConfig {
  fn default() -> Self {
    Self {
      depth_factor: 0.05,
      max_depth: 50.0,
    }
  }
}

/// Configuration for one planet.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlanetConfig {
  /// Sphere radius in world units.
  pub radius: f64,

  /// Detail floor: no patch is smaller than this (face-local units).
  pub min_node_size: f64,

  /// Vertices per patch edge minus one.
  pub resolution: u32,

  /// Split when `distance < size * lod_comparator`.
  pub lod_comparator: f64,

  /// World-space planet center.
  pub origin: DVec3,

  /// Number of generation threads.
  pub worker_threads: usize,

  /// Forwarded verbatim to the height field.
  pub terrain: TerrainParams,

  /// Boundary skirt, `None` to disable.
  pub skirt: Option<SkirtConfig>,

  /// Render from inside the sphere (flipped winding and normals).
  pub inverted: bool,

  /// Cap on resident chunks. New patches beyond it are skipped with a warning.
  pub max_chunks: Option<usize>,

  /// Upload attempts before a chunk is given up on and retired.
  pub max_upload_retries: u32,
}

impl Default for PlanetConfig {
  fn default() -> Self {
    Self {
      radius: 1000.0,
      min_node_size: 50.0,
      resolution: 16,
      lod_comparator: DEFAULT_LOD_COMPARATOR,
      origin: DVec3::ZERO,
      worker_threads: default_worker_threads(),
      terrain: TerrainParams::default(),
      skirt: Some(SkirtConfig::default()),
      inverted: false,
      max_chunks: None,
      max_upload_retries: 3,
    }
  }
}

/// One fewer than the available cores, leaving room for the render thread.
fn default_worker_threads() -> usize {
  std::thread::available_parallelism()
    .map(|n| n.get().saturating_sub(1).max(1))
    .unwrap_or(2)
}

impl PlanetConfig {
  pub fn new(radius: f64, min_node_size: f64, resolution: u32) -> Self {
    Self {
      radius,
      min_node_size,
      resolution,
      ..Self::default()
    }
  }

  pub fn with_lod_comparator(mut self, comparator: f64) -> Self {
    self.lod_comparator = comparator;
    self
  }

  pub fn with_origin(mut self, origin: DVec3) -> Self {
    self.origin = origin;
    self
  }

  pub fn with_worker_threads(mut self, threads: usize) -> Self {
    self.worker_threads = threads;
    self
  }

  pub fn with_terrain(mut self, frequency: f64, amplitude: f64) -> Self {
    self.terrain = TerrainParams {
      frequency,
      amplitude,
    };
    self
  }

  pub fn with_skirt(mut self, skirt: Option<SkirtConfig>) -> Self {
    self.skirt = skirt;
    self
  }

  pub fn with_inverted(mut self, inverted: bool) -> Self {
    self.inverted = inverted;
    self
  }

  pub fn with_max_chunks(mut self, max_chunks: Option<usize>) -> Self {
    self.max_chunks = max_chunks;
    self
  }

  pub fn with_max_upload_retries(mut self, retries: u32) -> Self {
    self.max_upload_retries = retries;
    self
  }

  /// Reject parameters that cannot produce a valid tree or pool.
  pub fn validate(&self) -> Result<(), ConfigError> {
    self.quadtree_config().validate()?;
    if self.resolution == 0 {
      return Err(ConfigError::InvalidResolution);
    }
    if self.resolution > MAX_RESOLUTION {
      return Err(ConfigError::ResolutionTooLarge {
        resolution: self.resolution,
        max: MAX_RESOLUTION,
      });
    }
    if self.worker_threads == 0 {
      return Err(ConfigError::NoWorkerThreads);
    }
    if let Some(skirt) = self.skirt {
      if !(skirt.depth_factor >= 0.0 && skirt.max_depth >= 0.0) {
        return Err(ConfigError::InvalidSkirt {
          depth_factor: skirt.depth_factor,
          max_depth: skirt.max_depth,
        });
      }
    }
    Ok(())
  }

  /// Subset of the configuration used to build the per-frame tree.
  pub fn quadtree_config(&self) -> QuadtreeConfig {
    QuadtreeConfig {
      radius: self.radius,
      min_node_size: self.min_node_size,
      comparator: self.lod_comparator,
      origin: self.origin,
    }
  }

  /// Rough upper bound on resident chunks at full subdivision.
  ///
  /// `6 * 4^depth` where depth is the number of halvings from the root
  /// (`2 * radius`) before reaching the floor.
  pub fn estimated_max_chunks(&self) -> u64 {
    let depth = self.quadtree_config().max_depth();
    6u64.saturating_mul(1u64.checked_shl(2 * depth).unwrap_or(u64::MAX))
  }

  /// Emit warnings for configurations that are valid but likely to misbehave.
  pub fn log_warnings(&self) {
    let ratio = self.radius / self.min_node_size;
    if ratio > PRECISION_WARNING_RATIO {
      tracing::warn!(
        ratio,
        radius = self.radius,
        min_node_size = self.min_node_size,
        "very large planet, radius/min_node_size may cause floating-point precision issues"
      );
    }

    if let Some(max_chunks) = self.max_chunks {
      let estimated = self.estimated_max_chunks();
      if estimated as f64 > max_chunks as f64 * 0.5 {
        tracing::warn!(
          estimated,
          max_chunks,
          "estimated chunk count may exceed max_chunks, consider a larger min_node_size"
        );
      }
    }
  }
}

/// Parameters shared by the six face quadtrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadtreeConfig {
  /// Sphere radius; also the half-extent of each face plane.
  pub radius: f64,
  /// Nodes are never split into children smaller than this.
  pub min_node_size: f64,
  /// Split factor; must be > 0.
  pub comparator: f64,
  /// Planet center in world space.
  pub origin: DVec3,
}

impl QuadtreeConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !(self.radius.is_finite() && self.radius > 0.0) {
      return Err(ConfigError::InvalidRadius(self.radius));
    }
    if !(self.min_node_size.is_finite() && self.min_node_size > 0.0) {
      return Err(ConfigError::InvalidMinNodeSize(self.min_node_size));
    }
    if !(self.comparator.is_finite() && self.comparator > 0.0) {
      return Err(ConfigError::InvalidComparator(self.comparator));
    }
    Ok(())
  }

  /// Edge length of a face root node.
  #[inline]
  pub fn root_size(&self) -> f64 {
    2.0 * self.radius
  }

  /// Number of times the root can be halved without crossing the floor.
  pub fn max_depth(&self) -> u32 {
    let mut size = self.root_size();
    let mut depth = 0;
    while size * 0.5 >= self.min_node_size && depth < 63 {
      size *= 0.5;
      depth += 1;
    }
    depth
  }
}

impl Default for QuadtreeConfig {
  fn default() -> Self {
    PlanetConfig::default().quadtree_config()
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
