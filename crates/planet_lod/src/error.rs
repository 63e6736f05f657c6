//! Error types for planet construction, chunk generation and upload.

use std::collections::TryReserveError;

use thiserror::Error;

/// Invalid construction parameter. Raised before any tree or thread exists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
  #[error("planet radius must be positive and finite, got {0}")]
  InvalidRadius(f64),

  #[error("minimum node size must be positive and finite, got {0}")]
  InvalidMinNodeSize(f64),

  #[error("LOD comparator value must be greater than 0, got {0}")]
  InvalidComparator(f64),

  #[error("chunk resolution must be at least 1")]
  InvalidResolution,

  #[error("chunk resolution {resolution} exceeds the 32-bit index limit of {max}")]
  ResolutionTooLarge { resolution: u32, max: u32 },

  #[error("worker pool needs at least one thread")]
  NoWorkerThreads,

  #[error("skirt depth factor and max depth must be non-negative, got {depth_factor} / {max_depth}")]
  InvalidSkirt { depth_factor: f64, max_depth: f64 },
}

/// Failure while building a [`Planet`](crate::Planet).
#[derive(Debug, Error)]
pub enum PlanetError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("failed to spawn worker thread {index}")]
  WorkerSpawn {
    index: usize,
    #[source]
    source: std::io::Error,
  },
}

/// Failure inside a chunk's geometry generation.
///
/// Generation is expected to be total for valid inputs; these cover
/// allocation failure and a panicking height/color field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
  #[error("failed to reserve mesh buffers: {0}")]
  Allocation(#[from] TryReserveError),

  #[error("generation panicked: {0}")]
  Panicked(String),
}

/// Renderer refused or failed a mesh upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("mesh upload failed: {message}")]
pub struct UploadError {
  pub message: String,
}

impl UploadError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}
