//! planet_lod - cube-sphere quadtree LOD with streamed terrain chunks
//!
//! A planet is a cube whose six faces are projected onto a sphere. Each
//! face carries a quadtree that subdivides toward the viewer; every leaf is
//! a terrain patch ("chunk") built on worker threads and uploaded through a
//! user-supplied [`Renderer`].
//!
//! # Features
//!
//! - **Deterministic patch ids**: the same rectangle on the same face hashes
//!   to the same [`ChunkId`] every frame, so diffs are plain set operations
//! - **Chunk pooling**: retired chunks keep their buffers and GPU handle
//!   and are recycled before anything new is allocated
//! - **Background generation**: a fixed worker pool builds meshes; the render
//!   thread only uploads
//! - **Skirts**: optional boundary skirts hide cracks between detail levels
//!
//! # Example
//!
//! ```ignore
//! use planet_lod::{NullRenderer, Planet, PlanetConfig, ValueNoiseHeight};
//!
//! let config = PlanetConfig::new(6_371_000.0, 500.0, 32);
//! let mut planet = Planet::new(config, ValueNoiseHeight::default(), NullRenderer)?;
//!
//! // Each frame
//! let stats = planet.update(camera_position);
//! planet.draw(&material);
//! ```

pub mod chunk;
pub mod config;
pub mod error;
pub mod height;
pub mod math;
pub mod metrics;
pub mod planet;
pub mod quadtree;
pub mod renderer;
pub mod stats;
pub mod worker_pool;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used items
pub use chunk::{Chunk, ChunkMap, ChunkMesh, ChunkParams, ChunkPool, ChunkState, MinMaxAABB};
pub use config::{
  PlanetConfig, QuadtreeConfig, SkirtConfig, TerrainParams, DEFAULT_LOD_COMPARATOR, MAX_RESOLUTION,
};
pub use error::{ConfigError, GenerationError, PlanetError, UploadError};
pub use height::{ColorField, FlatHeight, HeightField, ValueNoiseHeight};
pub use planet::{Planet, PlanetId};
pub use quadtree::{ChunkId, CubeFace, CubicQuadTree, FaceBounds, FaceLeaf, Quadtree};
pub use renderer::{NullRenderer, Renderer};
pub use stats::UpdateStats;
pub use worker_pool::WorkerPool;
