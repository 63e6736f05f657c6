//! Planet - per-frame LOD diff and chunk streaming.
//!
//! Each planet owns its face transforms, the live chunk map, the free pool,
//! a worker pool and a renderer. Multiple planets exist independently.
//!
//! # Update
//!
//! ```text
//! viewer -> CubicQuadTree -> leaves (with ids)
//!        -> diff against live map:
//!             id in old map   -> move to new map (reuse, no regeneration)
//!             id not present  -> pool or allocate, reset, queue generation
//!        -> poll: upload ReadyToUpload, retire GenerationFailed
//!        -> old map leftovers -> pool
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use glam::{DAffine3, DVec3};
use web_time::Instant;

use crate::chunk::{Chunk, ChunkMap, ChunkParams, ChunkPool, ChunkState};
use crate::config::{PlanetConfig, QuadtreeConfig};
use crate::error::PlanetError;
use crate::height::{ColorField, HeightField};
#[cfg(feature = "metrics")]
use crate::metrics::PlanetMetrics;
use crate::quadtree::{face_transforms, ChunkId, CubicQuadTree, FaceLeaf, CUBE_FACES};
use crate::renderer::Renderer;
use crate::stats::UpdateStats;
use crate::worker_pool::WorkerPool;

// =============================================================================
// PlanetId - unique identifier
// =============================================================================

/// Atomic counter for generating unique PlanetIds.
static PLANET_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque planet identifier, unique within the process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PlanetId(u64);

impl PlanetId {
  pub fn new() -> Self {
    Self(PLANET_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  pub fn raw(&self) -> u64 {
    self.0
  }
}

impl Default for PlanetId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for PlanetId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "planet#{}", self.0)
  }
}

// =============================================================================
// Planet<R> - streaming state container
// =============================================================================

/// Fraction of `max_chunks` above which occupancy is reported.
const HIGH_OCCUPANCY: f64 = 0.8;

/// A streamed cube-sphere planet, generic over the render backend.
pub struct Planet<R: Renderer> {
  id: PlanetId,
  config: PlanetConfig,
  quadtree_config: QuadtreeConfig,
  transforms: [DAffine3; CUBE_FACES],
  chunks: ChunkMap<R::Handle>,
  pool: ChunkPool<R::Handle>,
  workers: WorkerPool,
  renderer: R,
  height: Arc<dyn HeightField>,
  color: Option<Arc<dyn ColorField>>,
  allocated: usize,
  high_occupancy: bool,
  #[cfg(feature = "metrics")]
  metrics: PlanetMetrics,
}

impl<R: Renderer> Planet<R> {
  /// Validate `config`, start the worker pool and build an empty planet.
  ///
  /// Nothing is generated until the first [`update`](Self::update).
  pub fn new<F>(config: PlanetConfig, height: F, renderer: R) -> Result<Self, PlanetError>
  where
    F: HeightField + 'static,
  {
    Self::with_shared_height(config, Arc::new(height), renderer)
  }

  /// Like [`new`](Self::new) with a height field shared with other owners.
  pub fn with_shared_height(
    config: PlanetConfig,
    height: Arc<dyn HeightField>,
    renderer: R,
  ) -> Result<Self, PlanetError> {
    config.validate()?;
    config.log_warnings();

    let workers = WorkerPool::new(config.worker_threads)?;
    let id = PlanetId::new();
    tracing::info!(
      planet = %id,
      radius = config.radius,
      min_node_size = config.min_node_size,
      resolution = config.resolution,
      worker_threads = config.worker_threads,
      "planet created"
    );

    Ok(Self {
      id,
      quadtree_config: config.quadtree_config(),
      transforms: face_transforms(config.radius),
      chunks: ChunkMap::new(),
      pool: ChunkPool::new(),
      workers,
      renderer,
      height,
      color: None,
      allocated: 0,
      high_occupancy: false,
      #[cfg(feature = "metrics")]
      metrics: PlanetMetrics::new(),
      config,
    })
  }

  /// Per-vertex colors for chunks generated from now on.
  pub fn with_color_field<C>(mut self, color: C) -> Self
  where
    C: ColorField + 'static,
  {
    self.color = Some(Arc::new(color));
    self
  }

  /// Rebuild the quadtree for `viewer` and stream chunks to match it.
  #[tracing::instrument(level = "debug", skip(self), fields(planet = self.id.raw()))]
  pub fn update(&mut self, viewer: DVec3) -> UpdateStats {
    let start = Instant::now();
    let mut stats = UpdateStats::default();

    let leaves = {
      let _span = tracing::info_span!("build_tree").entered();
      let mut tree = CubicQuadTree::from_validated(self.quadtree_config, &self.transforms);
      tree.insert(viewer);
      tree.leaves()
    };
    stats.leaves = leaves.len();

    #[cfg(feature = "metrics")]
    self.metrics.record_leaves(&leaves);

    let mut old = std::mem::replace(&mut self.chunks, ChunkMap::with_capacity(leaves.len()));
    {
      let _span = tracing::info_span!("diff", leaves = leaves.len()).entered();
      self.diff(&leaves, &mut old, &mut stats);
    }

    {
      let _span = tracing::info_span!("upload").entered();
      stats += self.poll_ready();
    }

    {
      let _span = tracing::info_span!("retire", count = old.len()).entered();
      for chunk in old.drain() {
        self.pool.release(chunk);
        stats.retired += 1;
      }
    }

    self.check_occupancy();

    let elapsed_us = start.elapsed().as_micros() as u64;
    #[cfg(feature = "metrics")]
    {
      self.metrics.record_update(&stats, elapsed_us);
      self.record_residency();
    }

    tracing::debug!(
      leaves = stats.leaves,
      reused = stats.reused,
      created = stats.created,
      from_pool = stats.from_pool,
      allocated = stats.allocated,
      retired = stats.retired,
      uploaded = stats.uploaded,
      resident = self.chunks.len(),
      pooled = self.pool.len(),
      elapsed_us,
      "planet update"
    );
    stats
  }

  /// Move surviving chunks into the live map and queue generation for new leaves.
  fn diff(&mut self, leaves: &[FaceLeaf], old: &mut ChunkMap<R::Handle>, stats: &mut UpdateStats) {
    let mut fresh: Vec<&FaceLeaf> = Vec::new();
    for leaf in leaves {
      match old.remove(&leaf.id) {
        Some(chunk) => {
          self.insert_live(chunk);
          stats.reused += 1;
        }
        None => fresh.push(leaf),
      }
    }

    let room = match self.config.max_chunks {
      Some(max) => max.saturating_sub(self.chunks.len()),
      None => usize::MAX,
    };
    if fresh.len() > room {
      stats.skipped_capacity = fresh.len() - room;
      tracing::warn!(
        skipped = stats.skipped_capacity,
        max_chunks = ?self.config.max_chunks,
        "chunk capacity reached, skipping new patches"
      );
    }

    for leaf in fresh.into_iter().take(room) {
      let params = ChunkParams::new(leaf, &self.config, self.transforms[leaf.face.index()]);
      let mut chunk = match self.pool.acquire() {
        Some(mut chunk) => {
          chunk.reset(leaf.id, params);
          stats.from_pool += 1;
          chunk
        }
        None => {
          self.allocated += 1;
          stats.allocated += 1;
          Chunk::new(leaf.id, params)
        }
      };

      match chunk.generation_job(Arc::clone(&self.height), self.color.clone()) {
        Some(job) => self.workers.enqueue(move || job.run()),
        None => tracing::error!(
          chunk = %leaf.id,
          state = ?chunk.state(),
          "fresh chunk refused generation"
        ),
      }
      self.insert_live(chunk);
      stats.created += 1;
    }
  }

  /// Insert into the live map. A chunk displaced by an id collision is
  /// retired to the pool so its GPU handle stays accounted for.
  fn insert_live(&mut self, chunk: Chunk<R::Handle>) {
    if let Some(displaced) = self.chunks.insert(chunk) {
      tracing::error!(
        chunk = %displaced.id(),
        serial = displaced.serial(),
        "chunk id collision, retiring displaced chunk"
      );
      self.pool.release(displaced);
    }
  }

  /// Upload every ready chunk and retire failed ones. Never blocks.
  pub fn poll_ready(&mut self) -> UpdateStats {
    let mut stats = UpdateStats::default();
    let mut failed: Vec<ChunkId> = Vec::new();
    let max_attempts = self.config.max_upload_retries;

    for chunk in self.chunks.iter_mut() {
      match chunk.poll() {
        ChunkState::ReadyToUpload => match chunk.upload(&mut self.renderer) {
          Ok(()) => {
            stats.uploaded += 1;
            #[cfg(feature = "metrics")]
            self.metrics.record_generation_timing(chunk.generation_us());
          }
          Err(err) => {
            stats.upload_failures += 1;
            if chunk.upload_attempts() >= max_attempts {
              tracing::error!(
                chunk = %chunk.id(),
                attempts = chunk.upload_attempts(),
                error = %err,
                "chunk upload retries exhausted, retiring"
              );
              chunk.mark_failed();
              failed.push(chunk.id());
            } else {
              tracing::warn!(
                chunk = %chunk.id(),
                attempt = chunk.upload_attempts(),
                error = %err,
                "chunk upload failed, will retry"
              );
            }
          }
        },
        ChunkState::GenerationFailed => failed.push(chunk.id()),
        _ => {}
      }
    }

    for id in failed {
      if let Some(chunk) = self.chunks.remove(&id) {
        self.pool.release(chunk);
        stats.generation_failures += 1;
      }
    }

    #[cfg(feature = "metrics")]
    self.metrics.record_uploads(&stats);

    stats
  }

  /// Block until every queued generation has finished, then upload.
  pub fn flush(&mut self) -> UpdateStats {
    let _span = tracing::info_span!("flush", pending = self.pending_jobs()).entered();
    self.workers.wait_all();
    let stats = self.poll_ready();
    #[cfg(feature = "metrics")]
    self.record_residency();
    stats
  }

  /// Draw every uploaded chunk, translated to its anchor. Returns the draw count.
  pub fn draw(&mut self, material: &R::Material) -> usize {
    let mut drawn = 0;
    for chunk in self.chunks.iter() {
      if chunk.state() != ChunkState::Uploaded {
        continue;
      }
      if let Some(handle) = chunk.gpu_handle() {
        let transform = DAffine3::from_translation(chunk.params().anchor());
        self.renderer.draw(handle, &transform, material);
        drawn += 1;
      }
    }
    drawn
  }

  fn check_occupancy(&mut self) {
    let Some(max) = self.config.max_chunks else {
      return;
    };
    let occupancy = self.chunks.len() as f64 / max.max(1) as f64;
    let high = occupancy > HIGH_OCCUPANCY;
    if high && !self.high_occupancy {
      tracing::warn!(
        resident = self.chunks.len(),
        max_chunks = max,
        "chunk occupancy above {:.0}% of max_chunks",
        HIGH_OCCUPANCY * 100.0
      );
    }
    self.high_occupancy = high;
  }

  #[cfg(feature = "metrics")]
  fn record_residency(&mut self) {
    let memory: usize = self
      .chunks
      .iter()
      .filter_map(|chunk| chunk.mesh())
      .map(|mesh| mesh.memory_bytes())
      .sum();
    self
      .metrics
      .record_residency(self.chunks.len(), self.pool.len(), memory as u64);
  }

  // ---------------------------------------------------------------------------
  // Accessors
  // ---------------------------------------------------------------------------

  #[inline]
  pub fn id(&self) -> PlanetId {
    self.id
  }

  #[inline]
  pub fn config(&self) -> &PlanetConfig {
    &self.config
  }

  /// Live chunks.
  #[inline]
  pub fn chunk_count(&self) -> usize {
    self.chunks.len()
  }

  /// Retired chunks waiting for reuse.
  #[inline]
  pub fn pool_len(&self) -> usize {
    self.pool.len()
  }

  /// Chunks ever allocated by this planet (live + pooled).
  #[inline]
  pub fn allocated_chunks(&self) -> usize {
    self.allocated
  }

  #[inline]
  pub fn chunks(&self) -> &ChunkMap<R::Handle> {
    &self.chunks
  }

  pub fn chunk(&self, id: ChunkId) -> Option<&Chunk<R::Handle>> {
    self.chunks.get(&id)
  }

  /// Generation jobs queued or running.
  pub fn pending_jobs(&self) -> usize {
    self.workers.queue_len() + self.workers.active_count()
  }

  /// Face-to-world transforms, by face index.
  pub fn face_transforms(&self) -> &[DAffine3; CUBE_FACES] {
    &self.transforms
  }

  #[inline]
  pub fn renderer(&self) -> &R {
    &self.renderer
  }

  #[inline]
  pub fn renderer_mut(&mut self) -> &mut R {
    &mut self.renderer
  }

  #[cfg(feature = "metrics")]
  pub fn metrics(&self) -> &PlanetMetrics {
    &self.metrics
  }
}

impl<R: Renderer> Drop for Planet<R> {
  fn drop(&mut self) {
    self.workers.wait_all();
    let live = self.chunks.len();
    let pooled = self.pool.len();
    for chunk in self.chunks.drain() {
      chunk.free(&mut self.renderer);
    }
    for chunk in self.pool.drain() {
      chunk.free(&mut self.renderer);
    }
    tracing::debug!(planet = %self.id, live, pooled, "planet dropped");
  }
}

#[cfg(test)]
#[path = "planet_test.rs"]
mod planet_test;
