//! Chunk - one streamed terrain patch.
//!
//! A chunk is owned by exactly one of the live map, the pool or (for its
//! mesh buffers) a queued generation job. The only shared piece is the
//! generation slot: a small mutex holding the state and the mesh hand-off
//! back from the worker.
//!
//! # Lifecycle
//!
//! ```text
//! main:   reset -> generation_job ----------------> poll -> upload
//!                        |                            ^
//! worker:                +--> run: Generating -> ReadyToUpload / GenerationFailed
//! ```

pub mod generate;
pub mod map;
pub mod mesh;
pub mod params;
pub mod pool;
pub mod state;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use web_time::Instant;

use crate::error::{GenerationError, UploadError};
use crate::height::{ColorField, HeightField};
use crate::quadtree::ChunkId;
use crate::renderer::Renderer;
use crate::worker_pool::panic_message;

// Re-exports
pub use generate::generate;
pub use map::ChunkMap;
pub use mesh::{ChunkMesh, MinMaxAABB};
pub use params::ChunkParams;
pub use pool::ChunkPool;
pub use state::ChunkState;

/// Atomic counter for chunk serials.
static CHUNK_SERIAL_COUNTER: AtomicU64 = AtomicU64::new(1);

/// State plus mesh hand-off shared with the generation job.
#[derive(Debug, Default)]
struct GenerationSlot {
  state: ChunkState,
  /// Filled by the job when it finishes.
  mesh: Option<ChunkMesh>,
  error: Option<GenerationError>,
  generation_us: u64,
}

type SharedSlot = Arc<Mutex<GenerationSlot>>;

fn lock(slot: &SharedSlot) -> MutexGuard<'_, GenerationSlot> {
  slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A streamed terrain patch, generic over the renderer's GPU handle.
#[derive(Debug)]
pub struct Chunk<H> {
  id: ChunkId,
  serial: u64,
  params: ChunkParams,
  /// `None` while a job holds the buffers.
  mesh: Option<ChunkMesh>,
  gpu: Option<H>,
  upload_attempts: u32,
  slot: SharedSlot,
}

impl<H> Chunk<H> {
  /// Fresh allocation in `Uninitialized`.
  pub fn new(id: ChunkId, params: ChunkParams) -> Self {
    Self {
      id,
      serial: CHUNK_SERIAL_COUNTER.fetch_add(1, Ordering::Relaxed),
      params,
      mesh: Some(ChunkMesh::new()),
      gpu: None,
      upload_attempts: 0,
      slot: Arc::new(Mutex::new(GenerationSlot::default())),
    }
  }

  /// Re-target a pooled chunk to a new patch and return it to `Uninitialized`.
  ///
  /// If a job still owns the buffers the chunk is detached from that slot
  /// and gets new ones; the job finishes into the orphaned slot. The GPU
  /// handle is kept until the next upload releases it.
  pub fn reset(&mut self, id: ChunkId, params: ChunkParams) {
    let in_flight = {
      let mut slot = lock(&self.slot);
      let in_flight = slot.state.is_in_flight();
      if !in_flight {
        if let Some(mesh) = slot.mesh.take() {
          self.mesh = Some(mesh);
        }
        *slot = GenerationSlot::default();
      }
      in_flight
    };

    if in_flight {
      tracing::trace!(serial = self.serial, "detaching chunk from in-flight generation");
      self.slot = Arc::new(Mutex::new(GenerationSlot::default()));
      self.mesh = None;
    }

    self.mesh.get_or_insert_with(ChunkMesh::new);
    self.id = id;
    self.params = params;
    self.upload_attempts = 0;
  }

  /// Move the buffers into a job and mark the chunk `Pending`.
  ///
  /// Only an `Uninitialized` chunk can be queued; anything else returns
  /// `None` and must go through [`reset`](Self::reset) first.
  pub fn generation_job(
    &mut self,
    height: Arc<dyn HeightField>,
    color: Option<Arc<dyn ColorField>>,
  ) -> Option<GenerationJob> {
    {
      let mut slot = lock(&self.slot);
      if !slot.state.can_transition_to(ChunkState::Pending) {
        tracing::debug!(
          serial = self.serial,
          state = ?slot.state,
          "generation refused without reset"
        );
        return None;
      }
      slot.state = ChunkState::Pending;
    }

    Some(GenerationJob {
      params: self.params,
      mesh: self.mesh.take().unwrap_or_default(),
      slot: Arc::clone(&self.slot),
      height,
      color,
    })
  }

  /// Current state. Reclaims the mesh from a finished job.
  pub fn poll(&mut self) -> ChunkState {
    let mut slot = lock(&self.slot);
    if let Some(mesh) = slot.mesh.take() {
      self.mesh = Some(mesh);
    }
    slot.state
  }

  /// State without reclaiming anything.
  pub fn state(&self) -> ChunkState {
    lock(&self.slot).state
  }

  /// Upload a ready mesh, releasing any previous GPU handle first.
  ///
  /// On failure the state stays `ReadyToUpload` and the attempt is counted.
  pub fn upload<R>(&mut self, renderer: &mut R) -> Result<(), UploadError>
  where
    R: Renderer<Handle = H>,
  {
    if self.poll() != ChunkState::ReadyToUpload {
      return Err(UploadError::new("chunk is not ready to upload"));
    }
    let Some(mesh) = self.mesh.as_ref() else {
      return Err(UploadError::new("chunk has no mesh"));
    };

    if let Some(old) = self.gpu.take() {
      renderer.release(old);
    }

    self.upload_attempts += 1;
    let handle = renderer.upload(mesh)?;
    self.gpu = Some(handle);
    lock(&self.slot).state = ChunkState::Uploaded;
    Ok(())
  }

  /// Give up on a ready chunk whose uploads keep failing.
  ///
  /// Returns `false` and leaves the state alone from any other state.
  pub fn mark_failed(&mut self) -> bool {
    let mut slot = lock(&self.slot);
    if slot.state != ChunkState::ReadyToUpload {
      return false;
    }
    slot.state = ChunkState::GenerationFailed;
    true
  }

  /// Release the GPU handle, if any.
  pub fn release_gpu<R>(&mut self, renderer: &mut R)
  where
    R: Renderer<Handle = H>,
  {
    if let Some(handle) = self.gpu.take() {
      renderer.release(handle);
    }
  }

  /// Release GPU resources and drop CPU buffers. Valid from any state.
  pub fn free<R>(mut self, renderer: &mut R)
  where
    R: Renderer<Handle = H>,
  {
    self.release_gpu(renderer);
  }

  #[inline]
  pub fn id(&self) -> ChunkId {
    self.id
  }

  /// Unique per allocation; survives reuse from the pool.
  #[inline]
  pub fn serial(&self) -> u64 {
    self.serial
  }

  #[inline]
  pub fn params(&self) -> &ChunkParams {
    &self.params
  }

  /// CPU mesh, when not held by a job.
  #[inline]
  pub fn mesh(&self) -> Option<&ChunkMesh> {
    self.mesh.as_ref()
  }

  #[inline]
  pub fn gpu_handle(&self) -> Option<&H> {
    self.gpu.as_ref()
  }

  #[inline]
  pub fn upload_attempts(&self) -> u32 {
    self.upload_attempts
  }

  /// Why the last generation failed, if it did.
  pub fn last_error(&self) -> Option<GenerationError> {
    lock(&self.slot).error.clone()
  }

  /// Wall time of the last finished generation in microseconds.
  pub fn generation_us(&self) -> u64 {
    lock(&self.slot).generation_us
  }
}

/// Work item carrying a chunk's buffers to a worker and back.
pub struct GenerationJob {
  params: ChunkParams,
  mesh: ChunkMesh,
  slot: SharedSlot,
  height: Arc<dyn HeightField>,
  color: Option<Arc<dyn ColorField>>,
}

impl GenerationJob {
  /// Build the mesh and hand it back through the slot.
  ///
  /// Panics in the height or color field are caught and reported as
  /// `GenerationFailed`.
  pub fn run(self) {
    let GenerationJob {
      params,
      mut mesh,
      slot,
      height,
      color,
    } = self;

    lock(&slot).state = ChunkState::Generating;
    let start = Instant::now();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
      generate(&params, height.as_ref(), color.as_deref(), &mut mesh)
    }))
    .unwrap_or_else(|payload| Err(GenerationError::Panicked(panic_message(&*payload))));

    let elapsed = start.elapsed().as_micros() as u64;
    let mut slot = lock(&slot);
    slot.generation_us = elapsed;
    match result {
      Ok(()) => {
        slot.state = ChunkState::ReadyToUpload;
        slot.error = None;
      }
      Err(err) => {
        tracing::warn!(face = ?params.face, error = %err, "chunk generation failed");
        mesh.clear();
        slot.state = ChunkState::GenerationFailed;
        slot.error = Some(err);
      }
    }
    slot.mesh = Some(mesh);
  }
}

#[cfg(test)]
#[path = "chunk_test.rs"]
mod chunk_test;
