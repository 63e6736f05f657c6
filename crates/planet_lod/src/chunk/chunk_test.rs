use std::sync::Arc;

use glam::{DVec2, DVec3};

use super::*;
use crate::config::TerrainParams;
use crate::height::FlatHeight;
use crate::quadtree::CubeFace;
use crate::test_utils::MockRenderer;

// =============================================================================
// Helpers
// =============================================================================

fn params(x: f64) -> ChunkParams {
  ChunkParams {
    face: CubeFace::PosX,
    offset: DVec2::new(x, -100.0),
    width: 200.0,
    height: 200.0,
    radius: 1000.0,
    resolution: 4,
    origin: DVec3::ZERO,
    local_to_world: CubeFace::PosX.local_to_world(1000.0),
    terrain: TerrainParams::default(),
    skirt: None,
    inverted: false,
  }
}

fn chunk(x: f64) -> Chunk<u64> {
  Chunk::new(ChunkId::new(CubeFace::PosX, DVec2::new(x, -100.0), 200.0), params(x))
}

fn flat() -> Arc<dyn HeightField> {
  Arc::new(FlatHeight)
}

fn queue_job(chunk: &mut Chunk<u64>) -> GenerationJob {
  chunk.generation_job(flat(), None).unwrap()
}

/// Queue and run generation inline.
fn generate_now(chunk: &mut Chunk<u64>) {
  queue_job(chunk).run();
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_new_chunk_uninitialized() {
  let a = chunk(0.0);
  let b = chunk(0.0);
  assert_eq!(a.state(), ChunkState::Uninitialized);
  assert!(a.mesh().is_some());
  assert!(a.gpu_handle().is_none());
  assert_ne!(a.serial(), b.serial());
}

#[test]
fn test_generate_then_upload() {
  let mut renderer = MockRenderer::new();
  let mut c = chunk(0.0);

  let job = queue_job(&mut c);
  assert_eq!(c.state(), ChunkState::Pending);
  assert!(c.mesh().is_none());

  job.run();
  assert_eq!(c.poll(), ChunkState::ReadyToUpload);
  assert_eq!(c.mesh().map(|m| m.vertex_count()), Some(25));

  c.upload(&mut renderer).unwrap();
  assert_eq!(c.state(), ChunkState::Uploaded);
  assert_eq!(c.gpu_handle(), Some(&0));
  assert_eq!(c.upload_attempts(), 1);
  assert_eq!(renderer.uploads, vec![(0, 25)]);
}

#[test]
fn test_upload_requires_ready() {
  let mut renderer = MockRenderer::new();
  let mut c = chunk(0.0);
  assert!(c.upload(&mut renderer).is_err());
  assert_eq!(c.upload_attempts(), 0);
  assert!(renderer.uploads.is_empty());
}

#[test]
fn test_upload_failure_stays_ready() {
  let mut renderer = MockRenderer::failing();
  let mut c = chunk(0.0);
  generate_now(&mut c);

  assert!(c.upload(&mut renderer).is_err());
  assert_eq!(c.state(), ChunkState::ReadyToUpload);
  assert_eq!(c.upload_attempts(), 1);

  renderer.fail_uploads = false;
  c.upload(&mut renderer).unwrap();
  assert_eq!(c.state(), ChunkState::Uploaded);
  assert_eq!(c.upload_attempts(), 2);
}

/// Uploaded goes back to Pending only through reset.
#[test]
fn test_reset_reuses_and_releases_old_handle() {
  let mut renderer = MockRenderer::new();
  let mut c = chunk(0.0);
  generate_now(&mut c);
  c.upload(&mut renderer).unwrap();
  let serial = c.serial();
  let capacity = c.mesh().map(|m| m.positions.capacity()).unwrap_or(0);

  c.reset(ChunkId::new(CubeFace::PosX, DVec2::new(200.0, -100.0), 200.0), params(200.0));
  assert_eq!(c.state(), ChunkState::Uninitialized);
  assert_eq!(c.serial(), serial);
  assert_eq!(c.upload_attempts(), 0);
  assert_eq!(c.params().offset.x, 200.0);
  // Handle survives until the next upload.
  assert_eq!(c.gpu_handle(), Some(&0));
  assert_eq!(c.mesh().map(|m| m.positions.capacity()), Some(capacity));

  generate_now(&mut c);
  c.upload(&mut renderer).unwrap();
  assert_eq!(renderer.released, vec![0]);
  assert_eq!(c.gpu_handle(), Some(&1));
}

#[test]
fn test_reset_while_in_flight_detaches() {
  let mut c = chunk(0.0);
  let job = queue_job(&mut c);

  c.reset(ChunkId::new(CubeFace::PosX, DVec2::new(200.0, -100.0), 200.0), params(200.0));
  assert_eq!(c.state(), ChunkState::Uninitialized);
  assert!(c.mesh().is_some());

  // The orphaned job finishes without touching the chunk.
  job.run();
  assert_eq!(c.poll(), ChunkState::Uninitialized);
  assert!(c.mesh().map(|m| m.is_empty()).unwrap_or(false));
}

#[test]
fn test_reset_reclaims_finished_mesh() {
  let mut c = chunk(0.0);
  generate_now(&mut c);

  // Retired before the main thread polled.
  c.reset(ChunkId::new(CubeFace::PosX, DVec2::ZERO, 200.0), params(0.0));
  assert!(c.mesh().map(|m| m.vertex_count() == 25).unwrap_or(false));
}

/// Only a reset chunk can be queued again.
#[test]
fn test_generation_job_refused_until_reset() {
  let mut renderer = MockRenderer::new();
  let mut c = chunk(0.0);
  generate_now(&mut c);
  c.upload(&mut renderer).unwrap();

  assert!(c.generation_job(flat(), None).is_none());
  assert_eq!(c.state(), ChunkState::Uploaded);
  assert!(c.mesh().is_some());
  assert_eq!(c.gpu_handle(), Some(&0));

  let pending = queue_job(&mut c);
  drop(pending);
  assert!(c.generation_job(flat(), None).is_none(), "Pending queued twice");

  c.reset(ChunkId::new(CubeFace::PosX, DVec2::new(200.0, -100.0), 200.0), params(200.0));
  generate_now(&mut c);
  assert_eq!(c.poll(), ChunkState::ReadyToUpload);
}

#[test]
fn test_mark_failed_only_from_ready() {
  let mut c = chunk(0.0);
  assert!(!c.mark_failed());
  assert_eq!(c.state(), ChunkState::Uninitialized);

  generate_now(&mut c);
  assert!(c.mark_failed());
  assert_eq!(c.state(), ChunkState::GenerationFailed);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_panicking_height_field_fails_generation() {
  let mut c = chunk(0.0);
  let height: Arc<dyn HeightField> = Arc::new(|_: DVec3, _: f64| -> f64 { panic!("bad terrain") });
  c.generation_job(height, None).unwrap().run();

  assert_eq!(c.poll(), ChunkState::GenerationFailed);
  match c.last_error() {
    Some(GenerationError::Panicked(message)) => assert!(message.contains("bad terrain")),
    other => panic!("unexpected error {other:?}"),
  }
  assert!(c.mesh().map(|m| m.is_empty()).unwrap_or(false));
}

#[test]
fn test_free_releases_handle() {
  let mut renderer = MockRenderer::new();
  let mut c = chunk(0.0);
  generate_now(&mut c);
  c.upload(&mut renderer).unwrap();

  c.free(&mut renderer);
  assert_eq!(renderer.released, vec![0]);
  assert_eq!(renderer.live_handles(), 0);
}

#[test]
fn test_job_runs_on_worker_pool() {
  let pool = crate::worker_pool::WorkerPool::new(2).unwrap();
  let mut chunks: Vec<Chunk<u64>> = (0..8).map(|i| chunk(i as f64 * 10.0)).collect();
  for c in &mut chunks {
    let job = queue_job(c);
    pool.enqueue(move || job.run());
  }
  pool.wait_all();

  for c in &mut chunks {
    assert_eq!(c.poll(), ChunkState::ReadyToUpload);
  }
}
