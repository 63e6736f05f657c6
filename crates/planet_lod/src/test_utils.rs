//! Test helpers: a renderer that records every call.

use std::sync::{Arc, Mutex, MutexGuard};

use glam::DAffine3;

use crate::chunk::ChunkMesh;
use crate::error::UploadError;
use crate::renderer::Renderer;

/// Records uploads, draws and releases. Handles are sequential `u64`s.
#[derive(Debug, Default)]
pub struct MockRenderer {
  next_handle: u64,
  /// Handle and vertex count of each successful upload.
  pub uploads: Vec<(u64, usize)>,
  pub released: Vec<u64>,
  pub draws: Vec<(u64, DAffine3)>,
  /// Failed upload attempts.
  pub failed_uploads: usize,
  /// Fail every upload while set.
  pub fail_uploads: bool,
}

impl MockRenderer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn failing() -> Self {
    Self {
      fail_uploads: true,
      ..Self::default()
    }
  }

  /// Handles uploaded and not yet released.
  pub fn live_handles(&self) -> usize {
    self.uploads.len() - self.released.len()
  }
}

impl Renderer for MockRenderer {
  type Handle = u64;
  type Material = ();

  fn upload(&mut self, mesh: &ChunkMesh) -> Result<u64, UploadError> {
    if self.fail_uploads {
      self.failed_uploads += 1;
      return Err(UploadError::new("mock upload failure"));
    }
    let handle = self.next_handle;
    self.next_handle += 1;
    self.uploads.push((handle, mesh.vertex_count()));
    Ok(handle)
  }

  fn draw(&mut self, handle: &u64, transform: &DAffine3, _material: &()) {
    self.draws.push((*handle, *transform));
  }

  fn release(&mut self, handle: u64) {
    assert!(!self.released.contains(&handle), "handle {handle} released twice");
    self.released.push(handle);
  }
}

/// [`MockRenderer`] behind a shared handle, readable after the planet is dropped.
#[derive(Clone, Debug, Default)]
pub struct SharedRenderer(pub Arc<Mutex<MockRenderer>>);

impl SharedRenderer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn log(&self) -> MutexGuard<'_, MockRenderer> {
    self.0.lock().unwrap()
  }
}

impl Renderer for SharedRenderer {
  type Handle = u64;
  type Material = ();

  fn upload(&mut self, mesh: &ChunkMesh) -> Result<u64, UploadError> {
    self.log().upload(mesh)
  }

  fn draw(&mut self, handle: &u64, transform: &DAffine3, material: &()) {
    self.log().draw(handle, transform, material)
  }

  fn release(&mut self, handle: u64) {
    self.log().release(handle)
  }
}
