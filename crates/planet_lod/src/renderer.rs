//! Renderer collaborator.
//!
//! The planet never talks to a graphics API. Uploads, draws and releases go
//! through this trait on the render thread; the handle type is whatever the
//! backend uses to name a resident mesh.

use glam::DAffine3;

use crate::chunk::ChunkMesh;
use crate::error::UploadError;

/// Backend that turns chunk meshes into drawable GPU resources.
pub trait Renderer {
  /// Resident mesh.
  type Handle;
  /// Whatever the backend needs to draw (shader, pipeline, material...).
  type Material;

  /// Copy `mesh` to the GPU.
  fn upload(&mut self, mesh: &ChunkMesh) -> Result<Self::Handle, UploadError>;

  /// Draw a resident mesh at `transform` (translation to the mesh anchor).
  fn draw(&mut self, handle: &Self::Handle, transform: &DAffine3, material: &Self::Material);

  /// Free a resident mesh. Called exactly once per handle.
  fn release(&mut self, handle: Self::Handle);
}

/// Renderer that keeps nothing. For headless use and benchmarks.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
  type Handle = ();
  type Material = ();

  fn upload(&mut self, _mesh: &ChunkMesh) -> Result<(), UploadError> {
    Ok(())
  }

  fn draw(&mut self, _handle: &(), _transform: &DAffine3, _material: &()) {}

  fn release(&mut self, _handle: ()) {}
}
