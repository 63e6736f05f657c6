//! ChunkPool - LIFO free-list of retired chunks.

use super::Chunk;

/// Retired chunks waiting for reuse. O(1) acquire and release.
///
/// Pooled chunks keep their mesh capacity and GPU handle; both are reused
/// or released when the chunk is next uploaded or freed.
#[derive(Debug)]
pub struct ChunkPool<H> {
  free: Vec<Chunk<H>>,
}

impl<H> ChunkPool<H> {
  pub fn new() -> Self {
    Self { free: Vec::new() }
  }

  pub fn release(&mut self, chunk: Chunk<H>) {
    self.free.push(chunk);
  }

  /// Most recently released chunk.
  pub fn acquire(&mut self) -> Option<Chunk<H>> {
    self.free.pop()
  }

  pub fn len(&self) -> usize {
    self.free.len()
  }

  pub fn is_empty(&self) -> bool {
    self.free.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Chunk<H>> {
    self.free.iter()
  }

  pub fn drain(&mut self) -> std::vec::Drain<'_, Chunk<H>> {
    self.free.drain(..)
  }
}

impl<H> Default for ChunkPool<H> {
  fn default() -> Self {
    Self::new()
  }
}
