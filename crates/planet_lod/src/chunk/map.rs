//! ChunkMap - live chunks keyed by patch identity.

use std::collections::hash_map::{self, HashMap};

use super::Chunk;
use crate::quadtree::ChunkId;

/// `ChunkId -> Chunk`. Keys are unique; iteration order is unspecified.
#[derive(Debug)]
pub struct ChunkMap<H> {
  chunks: HashMap<ChunkId, Chunk<H>>,
}

impl<H> ChunkMap<H> {
  pub fn new() -> Self {
    Self {
      chunks: HashMap::new(),
    }
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      chunks: HashMap::with_capacity(capacity),
    }
  }

  /// Insert under the chunk's own id, returning any chunk it displaced.
  pub fn insert(&mut self, chunk: Chunk<H>) -> Option<Chunk<H>> {
    self.chunks.insert(chunk.id(), chunk)
  }

  pub fn remove(&mut self, id: &ChunkId) -> Option<Chunk<H>> {
    self.chunks.remove(id)
  }

  pub fn get(&self, id: &ChunkId) -> Option<&Chunk<H>> {
    self.chunks.get(id)
  }

  pub fn get_mut(&mut self, id: &ChunkId) -> Option<&mut Chunk<H>> {
    self.chunks.get_mut(id)
  }

  pub fn contains(&self, id: &ChunkId) -> bool {
    self.chunks.contains_key(id)
  }

  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }

  pub fn ids(&self) -> impl Iterator<Item = ChunkId> + '_ {
    self.chunks.keys().copied()
  }

  pub fn iter(&self) -> hash_map::Values<'_, ChunkId, Chunk<H>> {
    self.chunks.values()
  }

  pub fn iter_mut(&mut self) -> hash_map::ValuesMut<'_, ChunkId, Chunk<H>> {
    self.chunks.values_mut()
  }

  /// Remove and yield every chunk.
  pub fn drain(&mut self) -> impl Iterator<Item = Chunk<H>> + '_ {
    self.chunks.drain().map(|(_, chunk)| chunk)
  }

  /// Ids present in both maps.
  pub fn intersection_ids(&self, other: &ChunkMap<H>) -> Vec<ChunkId> {
    self.ids().filter(|id| other.contains(id)).collect()
  }

  /// Ids present in `self` but not in `other`.
  pub fn difference_ids(&self, other: &ChunkMap<H>) -> Vec<ChunkId> {
    self.ids().filter(|id| !other.contains(id)).collect()
  }
}

impl<H> Default for ChunkMap<H> {
  fn default() -> Self {
    Self::new()
  }
}

impl<'a, H> IntoIterator for &'a ChunkMap<H> {
  type Item = &'a Chunk<H>;
  type IntoIter = hash_map::Values<'a, ChunkId, Chunk<H>>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}
