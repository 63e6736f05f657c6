//! Chunk lifecycle states.

/// Where a chunk is in its generate/upload cycle.
///
/// ```text
/// Uninitialized -> Pending -> Generating -> ReadyToUpload -> Uploaded
///                                  |               |
///                                  +---------------+--> GenerationFailed
/// ```
///
/// Any state may return to `Uninitialized` through an explicit reset when a
/// pooled chunk is reused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChunkState {
  #[default]
  Uninitialized,
  /// Generation job queued.
  Pending,
  /// A worker is building the mesh.
  Generating,
  /// Mesh built, waiting for the render thread.
  ReadyToUpload,
  /// Resident on the GPU and drawable.
  Uploaded,
  /// Generation or upload gave up. Retired without drawing.
  GenerationFailed,
}

impl ChunkState {
  /// Whether `self -> next` is a legal forward step. Reset is not included.
  pub fn can_transition_to(self, next: ChunkState) -> bool {
    use ChunkState::*;
    matches!(
      (self, next),
      (Uninitialized, Pending)
        | (Pending, Generating)
        | (Generating, ReadyToUpload)
        | (Generating, GenerationFailed)
        | (ReadyToUpload, Uploaded)
        | (ReadyToUpload, GenerationFailed)
    )
  }

  /// A worker job still owns the mesh.
  #[inline]
  pub fn is_in_flight(self) -> bool {
    matches!(self, ChunkState::Pending | ChunkState::Generating)
  }
}
