//! ChunkId - deterministic patch identity.
//!
//! The same face-local rectangle on the same face always hashes to the same
//! id, in the same frame or across frames and processes. This is the cache
//! key that turns "rebuild the visible set" into reuse lookups.

use glam::DVec2;

use super::CubeFace;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Fixed-width patch key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ChunkId(u64);

impl ChunkId {
  /// Hash `(face_index, min.x, min.y, size)`.
  pub fn new(face: CubeFace, bounds_min: DVec2, size: f64) -> Self {
    let mut hash = FNV_OFFSET;
    hash = fnv1a(hash, &[face as u8]);
    for value in [bounds_min.x, bounds_min.y, size] {
      hash = fnv1a(hash, &canonical_bits(value).to_le_bytes());
    }
    Self(mix(hash))
  }

  /// Raw key value.
  #[inline]
  pub fn raw(&self) -> u64 {
    self.0
  }
}

impl std::fmt::Display for ChunkId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:016x}", self.0)
  }
}

/// Bit pattern with -0.0 folded into 0.0.
#[inline]
fn canonical_bits(value: f64) -> u64 {
  if value == 0.0 {
    0
  } else {
    value.to_bits()
  }
}

#[inline]
fn fnv1a(mut hash: u64, bytes: &[u8]) -> u64 {
  for &byte in bytes {
    hash ^= byte as u64;
    hash = hash.wrapping_mul(FNV_PRIME);
  }
  hash
}

/// splitmix64 finalizer, spreads FNV's weak low bits.
#[inline]
fn mix(mut x: u64) -> u64 {
  x ^= x >> 30;
  x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
  x ^= x >> 27;
  x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
  x ^ (x >> 31)
}
