//! Engine-agnostic metrics collection for planet streaming.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use planet_lod::metrics::{PlanetMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let metrics = planet.metrics();
//! println!("avg update {:.1}us", metrics.avg_update_timing_us());
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

use crate::quadtree::FaceLeaf;
use crate::stats::UpdateStats;

/// Depth buckets tracked; deeper leaves land in the last one.
pub const MAX_TRACKED_DEPTH: usize = 24;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Fixed-capacity history, oldest values evicted first.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.capacity == 0 {
      return;
    }
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Oldest to newest.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl RollingWindow<u64> {
  pub fn sum(&self) -> u64 {
    self.buffer.iter().sum()
  }

  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.buffer.iter().min()?;
    let max = self.buffer.iter().max()?;
    Some((*min, *max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128) // ~2 seconds at 60fps
  }
}

/// Planet-level statistics updated each streaming cycle.
#[derive(Debug, Clone)]
pub struct PlanetMetrics {
  // LOD distribution
  /// Leaves at each quadtree depth (index = depth).
  pub leaves_per_depth: [u32; MAX_TRACKED_DEPTH],

  // Residency
  pub resident_chunks: usize,
  pub pooled_chunks: usize,
  /// CPU mesh bytes held by uploaded chunks.
  pub mesh_memory_bytes: u64,

  // Timing
  /// Update wall time in microseconds.
  pub update_timings: RollingWindow<u64>,
  /// Per-chunk generation time in microseconds.
  pub generation_timings: RollingWindow<u64>,
  pub last_update_us: u64,
  pub last_generation_us: u64,

  // Cumulative
  pub total_chunks_generated: u64,
  pub total_chunks_allocated: u64,
  pub total_uploads: u64,
  pub total_failures: u64,
}

impl Default for PlanetMetrics {
  fn default() -> Self {
    Self {
      leaves_per_depth: [0; MAX_TRACKED_DEPTH],
      resident_chunks: 0,
      pooled_chunks: 0,
      mesh_memory_bytes: 0,
      update_timings: RollingWindow::default(),
      generation_timings: RollingWindow::default(),
      last_update_us: 0,
      last_generation_us: 0,
      total_chunks_generated: 0,
      total_chunks_allocated: 0,
      total_uploads: 0,
      total_failures: 0,
    }
  }
}

impl PlanetMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reset per-frame values and histories. Cumulative totals are kept.
  pub fn reset(&mut self) {
    self.leaves_per_depth.fill(0);
    self.resident_chunks = 0;
    self.pooled_chunks = 0;
    self.mesh_memory_bytes = 0;
    self.update_timings.clear();
    self.generation_timings.clear();
    self.last_update_us = 0;
    self.last_generation_us = 0;
  }

  /// Rebuild the depth histogram from this frame's leaves.
  pub fn record_leaves(&mut self, leaves: &[FaceLeaf]) {
    if !is_enabled() {
      return;
    }
    self.leaves_per_depth.fill(0);
    for leaf in leaves {
      let depth = (leaf.depth as usize).min(MAX_TRACKED_DEPTH - 1);
      self.leaves_per_depth[depth] += 1;
    }
  }

  pub fn record_update(&mut self, stats: &UpdateStats, timing_us: u64) {
    if !is_enabled() {
      return;
    }
    self.update_timings.push(timing_us);
    self.last_update_us = timing_us;
    self.total_chunks_allocated += stats.allocated as u64;
  }

  /// Upload and failure counters from a poll. Called once per `poll_ready`.
  pub fn record_uploads(&mut self, stats: &UpdateStats) {
    if !is_enabled() {
      return;
    }
    self.total_uploads += stats.uploaded as u64;
    self.total_failures += stats.generation_failures as u64;
  }

  pub fn record_generation_timing(&mut self, timing_us: u64) {
    if !is_enabled() {
      return;
    }
    self.generation_timings.push(timing_us);
    self.last_generation_us = timing_us;
    self.total_chunks_generated += 1;
  }

  pub fn record_residency(&mut self, resident: usize, pooled: usize, mesh_memory_bytes: u64) {
    if !is_enabled() {
      return;
    }
    self.resident_chunks = resident;
    self.pooled_chunks = pooled;
    self.mesh_memory_bytes = mesh_memory_bytes;
  }

  pub fn total_leaves(&self) -> u32 {
    self.leaves_per_depth.iter().sum()
  }

  pub fn avg_update_timing_us(&self) -> f64 {
    self.update_timings.average()
  }

  pub fn avg_generation_timing_us(&self) -> f64 {
    self.generation_timings.average()
  }

  pub fn mesh_memory_mb(&self) -> f64 {
    self.mesh_memory_bytes as f64 / 1_048_576.0
  }
}
