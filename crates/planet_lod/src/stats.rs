//! Per-update streaming statistics.

use std::ops::AddAssign;

/// What one [`Planet::update`](crate::Planet::update) (or poll) did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
  /// Leaves produced by this frame's tree.
  pub leaves: usize,
  /// Chunks carried over unchanged from the previous frame.
  pub reused: usize,
  /// Chunks newly queued for generation.
  pub created: usize,
  /// Of `created`, how many came from the pool.
  pub from_pool: usize,
  /// Of `created`, how many were fresh allocations.
  pub allocated: usize,
  /// Chunks moved from the live map into the pool.
  pub retired: usize,
  /// Successful uploads.
  pub uploaded: usize,
  /// Failed upload attempts (retried or given up).
  pub upload_failures: usize,
  /// Chunks retired because generation failed or uploads ran out of retries.
  pub generation_failures: usize,
  /// New leaves skipped because `max_chunks` was reached.
  pub skipped_capacity: usize,
}

impl UpdateStats {
  /// Nothing was created, retired or uploaded.
  pub fn is_steady(&self) -> bool {
    self.created == 0 && self.retired == 0 && self.uploaded == 0
  }
}

impl AddAssign for UpdateStats {
  fn add_assign(&mut self, rhs: Self) {
    self.leaves += rhs.leaves;
    self.reused += rhs.reused;
    self.created += rhs.created;
    self.from_pool += rhs.from_pool;
    self.allocated += rhs.allocated;
    self.retired += rhs.retired;
    self.uploaded += rhs.uploaded;
    self.upload_failures += rhs.upload_failures;
    self.generation_failures += rhs.generation_failures;
    self.skipped_capacity += rhs.skipped_capacity;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_add_assign_and_steady() {
    let mut total = UpdateStats::default();
    assert!(total.is_steady());

    total += UpdateStats {
      created: 3,
      allocated: 3,
      ..Default::default()
    };
    total += UpdateStats {
      uploaded: 3,
      ..Default::default()
    };

    assert_eq!(total.created, 3);
    assert_eq!(total.uploaded, 3);
    assert!(!total.is_steady());
  }
}
