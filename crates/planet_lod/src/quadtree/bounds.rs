//! Axis-aligned bounding box in face-local 2D space.

use glam::DVec2;

/// Double-precision 2D axis-aligned box on a cube face plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBounds {
  /// Minimum corner (inclusive).
  pub min: DVec2,
  /// Maximum corner (inclusive).
  pub max: DVec2,
}

impl FaceBounds {
  /// Create a box from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on both axes.
  pub fn new(min: DVec2, max: DVec2) -> Self {
    debug_assert!(
      min.x <= max.x && min.y <= max.y,
      "bounds min must be <= max on both axes"
    );
    Self { min, max }
  }

  /// Square box centered on the face origin with the given half-extent.
  pub fn centered(half_extent: f64) -> Self {
    Self {
      min: DVec2::splat(-half_extent),
      max: DVec2::splat(half_extent),
    }
  }

  #[inline]
  pub fn size(&self) -> DVec2 {
    self.max - self.min
  }

  #[inline]
  pub fn center(&self) -> DVec2 {
    (self.min + self.max) * 0.5
  }

  #[inline]
  pub fn contains_point(&self, point: DVec2) -> bool {
    point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
  }

  /// Split into four quadrants sharing the midpoint.
  ///
  /// Order: bottom-left, bottom-right, top-left, top-right.
  pub fn quadrants(&self) -> [FaceBounds; 4] {
    let mid = self.center();
    [
      FaceBounds::new(self.min, mid),
      FaceBounds::new(DVec2::new(mid.x, self.min.y), DVec2::new(self.max.x, mid.y)),
      FaceBounds::new(DVec2::new(self.min.x, mid.y), DVec2::new(mid.x, self.max.y)),
      FaceBounds::new(mid, self.max),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_centered() {
    let bounds = FaceBounds::centered(10.0);
    assert_eq!(bounds.min, DVec2::splat(-10.0));
    assert_eq!(bounds.max, DVec2::splat(10.0));
    assert_eq!(bounds.center(), DVec2::ZERO);
    assert_eq!(bounds.size(), DVec2::splat(20.0));
  }

  #[test]
  fn test_contains_point() {
    let bounds = FaceBounds::new(DVec2::ZERO, DVec2::splat(10.0));
    assert!(bounds.contains_point(DVec2::splat(5.0)));
    assert!(bounds.contains_point(DVec2::ZERO));
    assert!(bounds.contains_point(DVec2::splat(10.0)));
    assert!(!bounds.contains_point(DVec2::new(11.0, 5.0)));
  }

  #[test]
  fn test_quadrants_tile_parent() {
    let parent = FaceBounds::new(DVec2::new(-4.0, -2.0), DVec2::new(4.0, 6.0));
    let [bl, br, tl, tr] = parent.quadrants();

    assert_eq!(bl, FaceBounds::new(DVec2::new(-4.0, -2.0), DVec2::new(0.0, 2.0)));
    assert_eq!(br, FaceBounds::new(DVec2::new(0.0, -2.0), DVec2::new(4.0, 2.0)));
    assert_eq!(tl, FaceBounds::new(DVec2::new(-4.0, 2.0), DVec2::new(0.0, 6.0)));
    assert_eq!(tr, FaceBounds::new(DVec2::new(0.0, 2.0), DVec2::new(4.0, 6.0)));

    for quadrant in parent.quadrants() {
      assert_eq!(quadrant.size(), parent.size() * 0.5);
    }
  }
}
