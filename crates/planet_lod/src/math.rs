//! Vector helpers shared by the quadtree and chunk generation.

use glam::{DAffine3, DVec2, DVec3, Vec3};

/// Lift a face-local 2D point onto its cube face in 3D.
#[inline]
pub fn face_to_cube(local_to_world: &DAffine3, point: DVec2) -> DVec3 {
  local_to_world.transform_point3(point.extend(0.0))
}

/// Project a face-local point onto the sphere surface (planet-local).
///
/// Cube point -> normalize -> scale by radius. The planet origin is not
/// added; callers offset as needed.
#[inline]
pub fn project_to_sphere(local_to_world: &DAffine3, point: DVec2, radius: f64) -> DVec3 {
  face_to_cube(local_to_world, point).normalize() * radius
}

/// Unnormalized face normal of triangle (a, b, c), counter-clockwise winding.
#[inline]
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
  (b - a).cross(c - a)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_project_lands_on_sphere() {
    let transform = DAffine3::from_translation(DVec3::new(0.0, 0.0, 100.0));
    let p = project_to_sphere(&transform, DVec2::new(37.0, -80.0), 100.0);
    assert!((p.length() - 100.0).abs() < 1e-9);
    assert!(p.z > 0.0);
  }

  #[test]
  fn test_face_center_projects_to_axis() {
    let transform = DAffine3::from_translation(DVec3::new(0.0, 0.0, 5.0));
    let p = project_to_sphere(&transform, DVec2::ZERO, 5.0);
    assert!((p - DVec3::new(0.0, 0.0, 5.0)).length() < 1e-12);
  }

  #[test]
  fn test_triangle_normal_ccw() {
    let n = triangle_normal(Vec3::ZERO, Vec3::X, Vec3::Y);
    assert_eq!(n, Vec3::Z);
  }
}
