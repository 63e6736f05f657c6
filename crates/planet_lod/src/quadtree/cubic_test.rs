use std::collections::HashSet;

use super::*;

fn config() -> QuadtreeConfig {
  QuadtreeConfig {
    radius: 1000.0,
    min_node_size: 50.0,
    comparator: 1.25,
    origin: DVec3::ZERO,
  }
}

#[test]
fn test_far_viewer_six_roots() {
  let leaves = CubicQuadTree::build(DVec3::splat(1.0e7), config()).unwrap();
  assert_eq!(leaves.len(), 6);

  let faces: HashSet<CubeFace> = leaves.iter().map(|leaf| leaf.face).collect();
  assert_eq!(faces.len(), 6);
  assert!(leaves.iter().all(|leaf| leaf.depth == 0 && leaf.size() == 2000.0));
}

#[test]
fn test_invalid_comparator_builds_nothing() {
  let result = CubicQuadTree::new(QuadtreeConfig {
    comparator: 0.0,
    ..config()
  });
  assert!(result.is_err());
}

/// Viewer at 1300 on +X: the near face carries more detail than the far one.
#[test]
fn test_near_face_has_more_leaves() {
  let mut tree = CubicQuadTree::new(config()).unwrap();
  tree.insert(DVec3::new(1300.0, 0.0, 0.0));

  let counts = tree.leaf_count_per_face();
  let near = counts[CubeFace::PosX.index()];
  let far = counts[CubeFace::NegX.index()];
  assert!(near > far, "near {near} should exceed far {far}");
  assert_eq!(counts.iter().sum::<usize>(), tree.leaves().len());
}

/// +Y and -Y mirror each other for a viewer on the X axis.
#[test]
fn test_side_faces_symmetric() {
  let mut tree = CubicQuadTree::new(config()).unwrap();
  tree.insert(DVec3::new(1300.0, 0.0, 0.0));
  let counts = tree.leaf_count_per_face();

  assert_eq!(counts[CubeFace::PosY.index()], counts[CubeFace::NegY.index()]);
}

#[test]
fn test_ids_unique_within_frame() {
  let leaves = CubicQuadTree::build(DVec3::new(0.0, 1050.0, 300.0), config()).unwrap();
  let ids: HashSet<ChunkId> = leaves.iter().map(|leaf| leaf.id).collect();
  assert_eq!(ids.len(), leaves.len());
}

#[test]
fn test_ids_deterministic_across_builds() {
  let viewer = DVec3::new(-700.0, 800.0, 400.0);
  let a = CubicQuadTree::build(viewer, config()).unwrap();
  let b = CubicQuadTree::build(viewer, config()).unwrap();

  let ids_a: HashSet<ChunkId> = a.iter().map(|leaf| leaf.id).collect();
  let ids_b: HashSet<ChunkId> = b.iter().map(|leaf| leaf.id).collect();
  assert_eq!(ids_a, ids_b);
}

/// Small viewer movement keeps most patches.
#[test]
fn test_small_move_shares_most_ids() {
  let a = CubicQuadTree::build(DVec3::new(1300.0, 0.0, 0.0), config()).unwrap();
  let b = CubicQuadTree::build(DVec3::new(1300.0, 5.0, 0.0), config()).unwrap();

  let ids_a: HashSet<ChunkId> = a.iter().map(|leaf| leaf.id).collect();
  let shared = b.iter().filter(|leaf| ids_a.contains(&leaf.id)).count();
  assert!(shared * 2 > b.len(), "only {shared} of {} shared", b.len());
}

#[test]
fn test_leaf_matches_side_transform() {
  let tree = CubicQuadTree::new(config()).unwrap();
  for face in CubeFace::ALL {
    let side = tree.side(face);
    assert_eq!(side.face(), face);
    let expected = face.local_to_world(1000.0);
    assert!(side.local_to_world().abs_diff_eq(expected, 1e-12));
  }
}
