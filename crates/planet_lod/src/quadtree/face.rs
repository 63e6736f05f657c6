//! The six cube faces and their face-plane-to-cube transforms.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::{DAffine3, DVec3};

/// Number of cube faces.
pub const CUBE_FACES: usize = 6;

/// One face of the cube circumscribing the sphere.
///
/// Discriminants are the face indices used in chunk identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CubeFace {
  /// +Y face (top)
  PosY = 0,
  /// -Y face (bottom)
  NegY = 1,
  /// +X face (right)
  PosX = 2,
  /// -X face (left)
  NegX = 3,
  /// +Z face (front)
  PosZ = 4,
  /// -Z face (back)
  NegZ = 5,
}

impl CubeFace {
  /// All six faces in index order.
  pub const ALL: [CubeFace; CUBE_FACES] = [
    CubeFace::PosY,
    CubeFace::NegY,
    CubeFace::PosX,
    CubeFace::NegX,
    CubeFace::PosZ,
    CubeFace::NegZ,
  ];

  /// Face index (0-5).
  #[inline]
  pub const fn index(self) -> usize {
    self as usize
  }

  pub const fn from_index(index: usize) -> Option<CubeFace> {
    match index {
      0 => Some(CubeFace::PosY),
      1 => Some(CubeFace::NegY),
      2 => Some(CubeFace::PosX),
      3 => Some(CubeFace::NegX),
      4 => Some(CubeFace::PosZ),
      5 => Some(CubeFace::NegZ),
      _ => None,
    }
  }

  /// Outward unit normal of the face.
  pub const fn normal(self) -> DVec3 {
    match self {
      CubeFace::PosY => DVec3::Y,
      CubeFace::NegY => DVec3::NEG_Y,
      CubeFace::PosX => DVec3::X,
      CubeFace::NegX => DVec3::NEG_X,
      CubeFace::PosZ => DVec3::Z,
      CubeFace::NegZ => DVec3::NEG_Z,
    }
  }

  /// The face opposite this one.
  pub const fn opposite(self) -> CubeFace {
    match self {
      CubeFace::PosY => CubeFace::NegY,
      CubeFace::NegY => CubeFace::PosY,
      CubeFace::PosX => CubeFace::NegX,
      CubeFace::NegX => CubeFace::PosX,
      CubeFace::PosZ => CubeFace::NegZ,
      CubeFace::NegZ => CubeFace::PosZ,
    }
  }

  /// Rigid transform placing the face plane (z = 0, extent ±radius) onto
  /// this cube face: rotate the plane, then translate by `radius` along the
  /// face normal. Local +Z maps to the outward normal on every face.
  pub fn local_to_world(self, radius: f64) -> DAffine3 {
    let rotation = match self {
      CubeFace::PosY => DAffine3::from_rotation_x(-FRAC_PI_2),
      CubeFace::NegY => DAffine3::from_rotation_x(FRAC_PI_2),
      CubeFace::PosX => DAffine3::from_rotation_y(FRAC_PI_2),
      CubeFace::NegX => DAffine3::from_rotation_y(-FRAC_PI_2),
      CubeFace::PosZ => DAffine3::IDENTITY,
      CubeFace::NegZ => DAffine3::from_rotation_y(PI),
    };
    DAffine3::from_translation(self.normal() * radius) * rotation
  }

  /// The face whose axis dominates `direction`.
  pub fn from_direction(direction: DVec3) -> CubeFace {
    let abs = direction.abs();
    if abs.x >= abs.y && abs.x >= abs.z {
      if direction.x >= 0.0 {
        CubeFace::PosX
      } else {
        CubeFace::NegX
      }
    } else if abs.y >= abs.z {
      if direction.y >= 0.0 {
        CubeFace::PosY
      } else {
        CubeFace::NegY
      }
    } else if direction.z >= 0.0 {
      CubeFace::PosZ
    } else {
      CubeFace::NegZ
    }
  }
}

/// Precomputed transforms for all faces at one radius.
pub fn face_transforms(radius: f64) -> [DAffine3; CUBE_FACES] {
  CubeFace::ALL.map(|face| face.local_to_world(radius))
}
