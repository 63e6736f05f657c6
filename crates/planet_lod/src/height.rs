//! Height and color fields sampled during chunk generation.
//!
//! Both are pure functions called concurrently from worker threads. Any
//! `Fn(DVec3, f64) -> f64 + Send + Sync` closure is a height field and any
//! `Fn(DVec3, f64) -> [u8; 4] + Send + Sync` closure is a color field.
//!
//! Chunk generation samples the height field at the planet-local surface
//! point scaled by the terrain frequency, and multiplies the result by the
//! terrain amplitude.

use glam::DVec3;

/// Scalar displacement along the outward normal.
pub trait HeightField: Send + Sync {
  fn height(&self, position: DVec3, radius: f64) -> f64;
}

impl<F> HeightField for F
where
  F: Fn(DVec3, f64) -> f64 + Send + Sync,
{
  #[inline]
  fn height(&self, position: DVec3, radius: f64) -> f64 {
    self(position, radius)
  }
}

/// Per-vertex RGBA8 color.
pub trait ColorField: Send + Sync {
  fn color(&self, position: DVec3, height: f64) -> [u8; 4];
}

impl<F> ColorField for F
where
  F: Fn(DVec3, f64) -> [u8; 4] + Send + Sync,
{
  #[inline]
  fn color(&self, position: DVec3, height: f64) -> [u8; 4] {
    self(position, height)
  }
}

/// Perfect sphere.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatHeight;

impl HeightField for FlatHeight {
  #[inline]
  fn height(&self, _position: DVec3, _radius: f64) -> f64 {
    0.0
  }
}

/// Hashed-lattice value noise summed over octaves (fBm).
///
/// Samples the direction of `position` scaled by its length relative to the
/// radius, so the terrain frequency passed through the planet config scales
/// feature size. Output is `noise * radius * relief` with noise roughly in
/// [-1, 1]. Defaults give lunar-scale relief (0.3% of the radius).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueNoiseHeight {
  pub octaves: u8,
  /// Frequency multiplier per octave.
  pub lacunarity: f64,
  /// Amplitude decay per octave.
  pub persistence: f64,
  /// Height as a fraction of the radius at noise = 1.
  pub relief: f64,
  pub seed: u32,
}

impl Default for ValueNoiseHeight {
  fn default() -> Self {
    Self {
      octaves: 5,
      lacunarity: 2.0,
      persistence: 0.5,
      relief: 0.003,
      seed: 0,
    }
  }
}

impl ValueNoiseHeight {
  pub fn with_seed(seed: u32) -> Self {
    Self {
      seed,
      ..Default::default()
    }
  }

  /// fBm value noise in roughly [-1, 1].
  pub fn sample(&self, point: DVec3) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_amplitude = 0.0;

    for octave in 0..self.octaves.max(1) {
      let seed = self.seed.wrapping_add((octave as u32).wrapping_mul(0x9e37_79b9));
      total += value_noise(point * frequency, seed) * amplitude;
      max_amplitude += amplitude;
      amplitude *= self.persistence;
      frequency *= self.lacunarity;
    }

    total / max_amplitude
  }
}

impl HeightField for ValueNoiseHeight {
  fn height(&self, position: DVec3, radius: f64) -> f64 {
    if radius <= 0.0 {
      return 0.0;
    }
    self.sample(position / radius) * radius * self.relief
  }
}

#[inline]
fn hash(mut x: u32) -> u32 {
  x = x.wrapping_add(x << 10);
  x ^= x >> 6;
  x = x.wrapping_add(x << 3);
  x ^= x >> 11;
  x.wrapping_add(x << 15)
}

/// Lattice value in [-1, 1].
#[inline]
fn lattice(x: i32, y: i32, z: i32, seed: u32) -> f64 {
  let h = hash(x as u32 ^ hash(y as u32 ^ hash(z as u32 ^ seed)));
  (h & 0xffff) as f64 / 65535.0 * 2.0 - 1.0
}

#[inline]
fn smoothstep(t: f64) -> f64 {
  t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
  a + (b - a) * t
}

/// Trilinear value noise with smoothstep easing.
fn value_noise(p: DVec3, seed: u32) -> f64 {
  let base = p.floor();
  let f = p - base;
  let (x0, y0, z0) = (base.x as i32, base.y as i32, base.z as i32);
  let (sx, sy, sz) = (smoothstep(f.x), smoothstep(f.y), smoothstep(f.z));

  let corner = |dx: i32, dy: i32, dz: i32| {
    lattice(x0.wrapping_add(dx), y0.wrapping_add(dy), z0.wrapping_add(dz), seed)
  };

  let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), sx);
  let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), sx);
  let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), sx);
  let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), sx);

  let y0 = lerp(x00, x10, sy);
  let y1 = lerp(x01, x11, sy);
  lerp(y0, y1, sz)
}

#[cfg(test)]
#[path = "height_test.rs"]
mod height_test;
