//! Patch mesh synthesis.
//!
//! Runs on worker threads. Builds a `(resolution + 1)²` grid over the
//! patch's face-local rectangle, projects every vertex onto the sphere and
//! displaces it by the height field.
//!
//! # Vertex Layout
//!
//! ```text
//! row j = 0..=res, column i = 0..=res, index = j * (res + 1) + i
//!
//!   tl ---- tr      per cell: (bl, br, tl) (br, tr, tl)
//!   |     / |       counter-clockwise seen from outside,
//!   |   /   |       swapped when inverted
//!   | /     |
//!   bl ---- br
//! ```
//!
//! The optional skirt appends one ring of `4 * (res + 1)` vertices walking
//! the boundary counter-clockwise (bottom, right, top, left), each sunk
//! along its radial direction by the skirt depth.

use glam::{DVec2, DVec3, Vec3};

use super::{ChunkMesh, ChunkParams};
use crate::error::GenerationError;
use crate::height::{ColorField, HeightField};
use crate::math::{face_to_cube, triangle_normal};

/// Fill `mesh` with the patch described by `params`.
///
/// Buffers are cleared first and grown with `try_reserve`, so a reused mesh
/// keeps its allocation.
pub fn generate(
  params: &ChunkParams,
  height: &dyn HeightField,
  color: Option<&dyn ColorField>,
  mesh: &mut ChunkMesh,
) -> Result<(), GenerationError> {
  mesh.clear();

  let res = params.resolution.max(1) as usize;
  let side = res + 1;
  let grid_vertices = side * side;
  let vertex_total = params.vertex_count();

  mesh.positions.try_reserve(vertex_total)?;
  mesh.normals.try_reserve(vertex_total)?;
  mesh.uvs.try_reserve(vertex_total)?;
  if color.is_some() {
    mesh.colors.try_reserve(vertex_total)?;
  }
  mesh.indices.try_reserve(params.index_count())?;

  let anchor = params.anchor();
  mesh.anchor = anchor;
  let step = 1.0 / res as f64;

  for j in 0..side {
    for i in 0..side {
      let uv = DVec2::new(i as f64 * step, j as f64 * step);
      let (world, h) = sample_vertex(params, height, uv);

      let rel = (world - anchor).as_vec3().to_array();
      mesh.positions.push(rel);
      mesh.bounds.encapsulate(rel);
      mesh.uvs.push([uv.x as f32, uv.y as f32]);
      if let Some(color) = color {
        mesh.colors.push(color.color(world, h));
      }
    }
  }

  for j in 0..res {
    for i in 0..res {
      let bl = (j * side + i) as u32;
      let br = bl + 1;
      let tl = bl + side as u32;
      let tr = tl + 1;
      push_triangle(&mut mesh.indices, [bl, br, tl], params.inverted);
      push_triangle(&mut mesh.indices, [br, tr, tl], params.inverted);
    }
  }

  compute_normals(mesh, params, grid_vertices);

  if let Some(skirt) = params.skirt {
    append_skirt(mesh, params, skirt.depth(params.width), res);
  }

  Ok(())
}

/// World position and scaled height of the grid point at `uv`.
fn sample_vertex(params: &ChunkParams, height: &dyn HeightField, uv: DVec2) -> (DVec3, f64) {
  let local = params.offset + DVec2::new(uv.x * params.width, uv.y * params.height);
  let dir = face_to_cube(&params.local_to_world, local).normalize();
  let surface = dir * params.radius;
  let h = height.height(surface * params.terrain.frequency, params.radius) * params.terrain.amplitude;
  (params.origin + dir * (params.radius + h), h)
}

#[inline]
fn push_triangle(indices: &mut Vec<u32>, [a, b, c]: [u32; 3], inverted: bool) {
  if inverted {
    indices.extend_from_slice(&[a, c, b]);
  } else {
    indices.extend_from_slice(&[a, b, c]);
  }
}

/// Radial direction of a stored vertex, as seen from the planet origin.
#[inline]
fn radial(mesh: &ChunkMesh, params: &ChunkParams, vertex: usize) -> DVec3 {
  let offset = Vec3::from(mesh.positions[vertex]).as_dvec3();
  (mesh.anchor - params.origin + offset).normalize_or_zero()
}

/// Area-weighted vertex normals over the grid triangles.
fn compute_normals(mesh: &mut ChunkMesh, params: &ChunkParams, grid_vertices: usize) {
  mesh.normals.resize(grid_vertices, [0.0; 3]);

  for tri in mesh.indices.chunks_exact(3) {
    let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
    let n = triangle_normal(
      Vec3::from(mesh.positions[a]),
      Vec3::from(mesh.positions[b]),
      Vec3::from(mesh.positions[c]),
    );
    for v in [a, b, c] {
      mesh.normals[v] = (Vec3::from(mesh.normals[v]) + n).to_array();
    }
  }

  for v in 0..grid_vertices {
    let normal = Vec3::from(mesh.normals[v]).try_normalize().unwrap_or_else(|| {
      let up = radial(mesh, params, v).as_vec3();
      if params.inverted {
        -up
      } else {
        up
      }
    });
    mesh.normals[v] = normal.to_array();
  }
}

/// Grid coordinates of ring vertex `t` on boundary run `run`.
#[inline]
fn boundary_vertex(run: usize, t: usize, res: usize) -> (usize, usize) {
  match run {
    0 => (t, 0),
    1 => (res, t),
    2 => (res - t, res),
    _ => (0, res - t),
  }
}

fn append_skirt(mesh: &mut ChunkMesh, params: &ChunkParams, depth: f64, res: usize) {
  let side = res + 1;
  let ring_start = mesh.positions.len();
  let has_color = !mesh.colors.is_empty();

  for run in 0..4 {
    for t in 0..side {
      let (i, j) = boundary_vertex(run, t, res);
      let src = j * side + i;

      let dir = radial(mesh, params, src);
      let world = mesh.anchor + Vec3::from(mesh.positions[src]).as_dvec3() - dir * depth;
      let rel = (world - mesh.anchor).as_vec3().to_array();

      mesh.positions.push(rel);
      mesh.bounds.encapsulate(rel);
      mesh.normals.push(mesh.normals[src]);
      mesh.uvs.push(mesh.uvs[src]);
      if has_color {
        mesh.colors.push(mesh.colors[src]);
      }
    }
  }

  for run in 0..4 {
    for t in 0..res {
      let (ai, aj) = boundary_vertex(run, t, res);
      let (bi, bj) = boundary_vertex(run, t + 1, res);
      let a = (aj * side + ai) as u32;
      let b = (bj * side + bi) as u32;
      let a_low = (ring_start + run * side + t) as u32;
      let b_low = a_low + 1;
      push_triangle(&mut mesh.indices, [a, a_low, b], params.inverted);
      push_triangle(&mut mesh.indices, [b, a_low, b_low], params.inverted);
    }
  }
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod generate_test;
