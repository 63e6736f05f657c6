//! Planet streaming benchmarks.
//!
//! - **tree**: per-frame cubic quadtree rebuild and leaf extraction
//! - **generate**: one chunk mesh at several resolutions
//! - **update**: steady-state `Planet::update` (no movement, pure reuse)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::{DVec2, DVec3};
use planet_lod::{
  chunk::generate, ChunkMesh, ChunkParams, CubeFace, CubicQuadTree, FlatHeight, NullRenderer,
  Planet, PlanetConfig, SkirtConfig, TerrainParams, ValueNoiseHeight,
};

const RADIUS: f64 = 6_000.0;

// =============================================================================
// Quadtree
// =============================================================================

fn bench_tree_build(c: &mut Criterion) {
  let mut group = c.benchmark_group("cubic_tree_build");

  for min_node_size in [200.0, 50.0, 10.0] {
    let config = PlanetConfig::new(RADIUS, min_node_size, 16).quadtree_config();
    let viewer = DVec3::new(RADIUS + 100.0, 0.0, 0.0);

    group.bench_with_input(
      BenchmarkId::from_parameter(min_node_size),
      &config,
      |b, config| {
        b.iter(|| {
          let leaves = CubicQuadTree::build(black_box(viewer), *config).unwrap();
          black_box(leaves.len())
        })
      },
    );
  }

  group.finish();
}

// =============================================================================
// Chunk generation
// =============================================================================

fn bench_chunk_generate(c: &mut Criterion) {
  let mut group = c.benchmark_group("chunk_generate");
  let noise = ValueNoiseHeight::default();

  for resolution in [16u32, 32, 64] {
    let params = ChunkParams {
      face: CubeFace::PosX,
      offset: DVec2::new(-250.0, -250.0),
      width: 500.0,
      height: 500.0,
      radius: RADIUS,
      resolution,
      origin: DVec3::ZERO,
      local_to_world: CubeFace::PosX.local_to_world(RADIUS),
      terrain: TerrainParams::default(),
      skirt: Some(SkirtConfig::default()),
      inverted: false,
    };
    let mut mesh = ChunkMesh::new();

    group.throughput(Throughput::Elements(params.vertex_count() as u64));
    group.bench_with_input(BenchmarkId::from_parameter(resolution), &params, |b, params| {
      b.iter(|| {
        generate(params, &noise, None, &mut mesh).unwrap();
        black_box(mesh.vertex_count())
      })
    });
  }

  group.finish();
}

// =============================================================================
// Planet update
// =============================================================================

fn bench_steady_update(c: &mut Criterion) {
  let config = PlanetConfig::new(RADIUS, 50.0, 16);
  let mut planet = Planet::new(config, FlatHeight, NullRenderer).unwrap();
  let viewer = DVec3::new(RADIUS + 200.0, 0.0, 0.0);
  planet.update(viewer);
  planet.flush();

  c.bench_function("planet_update_steady", |b| {
    b.iter(|| black_box(planet.update(black_box(viewer))))
  });
}

criterion_group!(
  benches,
  bench_tree_build,
  bench_chunk_generate,
  bench_steady_update
);
criterion_main!(benches);
