//! Benchmarks for distance field construction and queries.
//!
//! Workloads use a 64x32 UV sphere, about 4k triangles, which is in the
//! range of the collision meshes the fields are baked from.

use std::sync::Arc;

use asdf::octree::{build, build_from_mesh, BuildConfig};
use asdf::oracle::{MeshOracle, SphereOracle, SurfaceOracle};
use asdf::{shapes, Aabb, DistanceField, TriangleMesh, VolumeTexture};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::Vec3;

const QUERY_COUNT: usize = 4096;

fn sphere_mesh() -> Arc<TriangleMesh> {
	Arc::new(shapes::uv_sphere(1.0, 64, 32))
}

fn query_points() -> Vec<Vec3> {
	// Deterministic lattice-ish spread through the root cube
	(0..QUERY_COUNT)
		.map(|i| {
			let f = i as f32;
			Vec3::new((f * 0.618).fract(), (f * 0.414).fract(), (f * 0.732).fract()) * 2.2 - 1.1
		})
		.collect()
}

// ============================================================================
// Construction
// ============================================================================

/// Full mesh build at increasing depth.
fn bench_build_depth(c: &mut Criterion) {
	let mut group = c.benchmark_group("build_sphere_mesh");
	group.sample_size(10);
	let mesh = sphere_mesh();

	for depth in [2, 3, 4, 5] {
		let config = BuildConfig::default().with_max_depth(depth).with_max_error(1e-4);
		group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
			b.iter(|| black_box(build_from_mesh(Arc::clone(&mesh), config.clone()).node_count()))
		});
	}

	group.finish();
}

/// Builder overhead alone, with an analytic oracle.
fn bench_build_analytic(c: &mut Criterion) {
	let bounds = Some(Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0)));
	let config = BuildConfig::default().with_max_depth(6).with_max_error(1e-5);

	c.bench_function("build_analytic_sphere_depth6", |b| {
		b.iter(|| black_box(build(SphereOracle::new(1.0), bounds, config.clone()).node_count()))
	});
}

// ============================================================================
// Queries
// ============================================================================

/// Octree sampling against the exact mesh distance it approximates.
fn bench_queries(c: &mut Criterion) {
	let mesh = sphere_mesh();
	let oracle = MeshOracle::new(Arc::clone(&mesh));
	let field: DistanceField = build_from_mesh(mesh, BuildConfig::default().with_max_depth(5));
	let points = query_points();

	let mut group = c.benchmark_group("query_4096_points");
	group.throughput(Throughput::Elements(QUERY_COUNT as u64));

	group.bench_function("field_sample", |b| {
		b.iter(|| points.iter().map(|p| field.sample(*p)).sum::<f32>())
	});
	group.bench_function("mesh_oracle", |b| {
		b.iter(|| points.iter().map(|p| oracle.signed_distance(*p)).sum::<f32>())
	});

	group.finish();
}

/// Volume rasterization, one sample per voxel.
fn bench_rasterize(c: &mut Criterion) {
	let field = build_from_mesh(sphere_mesh(), BuildConfig::default().with_max_depth(5));
	let mut group = c.benchmark_group("rasterize");

	for resolution in [16usize, 32, 64] {
		group.throughput(Throughput::Elements(resolution.pow(3) as u64));
		group.bench_with_input(BenchmarkId::from_parameter(resolution), &resolution, |b, &res| {
			b.iter(|| black_box(VolumeTexture::rasterize(&field, field.bounds(), res)))
		});
	}

	group.finish();
}

criterion_group!(benches, bench_build_depth, bench_build_analytic, bench_queries, bench_rasterize);
criterion_main!(benches);
