//! Procedural test meshes.
//!
//! Closed, outward-wound meshes used by tests, benchmarks and the bake CLI.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::constants::CORNER_OFFSETS;
use crate::types::TriangleMesh;

/// Triangles of a unit cube over [`CORNER_OFFSETS`], counter-clockwise seen
/// from outside.
const CUBE_INDICES: [u32; 36] = [
  0, 1, 3, 0, 3, 2, // -X
  4, 7, 5, 4, 6, 7, // +X
  0, 4, 5, 0, 5, 1, // -Y
  2, 3, 7, 2, 7, 6, // +Y
  0, 2, 6, 0, 6, 4, // -Z
  1, 5, 7, 1, 7, 3, // +Z
];

/// Axis-aligned cube centered at the origin, 8 vertices and 12 triangles.
pub fn cube(half_extent: f32) -> TriangleMesh {
  TriangleMesh::new(
    CORNER_OFFSETS.iter().map(|c| *c * half_extent).collect(),
    CUBE_INDICES.to_vec(),
  )
}

/// UV sphere centered at the origin.
///
/// `segments` is the number of longitude divisions (min 3), `rings` the
/// number of latitude bands (min 2). Poles are single vertices.
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> TriangleMesh {
  let segments = segments.max(3);
  let rings = rings.max(2);

  let mut vertices = Vec::with_capacity((segments * (rings - 1) + 2) as usize);
  vertices.push(Vec3::new(0.0, radius, 0.0));
  for i in 1..rings {
    let theta = PI * i as f32 / rings as f32;
    let (sin_t, cos_t) = theta.sin_cos();
    for j in 0..segments {
      let phi = TAU * j as f32 / segments as f32;
      let (sin_p, cos_p) = phi.sin_cos();
      vertices.push(Vec3::new(sin_t * cos_p, cos_t, sin_t * sin_p) * radius);
    }
  }
  let bottom = vertices.len() as u32;
  vertices.push(Vec3::new(0.0, -radius, 0.0));

  let ring_start = |ring: u32| 1 + (ring - 1) * segments;
  let mut indices = Vec::with_capacity((segments * rings * 6) as usize);

  // Top cap
  let first = ring_start(1);
  for j in 0..segments {
    let next = (j + 1) % segments;
    indices.extend_from_slice(&[0, first + next, first + j]);
  }

  // Bands between consecutive rings
  for ring in 1..rings - 1 {
    let upper = ring_start(ring);
    let lower = ring_start(ring + 1);
    for j in 0..segments {
      let next = (j + 1) % segments;
      let a = upper + j;
      let b = upper + next;
      let c = lower + j;
      let d = lower + next;
      indices.extend_from_slice(&[a, b, c, b, d, c]);
    }
  }

  // Bottom cap
  let last = ring_start(rings - 1);
  for j in 0..segments {
    let next = (j + 1) % segments;
    indices.extend_from_slice(&[last + j, last + next, bottom]);
  }

  TriangleMesh::new(vertices, indices)
}
