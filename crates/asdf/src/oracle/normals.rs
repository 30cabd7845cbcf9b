//! Angle-weighted vertex normals.
//!
//! Each face normal contributes to its three vertices weighted by the
//! interior angle the face subtends at that vertex. Unlike area or uniform
//! weighting, the result does not depend on how a flat region happens to be
//! triangulated, which makes it a reliable inside/outside indicator near
//! vertices and edges.

use glam::Vec3;

use super::triangle::face_normal;
use crate::types::TriangleMesh;

/// Compute one unit normal per vertex. Vertices not referenced by any
/// non-degenerate triangle get a zero normal.
///
/// Triangles with out-of-range indices are skipped.
pub fn angle_weighted_normals(mesh: &TriangleMesh) -> Vec<Vec3> {
  let mut normals = vec![Vec3::ZERO; mesh.vertices.len()];
  let vertex_count = mesh.vertices.len();

  for tri in 0..mesh.triangle_count() {
    let ids = mesh.triangle_indices(tri);
    if ids.iter().any(|&i| i >= vertex_count) {
      continue;
    }
    let p = ids.map(|i| mesh.vertices[i]);
    let n = face_normal(p[0], p[1], p[2]);
    if n == Vec3::ZERO {
      continue;
    }

    for corner in 0..3 {
      let here = p[corner];
      let e1 = p[(corner + 1) % 3] - here;
      let e2 = p[(corner + 2) % 3] - here;
      if e1.length_squared() == 0.0 || e2.length_squared() == 0.0 {
        continue;
      }
      normals[ids[corner]] += n * e1.angle_between(e2);
    }
  }

  for n in &mut normals {
    *n = n.normalize_or_zero();
  }
  normals
}
