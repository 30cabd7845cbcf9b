//! Signed distance to a triangle mesh.
//!
//! Unsigned distance comes from the nearest triangle (found through a
//! [`TriangleBvh`]). Sign comes from the angle-weighted vertex normals,
//! interpolated with the barycentric weights of the closest point: the query
//! is inside when it lies behind that normal.

use std::sync::Arc;

use glam::Vec3;

use super::bvh::TriangleBvh;
use super::normals::angle_weighted_normals;
use super::triangle::{closest_point_on_triangle, face_normal};
use super::SurfaceOracle;
use crate::types::{Aabb, TriangleMesh};

/// Nearest surface point for a query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
  /// Closest point on the mesh.
  pub point: Vec3,
  /// Triangle containing the closest point.
  pub triangle: u32,
  /// Barycentric weights of `point` within the triangle.
  pub barycentric: Vec3,
  /// Interpolated pseudo-normal used for the inside/outside test.
  pub normal: Vec3,
  /// Unsigned distance from the query.
  pub distance: f32,
}

/// BVH-accelerated signed distance oracle for a triangle mesh.
#[derive(Clone, Debug)]
pub struct MeshOracle {
  mesh: Arc<TriangleMesh>,
  normals: Vec<Vec3>,
  bvh: TriangleBvh,
}

impl MeshOracle {
  /// Index `mesh` for distance queries.
  ///
  /// Triangles referencing missing vertices are left out of the index.
  /// An empty mesh produces an oracle that reports `+inf` everywhere.
  pub fn new(mesh: impl Into<Arc<TriangleMesh>>) -> Self {
    let mesh = mesh.into();
    let vertex_count = mesh.vertices.len();

    let valid: Vec<u32> = (0..mesh.triangle_count())
      .filter(|&t| {
        mesh
          .triangle_indices(t)
          .iter()
          .all(|&i| i < vertex_count)
      })
      .map(|t| t as u32)
      .collect();
    if valid.len() != mesh.triangle_count() {
      tracing::warn!(
        skipped = mesh.triangle_count() - valid.len(),
        "mesh oracle skipped triangles with out-of-range indices"
      );
    }

    let normals = angle_weighted_normals(&mesh);
    let bvh = TriangleBvh::build(&mesh, valid);

    Self { mesh, normals, bvh }
  }

  /// The indexed mesh.
  pub fn mesh(&self) -> &Arc<TriangleMesh> {
    &self.mesh
  }

  /// Angle-weighted normal per vertex.
  pub fn vertex_normals(&self) -> &[Vec3] {
    &self.normals
  }

  /// True if no triangle is indexed.
  pub fn is_empty(&self) -> bool {
    self.bvh.is_empty()
  }

  /// Bounds of the indexed triangles.
  pub fn bounds(&self) -> Option<Aabb> {
    self.bvh.bounds()
  }

  /// Closest point on the surface, `None` for an empty mesh.
  pub fn nearest(&self, point: Vec3) -> Option<SurfaceHit> {
    let mesh = &self.mesh;
    let (triangle, dist_sq) = self.bvh.nearest(point, |t| {
      let [a, b, c] = mesh.triangle(t as usize);
      (closest_point_on_triangle(point, a, b, c).0 - point).length_squared()
    })?;

    let [a, b, c] = mesh.triangle(triangle as usize);
    let (closest, barycentric) = closest_point_on_triangle(point, a, b, c);
    let [ia, ib, ic] = mesh.triangle_indices(triangle as usize);
    let mut normal = self.normals[ia] * barycentric.x
      + self.normals[ib] * barycentric.y
      + self.normals[ic] * barycentric.z;
    if normal.length_squared() <= f32::EPSILON {
      normal = face_normal(a, b, c);
    }

    Some(SurfaceHit {
      point: closest,
      triangle,
      barycentric,
      normal,
      distance: dist_sq.sqrt(),
    })
  }

  /// Distance to the surface without sign.
  pub fn unsigned_distance(&self, point: Vec3) -> f32 {
    self
      .nearest(point)
      .map_or(f32::INFINITY, |hit| hit.distance)
  }
}

impl SurfaceOracle for MeshOracle {
  fn signed_distance(&self, point: Vec3) -> f32 {
    match self.nearest(point) {
      None => f32::INFINITY,
      Some(hit) => {
        if (point - hit.point).dot(hit.normal) < 0.0 {
          -hit.distance
        } else {
          hit.distance
        }
      }
    }
  }
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
