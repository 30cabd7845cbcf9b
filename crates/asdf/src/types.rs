//! Core geometric types: bounding boxes and indexed triangle meshes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{AsdfError, AsdfResult};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
  /// Minimum corner (inclusive).
  pub min: Vec3,
  /// Maximum corner (inclusive).
  pub max: Vec3,
}

impl Aabb {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: Vec3::splat(f32::INFINITY),
      max: Vec3::splat(f32::NEG_INFINITY),
    }
  }

  /// Create a new AABB from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: Vec3, max: Vec3) -> Self {
    debug_assert!(
      min.cmple(max).all(),
      "AABB min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Create a new AABB from center and half-extents.
  pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
    Self {
      min: center - half_extents,
      max: center + half_extents,
    }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: Vec3) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  /// Expand AABB to include another AABB.
  #[inline]
  pub fn encapsulate_aabb(&mut self, other: &Aabb) {
    self.min = self.min.min(other.min);
    self.max = self.max.max(other.max);
  }

  /// Grow the size by `amount` on every axis (each side moves `amount / 2`).
  #[inline]
  pub fn expand(&mut self, amount: f32) {
    let half = Vec3::splat(amount * 0.5);
    self.min -= half;
    self.max += half;
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min.cmple(self.max).all()
  }

  /// Check if this AABB contains a point (boundary inclusive).
  #[inline]
  pub fn contains_point(&self, point: Vec3) -> bool {
    point.cmpge(self.min).all() && point.cmple(self.max).all()
  }

  /// Squared distance from a point to the box (0 inside).
  #[inline]
  pub fn distance_squared_to(&self, point: Vec3) -> f32 {
    let d = (self.min - point).max(point - self.max).max(Vec3::ZERO);
    d.length_squared()
  }

  /// Get the size of the AABB (max - min).
  #[inline]
  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  /// Get half of the size.
  #[inline]
  pub fn half_extents(&self) -> Vec3 {
    self.size() * 0.5
  }

  /// Largest side length.
  #[inline]
  pub fn max_extent(&self) -> f32 {
    self.size().max_element()
  }

  /// Get the center of the AABB.
  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }

  /// Smallest cube sharing this box's center that encloses it, grown by
  /// `padding` on every side length.
  pub fn to_cube(&self, padding: f32) -> Self {
    let side = self.max_extent() + padding;
    Self::from_center_half_extents(self.center(), Vec3::splat(side * 0.5))
  }
}

impl Default for Aabb {
  fn default() -> Self {
    Self {
      min: Vec3::ZERO,
      max: Vec3::ZERO,
    }
  }
}

/// Indexed triangle mesh in model space.
///
/// Every 3 consecutive entries of `indices` form one triangle. Winding is
/// counter-clockwise when seen from outside; the sign of distances is
/// resolved from normals, so consistently wound closed meshes give the most
/// reliable inside/outside classification.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
  /// Vertex positions.
  pub vertices: Vec<Vec3>,
  /// Triangle vertex indices (3 per triangle).
  pub indices: Vec<u32>,
}

impl TriangleMesh {
  pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
    Self { vertices, indices }
  }

  /// Returns true if the mesh has no vertices or no complete triangle.
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty() || self.indices.len() < 3
  }

  /// Number of complete triangles.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Vertex indices of triangle `i`.
  #[inline]
  pub fn triangle_indices(&self, i: usize) -> [usize; 3] {
    let base = i * 3;
    [
      self.indices[base] as usize,
      self.indices[base + 1] as usize,
      self.indices[base + 2] as usize,
    ]
  }

  /// Vertex positions of triangle `i`.
  #[inline]
  pub fn triangle(&self, i: usize) -> [Vec3; 3] {
    let [a, b, c] = self.triangle_indices(i);
    [self.vertices[a], self.vertices[b], self.vertices[c]]
  }

  /// Bounds of all vertex positions, `None` for a mesh without vertices.
  pub fn bounds(&self) -> Option<Aabb> {
    if self.vertices.is_empty() {
      return None;
    }
    let mut bounds = Aabb::empty();
    for v in &self.vertices {
      bounds.encapsulate(*v);
    }
    Some(bounds)
  }

  /// Check index ranges, index count and vertex finiteness.
  pub fn validate(&self) -> AsdfResult<()> {
    if self.indices.len() % 3 != 0 {
      return Err(AsdfError::InvalidMesh(format!(
        "index count {} is not a multiple of 3",
        self.indices.len()
      )));
    }
    if let Some(bad) = self
      .indices
      .iter()
      .find(|&&i| i as usize >= self.vertices.len())
    {
      return Err(AsdfError::InvalidMesh(format!(
        "index {} out of range for {} vertices",
        bad,
        self.vertices.len()
      )));
    }
    if let Some(pos) = self.vertices.iter().position(|v| !v.is_finite()) {
      return Err(AsdfError::InvalidMesh(format!(
        "vertex {} is not finite",
        pos
      )));
    }
    Ok(())
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
