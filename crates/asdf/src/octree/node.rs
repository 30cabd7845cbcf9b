//! DfNode - one octree cell with signed distances at its corners.

use std::ops::Range;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::{octant_index, CORNER_OFFSETS, NO_CHILD};
use crate::oracle::SurfaceOracle;
use crate::types::Aabb;

/// Axis-aligned cube with 8 corner distance samples.
///
/// Corner `i` sits at `center + CORNER_OFFSETS[i] * half_extent`. The same
/// 3-bit code names child octants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DfNode {
  /// Cube center in model space.
  pub center: Vec3,
  /// Half of the cube side length.
  pub half_extent: f32,
  /// Signed distance at each corner, in corner order.
  pub corner_distances: [f32; 8],
  /// Index of the first of 8 contiguous children, or -1 for a leaf.
  pub first_child: i32,
}

impl DfNode {
  /// Create a leaf with zeroed corner distances.
  pub fn new(center: Vec3, half_extent: f32) -> Self {
    Self {
      center,
      half_extent,
      corner_distances: [0.0; 8],
      first_child: NO_CHILD,
    }
  }

  /// Create a leaf and evaluate its corners against `oracle`.
  pub fn evaluated<O: SurfaceOracle + ?Sized>(center: Vec3, half_extent: f32, oracle: &O) -> Self {
    let mut node = Self::new(center, half_extent);
    node.evaluate_corners(oracle);
    node
  }

  /// Query the oracle at all 8 corners and store the results.
  pub fn evaluate_corners<O: SurfaceOracle + ?Sized>(&mut self, oracle: &O) {
    for (i, d) in self.corner_distances.iter_mut().enumerate() {
      *d = oracle.signed_distance(self.center + CORNER_OFFSETS[i] * self.half_extent);
    }
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.first_child < 0
  }

  /// Index range of the children block, `None` for a leaf.
  #[inline]
  pub fn children(&self) -> Option<Range<usize>> {
    if self.is_leaf() {
      None
    } else {
      let first = self.first_child as usize;
      Some(first..first + 8)
    }
  }

  #[inline]
  pub fn min(&self) -> Vec3 {
    self.center - Vec3::splat(self.half_extent)
  }

  #[inline]
  pub fn max(&self) -> Vec3 {
    self.center + Vec3::splat(self.half_extent)
  }

  #[inline]
  pub fn size(&self) -> f32 {
    self.half_extent * 2.0
  }

  pub fn bounds(&self) -> Aabb {
    Aabb::from_center_half_extents(self.center, Vec3::splat(self.half_extent))
  }

  /// Position of corner `i`.
  #[inline]
  pub fn corner(&self, i: usize) -> Vec3 {
    self.center + CORNER_OFFSETS[i] * self.half_extent
  }

  /// True if `point` is inside the cube (boundary inclusive).
  #[inline]
  pub fn contains(&self, point: Vec3) -> bool {
    let d = (point - self.center).abs();
    d.cmple(Vec3::splat(self.half_extent)).all()
  }

  /// Position of `point` inside the cube mapped to [0, 1]^3.
  ///
  /// Points outside the cube map outside [0, 1] and extrapolate.
  #[inline]
  pub fn normalized_pos(&self, point: Vec3) -> Vec3 {
    (point - self.min()) / self.size()
  }

  /// Trilinear interpolation of the corner distances at `point`.
  ///
  /// Pairs differing in z are blended first, then y, then x. Exact at the
  /// corners.
  #[inline]
  pub fn sample(&self, point: Vec3) -> f32 {
    let t = self.normalized_pos(point);
    let d = &self.corner_distances;

    let x0y0 = lerp(d[0], d[1], t.z);
    let x0y1 = lerp(d[2], d[3], t.z);
    let x1y0 = lerp(d[4], d[5], t.z);
    let x1y1 = lerp(d[6], d[7], t.z);

    let x0 = lerp(x0y0, x0y1, t.y);
    let x1 = lerp(x1y0, x1y1, t.y);

    lerp(x0, x1, t.x)
  }

  /// Octant of `point` relative to the center (strictly greater sets a bit).
  #[inline]
  pub fn get_octant(&self, point: Vec3) -> usize {
    octant_index(
      point.x > self.center.x,
      point.y > self.center.y,
      point.z > self.center.z,
    )
  }

  /// Geometry of the child in `octant`, corners not yet evaluated.
  #[inline]
  pub fn child(&self, octant: usize) -> Self {
    let quarter = self.half_extent * 0.5;
    Self::new(self.center + CORNER_OFFSETS[octant] * quarter, quarter)
  }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
  a * (1.0 - t) + b * t
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
