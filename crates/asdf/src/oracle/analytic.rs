//! Closed-form signed distance oracles.
//!
//! Exact distances that are easy to verify. Use them to test the builder and
//! queries without mesh indexing in the loop.

use glam::Vec3;

use super::SurfaceOracle;

/// Sphere oracle.
///
/// SDF: `|p - center| - radius`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereOracle {
  pub center: Vec3,
  pub radius: f32,
}

impl Default for SphereOracle {
  fn default() -> Self {
    Self {
      center: Vec3::ZERO,
      radius: 1.0,
    }
  }
}

impl SphereOracle {
  pub fn new(radius: f32) -> Self {
    Self {
      center: Vec3::ZERO,
      radius,
    }
  }

  pub fn with_center(mut self, center: Vec3) -> Self {
    self.center = center;
    self
  }
}

impl SurfaceOracle for SphereOracle {
  #[inline]
  fn signed_distance(&self, point: Vec3) -> f32 {
    (point - self.center).length() - self.radius
  }
}

/// Axis-aligned box oracle.
///
/// Exact inside and outside, including the rounded distance field beyond
/// edges and corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxOracle {
  pub center: Vec3,
  pub half_extents: Vec3,
}

impl Default for BoxOracle {
  fn default() -> Self {
    Self {
      center: Vec3::ZERO,
      half_extents: Vec3::splat(0.5),
    }
  }
}

impl BoxOracle {
  pub fn new(half_extents: Vec3) -> Self {
    Self {
      center: Vec3::ZERO,
      half_extents,
    }
  }

  /// Cube with the given half side length.
  pub fn cube(half_extent: f32) -> Self {
    Self::new(Vec3::splat(half_extent))
  }

  pub fn with_center(mut self, center: Vec3) -> Self {
    self.center = center;
    self
  }
}

impl SurfaceOracle for BoxOracle {
  #[inline]
  fn signed_distance(&self, point: Vec3) -> f32 {
    let q = (point - self.center).abs() - self.half_extents;
    let outside = q.max(Vec3::ZERO).length();
    let inside = q.max_element().min(0.0);
    outside + inside
  }
}

/// Plane oracle: positive on the side the normal points to.
///
/// SDF: `dot(p, normal) - offset`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneOracle {
  /// Unit normal.
  pub normal: Vec3,
  /// Distance of the plane from the origin along `normal`.
  pub offset: f32,
}

impl Default for PlaneOracle {
  fn default() -> Self {
    Self {
      normal: Vec3::Y,
      offset: 0.0,
    }
  }
}

impl PlaneOracle {
  /// `normal` is normalized; a zero normal falls back to +Y.
  pub fn new(normal: Vec3, offset: f32) -> Self {
    let normal = normal.try_normalize().unwrap_or(Vec3::Y);
    Self { normal, offset }
  }

  /// Horizontal ground plane at `height`.
  pub fn ground(height: f32) -> Self {
    Self::new(Vec3::Y, height)
  }
}

impl SurfaceOracle for PlaneOracle {
  #[inline]
  fn signed_distance(&self, point: Vec3) -> f32 {
    point.dot(self.normal) - self.offset
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sphere_distances() {
    let s = SphereOracle::new(2.0).with_center(Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(s.signed_distance(Vec3::new(1.0, 0.0, 0.0)), -2.0);
    assert_eq!(s.signed_distance(Vec3::new(4.0, 0.0, 0.0)), 1.0);
    assert!(s.signed_distance(Vec3::new(1.0, 2.0, 0.0)).abs() < 1e-6);
  }

  #[test]
  fn box_inside_face_edge_corner() {
    let b = BoxOracle::cube(1.0);
    assert_eq!(b.signed_distance(Vec3::ZERO), -1.0);
    assert_eq!(b.signed_distance(Vec3::new(0.5, 0.0, 0.0)), -0.5);
    assert_eq!(b.signed_distance(Vec3::new(3.0, 0.0, 0.0)), 2.0);
    // Beyond an edge: distance to the edge line
    let d = b.signed_distance(Vec3::new(2.0, 2.0, 0.0));
    assert!((d - 2.0_f32.sqrt()).abs() < 1e-6);
    // Beyond a corner
    let d = b.signed_distance(Vec3::splat(2.0));
    assert!((d - 3.0_f32.sqrt()).abs() < 1e-6);
  }

  #[test]
  fn plane_sign_follows_normal() {
    let p = PlaneOracle::new(Vec3::new(0.0, 2.0, 0.0), 1.0);
    assert_eq!(p.normal, Vec3::Y);
    assert_eq!(p.signed_distance(Vec3::new(5.0, 3.0, -2.0)), 2.0);
    assert_eq!(p.signed_distance(Vec3::ZERO), -1.0);

    let fallback = PlaneOracle::new(Vec3::ZERO, 0.0);
    assert_eq!(fallback.normal, Vec3::Y);
  }
}
