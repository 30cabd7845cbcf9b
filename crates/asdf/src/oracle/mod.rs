//! Ground-truth signed distance providers.
//!
//! The builder only ever talks to a [`SurfaceOracle`]: given a point in model
//! space it returns the exact signed distance to the surface (negative
//! inside, positive outside). It is called tens of thousands of times per
//! build, so implementations should be backed by a spatial index.
//!
//! # Module Structure
//!
//! - [`mesh`]: `MeshOracle` - BVH-accelerated distance to a triangle mesh
//! - [`bvh`]: `TriangleBvh` - flat bounding volume hierarchy over triangles
//! - [`triangle`]: closest point on a triangle with barycentric weights
//! - [`normals`]: angle-weighted vertex normals used to resolve sign
//! - [`analytic`]: closed-form shapes for tests and benchmarks

pub mod analytic;
pub mod bvh;
pub mod mesh;
pub mod normals;
pub mod triangle;

use std::sync::Arc;

use glam::Vec3;

pub use analytic::{BoxOracle, PlaneOracle, SphereOracle};
pub use bvh::TriangleBvh;
pub use mesh::{MeshOracle, SurfaceHit};

/// Exact signed distance to a surface.
pub trait SurfaceOracle {
  /// Signed distance from `point` to the surface. Negative inside.
  fn signed_distance(&self, point: Vec3) -> f32;
}

impl<T: SurfaceOracle + ?Sized> SurfaceOracle for &T {
  #[inline]
  fn signed_distance(&self, point: Vec3) -> f32 {
    (**self).signed_distance(point)
  }
}

impl<T: SurfaceOracle + ?Sized> SurfaceOracle for Box<T> {
  #[inline]
  fn signed_distance(&self, point: Vec3) -> f32 {
    (**self).signed_distance(point)
  }
}

impl<T: SurfaceOracle + ?Sized> SurfaceOracle for Arc<T> {
  #[inline]
  fn signed_distance(&self, point: Vec3) -> f32 {
    (**self).signed_distance(point)
  }
}

/// Adapter turning a closure into an oracle.
#[derive(Clone)]
pub struct FnOracle<F>(pub F);

impl<F: Fn(Vec3) -> f32> SurfaceOracle for FnOracle<F> {
  #[inline]
  fn signed_distance(&self, point: Vec3) -> f32 {
    (self.0)(point)
  }
}
