//! DistanceFieldAsset - a mesh, its build parameters and the field built
//! from them.
//!
//! The asset references its mesh through an `Arc` and publishes the built
//! field as an `Arc<DistanceField>` snapshot. Regenerating swaps the
//! snapshot; readers holding the old one are unaffected.

use std::sync::Arc;

use crate::async_build::{AsyncBuild, CancelToken};
use crate::field::{DistanceField, FieldStats};
use crate::octree::{AsdfBuild, BuildConfig, BuildProgress};
use crate::oracle::MeshOracle;
use crate::types::{Aabb, TriangleMesh};
use crate::volume::VolumeTexture;

/// Mesh-backed signed distance field asset.
#[derive(Clone, Debug, Default)]
pub struct DistanceFieldAsset {
  config: BuildConfig,
  input_mesh: Option<Arc<TriangleMesh>>,
  bounds: Aabb,
  field: Option<Arc<DistanceField>>,
}

impl DistanceFieldAsset {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_mesh(mesh: impl Into<Arc<TriangleMesh>>) -> Self {
    let mut asset = Self::new();
    asset.set_input_mesh(Some(mesh.into()));
    asset
  }

  pub fn with_config(mut self, config: BuildConfig) -> Self {
    self.config = config;
    self
  }

  pub fn input_mesh(&self) -> Option<&Arc<TriangleMesh>> {
    self.input_mesh.as_ref()
  }

  /// Replace the mesh. Drops the current field.
  pub fn set_input_mesh(&mut self, mesh: Option<Arc<TriangleMesh>>) {
    self.input_mesh = mesh;
    self.reset();
  }

  pub fn config(&self) -> &BuildConfig {
    &self.config
  }

  pub fn set_config(&mut self, config: BuildConfig) {
    self.config = config;
  }

  pub fn max_error(&self) -> f32 {
    self.config.max_error
  }

  pub fn set_max_error(&mut self, max_error: f32) {
    self.config.max_error = max_error;
  }

  pub fn max_depth(&self) -> i32 {
    self.config.max_depth
  }

  pub fn set_max_depth(&mut self, max_depth: i32) {
    self.config.max_depth = max_depth;
  }

  /// Drop the field and refit `bounds` to the mesh, if any.
  pub fn reset(&mut self) {
    self.field = None;
    if let Some(bounds) = self.input_mesh.as_ref().and_then(|m| m.bounds()) {
      self.bounds = bounds;
    }
  }

  /// Start a full rebuild. Returns an iterator of progress ticks.
  ///
  /// Draining the iterator commits a complete field. Dropping it early
  /// commits what was built so far, flagged incomplete. Without a mesh, or
  /// with a configuration that fails validation, nothing is built.
  pub fn generate(&mut self) -> Generation<'_> {
    self.reset();

    let build = match (&self.input_mesh, self.config.validate()) {
      (Some(mesh), Ok(())) => Some(AsdfBuild::from_mesh(Arc::clone(mesh), self.config.clone())),
      (Some(_), Err(err)) => {
        tracing::warn!(%err, "distance field generation skipped");
        None
      }
      (None, _) => None,
    };

    Generation { asset: self, build }
  }

  /// Rebuild to completion on the calling thread.
  pub fn generate_blocking(&mut self) -> Option<Arc<DistanceField>> {
    for _ in self.generate() {}
    self.field()
  }

  /// Rebuild, reporting every tick and checking `cancel` after each.
  ///
  /// Returns true if the committed field is complete.
  pub fn generate_with<F>(&mut self, cancel: &CancelToken, mut on_progress: F) -> bool
  where
    F: FnMut(&BuildProgress),
  {
    let mut generation = self.generate();
    for tick in generation.by_ref() {
      on_progress(&tick);
      if cancel.is_cancelled() {
        break;
      }
    }
    drop(generation);
    self.is_complete()
  }

  /// Start a rebuild of the current mesh on the thread pool.
  ///
  /// The asset is not touched; hand the result to
  /// [`apply_field`](Self::apply_field). `None` without a mesh or with an
  /// invalid configuration.
  pub fn spawn_generate(&self, cancel: CancelToken) -> Option<AsyncBuild> {
    let mesh = self.input_mesh.as_ref()?;
    if let Err(err) = self.config.validate() {
      tracing::warn!(%err, "background generation skipped");
      return None;
    }
    Some(AsyncBuild::spawn_mesh(Arc::clone(mesh), self.config.clone(), cancel))
  }

  /// Publish a built field. Bounds become the field's root cube.
  pub fn apply_field(&mut self, field: DistanceField) {
    if !field.is_empty() {
      self.bounds = field.bounds();
    }
    self.field = Some(Arc::new(field));
  }

  /// Current field snapshot.
  pub fn field(&self) -> Option<Arc<DistanceField>> {
    self.field.clone()
  }

  /// True if a field with at least one node is present.
  pub fn is_initialized(&self) -> bool {
    self.field.as_ref().is_some_and(|f| !f.is_empty())
  }

  /// True if the present field finished building.
  pub fn is_complete(&self) -> bool {
    self.field.as_ref().is_some_and(|f| f.is_complete())
  }

  /// Signed distance at `point`, 0 without a usable field.
  pub fn sample(&self, point: glam::Vec3) -> f32 {
    self.field.as_ref().map_or(0.0, |f| f.sample(point))
  }

  /// Rasterize the field over `bounds`. `None` before generation.
  pub fn volume_texture(&self, resolution: usize) -> Option<VolumeTexture> {
    let field = self.field.as_ref()?;
    VolumeTexture::rasterize(field, self.bounds, resolution)
  }

  pub fn stats(&self) -> FieldStats {
    self.field.as_ref().map(|f| f.stats()).unwrap_or_default()
  }

  /// Mesh bounds before generation, the field's root cube after.
  pub fn bounds(&self) -> Aabb {
    self.bounds
  }

  /// Side of the smallest node, 0 without a field.
  pub fn min_node_size(&self) -> f32 {
    self.field.as_ref().map_or(0.0, |f| f.min_node_size())
  }
}

/// In-progress rebuild of a [`DistanceFieldAsset`].
///
/// The field is committed when the iterator is exhausted or dropped.
pub struct Generation<'a> {
  asset: &'a mut DistanceFieldAsset,
  build: Option<AsdfBuild<MeshOracle>>,
}

impl Generation<'_> {
  /// Stop now and commit the partial field.
  pub fn cancel(mut self) {
    self.commit();
  }

  fn commit(&mut self) {
    if let Some(build) = self.build.take() {
      let field = build.cancel();
      self.asset.apply_field(field);
    }
  }
}

impl Iterator for Generation<'_> {
  type Item = BuildProgress;

  fn next(&mut self) -> Option<BuildProgress> {
    let tick = self.build.as_mut()?.next();
    if tick.is_none() {
      self.commit();
    }
    tick
  }
}

impl Drop for Generation<'_> {
  fn drop(&mut self) {
    self.commit();
  }
}

#[cfg(test)]
#[path = "asset_test.rs"]
mod asset_test;
