//! Dense rasterization of a field for previews.
//!
//! Each voxel center is sampled and the signed distance is mapped to an
//! alpha value: the surface sits at 0.5, a tenth of the volume extent
//! outside saturates at 1, the same distance inside at 0.
//!
//! Layout is x fastest, then y, then z; one z slice is rasterized per rayon
//! task.

use glam::Vec3;
use rayon::prelude::*;

use crate::field::DistanceField;
use crate::types::Aabb;

/// Fraction of the largest bounds extent mapped to the full alpha range.
const REMAP_BAND: f32 = 0.1;

const INSIDE_COLOR: [f32; 3] = [255.0, 112.0, 32.0];
const OUTSIDE_COLOR: [f32; 3] = [32.0, 144.0, 255.0];

/// Map a signed distance into [0, 1], 0.5 on the surface.
#[inline]
pub fn remap_distance(distance: f32, max_extent: f32) -> f32 {
  let band = REMAP_BAND * max_extent;
  if band <= 0.0 {
    return if distance < 0.0 { 0.0 } else { 1.0 };
  }
  (0.5 + 0.5 * distance / band).clamp(0.0, 1.0)
}

/// `resolution^3` alpha samples of a field over a box.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeTexture {
  resolution: usize,
  bounds: Aabb,
  alpha: Vec<f32>,
}

impl VolumeTexture {
  /// Sample `field` at the center of every voxel of `bounds`.
  ///
  /// Returns `None` for an empty field or a zero resolution.
  #[tracing::instrument(skip_all, name = "volume::rasterize", fields(resolution = resolution))]
  pub fn rasterize(field: &DistanceField, bounds: Aabb, resolution: usize) -> Option<Self> {
    if field.is_empty() || resolution == 0 {
      return None;
    }

    let max_extent = bounds.max_extent();
    let voxel = bounds.size() / resolution as f32;
    let slice_len = resolution * resolution;
    let mut alpha = vec![0.0f32; slice_len * resolution];

    alpha.par_chunks_mut(slice_len).enumerate().for_each(|(z, slice)| {
      for y in 0..resolution {
        for x in 0..resolution {
          let p = bounds.min + (Vec3::new(x as f32, y as f32, z as f32) + 0.5) * voxel;
          slice[y * resolution + x] = remap_distance(field.sample(p), max_extent);
        }
      }
    });

    tracing::debug!(samples = alpha.len(), "volume rasterized");
    Some(Self {
      resolution,
      bounds,
      alpha,
    })
  }

  pub fn resolution(&self) -> usize {
    self.resolution
  }

  pub fn bounds(&self) -> Aabb {
    self.bounds
  }

  /// All samples, x fastest.
  pub fn alpha(&self) -> &[f32] {
    &self.alpha
  }

  #[inline]
  pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
    (z * self.resolution + y) * self.resolution + x
  }

  /// Sample at voxel `(x, y, z)`.
  ///
  /// # Panics
  /// If any coordinate is `>= resolution`.
  #[inline]
  pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
    assert!(x < self.resolution && y < self.resolution && z < self.resolution);
    self.alpha[self.index(x, y, z)]
  }

  /// Model-space center of voxel `(x, y, z)`.
  pub fn voxel_center(&self, x: usize, y: usize, z: usize) -> Vec3 {
    let voxel = self.bounds.size() / self.resolution as f32;
    self.bounds.min + (Vec3::new(x as f32, y as f32, z as f32) + 0.5) * voxel
  }

  /// One z slice, `resolution^2` samples with x fastest.
  pub fn slice_z(&self, z: usize) -> &[f32] {
    let len = self.resolution * self.resolution;
    &self.alpha[z * len..(z + 1) * len]
  }

  /// RGBA8 pixels of the whole volume, slice after slice.
  ///
  /// Color blends from the inside to the outside tint with alpha; the
  /// alpha channel carries the remapped distance.
  pub fn to_rgba8(&self) -> Vec<u8> {
    let mut out = Vec::with_capacity(self.alpha.len() * 4);
    for &a in &self.alpha {
      for c in 0..3 {
        let v = INSIDE_COLOR[c] + (OUTSIDE_COLOR[c] - INSIDE_COLOR[c]) * a;
        out.push(v.round() as u8);
      }
      out.push((a * 255.0).round() as u8);
    }
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::octree::{build, BuildConfig};
  use crate::oracle::SphereOracle;

  fn sphere_volume(resolution: usize) -> Option<VolumeTexture> {
    let bounds = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    let config = BuildConfig::default().with_max_depth(4);
    let field = build(SphereOracle::new(0.8), Some(bounds), config);
    VolumeTexture::rasterize(&field, field.bounds(), resolution)
  }

  #[test]
  fn remap_is_two_sided() {
    assert_eq!(remap_distance(0.0, 10.0), 0.5);
    assert_eq!(remap_distance(1.0, 10.0), 1.0);
    assert_eq!(remap_distance(-1.0, 10.0), 0.0);
    assert_eq!(remap_distance(0.5, 10.0), 0.75);
    assert_eq!(remap_distance(-0.5, 10.0), 0.25);
    assert_eq!(remap_distance(5.0, 10.0), 1.0);
    assert_eq!(remap_distance(-5.0, 10.0), 0.0);
    assert_eq!(remap_distance(-0.1, 0.0), 0.0);
  }

  #[test]
  fn empty_field_or_zero_resolution() {
    let empty = DistanceField::empty(0.01, 3);
    assert!(VolumeTexture::rasterize(&empty, Aabb::default(), 8).is_none());
    assert!(sphere_volume(0).is_none());
  }

  #[test]
  fn layout_and_values() {
    let volume = sphere_volume(16).unwrap();
    assert_eq!(volume.alpha().len(), 16 * 16 * 16);
    assert_eq!(volume.index(1, 0, 0), 1);
    assert_eq!(volume.index(0, 1, 0), 16);
    assert_eq!(volume.index(0, 0, 1), 256);

    // Center inside, corners outside
    assert!(volume.get(8, 8, 8) < 0.5);
    assert!(volume.get(0, 0, 0) > 0.5);
    assert!(volume.get(15, 15, 15) > 0.5);
    assert!(volume.alpha().iter().all(|a| (0.0..=1.0).contains(a)));
  }

  #[test]
  fn slices_match_get() {
    let volume = sphere_volume(8).unwrap();
    let slice = volume.slice_z(3);
    assert_eq!(slice.len(), 64);
    assert_eq!(slice[2 * 8 + 5], volume.get(5, 2, 3));
  }

  #[test]
  fn voxel_centers_cover_bounds() {
    let volume = sphere_volume(4).unwrap();
    let b = volume.bounds();
    let step = b.size() / 4.0;
    assert!((volume.voxel_center(0, 0, 0) - (b.min + step * 0.5)).length() < 1e-5);
    assert!((volume.voxel_center(3, 3, 3) - (b.max - step * 0.5)).length() < 1e-5);
  }

  #[test]
  fn rgba_has_four_channels_per_voxel() {
    let volume = sphere_volume(4).unwrap();
    let rgba = volume.to_rgba8();
    assert_eq!(rgba.len(), 4 * 64);
    let i = volume.index(0, 0, 0) * 4;
    assert_eq!(rgba[i + 3], (volume.get(0, 0, 0) * 255.0).round() as u8);
  }
}
