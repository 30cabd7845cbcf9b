//! Slice atlas previews of rasterized fields.
//!
//! Layout: z slices are tiled left to right, top to bottom, in a square-ish
//! grid. Each tile is `resolution x resolution` pixels with x to the right
//! and y up (row 0 of a tile is the highest y).

use std::path::Path;

use anyhow::{Context, Result};
use asdf::VolumeTexture;
use image::{ImageBuffer, Rgba, RgbaImage};

/// Tiles per atlas row for a volume with `slices` z slices.
pub fn atlas_columns(slices: usize) -> usize {
	let mut cols = 1;
	while cols * cols < slices {
		cols += 1;
	}
	cols
}

/// Build the slice atlas image.
pub fn slice_atlas(volume: &VolumeTexture) -> RgbaImage {
	let res = volume.resolution();
	let cols = atlas_columns(res);
	let rows = res.div_ceil(cols);
	let pixels = volume.to_rgba8();

	let mut atlas: RgbaImage = ImageBuffer::new((cols * res) as u32, (rows * res) as u32);
	for z in 0..res {
		let tile_x = (z % cols) * res;
		let tile_y = (z / cols) * res;
		for y in 0..res {
			for x in 0..res {
				let i = volume.index(x, y, z) * 4;
				let px = Rgba([pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]);
				atlas.put_pixel((tile_x + x) as u32, (tile_y + res - 1 - y) as u32, px);
			}
		}
	}
	atlas
}

/// Write the slice atlas as PNG.
pub fn save_slice_atlas(volume: &VolumeTexture, path: &Path) -> Result<()> {
	slice_atlas(volume)
		.save(path)
		.with_context(|| format!("Failed to save preview: {}", path.display()))
}
