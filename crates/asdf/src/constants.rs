//! Fixed tables and build constants.
//!
//! # Corner / octant convention
//!
//! Corners and octants share one 3-bit code. Each bit is the sign of the
//! offset from the node center along one axis:
//!
//! ```text
//!   bit 2 (4): +X      index = 4*x + 2*y + z
//!   bit 1 (2): +Y
//!   bit 0 (1): +Z      0 = (-,-,-) ... 7 = (+,+,+)
//! ```
//!
//! This order is persisted with every node and must never change.

use glam::Vec3;

/// Corner directions in storage order (see module docs).
pub const CORNER_OFFSETS: [Vec3; 8] = [
  Vec3::new(-1.0, -1.0, -1.0),
  Vec3::new(-1.0, -1.0, 1.0),
  Vec3::new(-1.0, 1.0, -1.0),
  Vec3::new(-1.0, 1.0, 1.0),
  Vec3::new(1.0, -1.0, -1.0),
  Vec3::new(1.0, -1.0, 1.0),
  Vec3::new(1.0, 1.0, -1.0),
  Vec3::new(1.0, 1.0, 1.0),
];

/// Octant bit for the +X half.
pub const OCTANT_X: usize = 4;
/// Octant bit for the +Y half.
pub const OCTANT_Y: usize = 2;
/// Octant bit for the +Z half.
pub const OCTANT_Z: usize = 1;

/// Error-estimation constellation, in units of the node half-extent:
/// center, 6 face midpoints, 12 edge midpoints.
pub const SAMPLE_OFFSETS: [Vec3; 19] = [
  // Center
  Vec3::new(0.0, 0.0, 0.0),
  // Faces
  Vec3::new(-1.0, 0.0, 0.0),
  Vec3::new(1.0, 0.0, 0.0),
  Vec3::new(0.0, -1.0, 0.0),
  Vec3::new(0.0, 1.0, 0.0),
  Vec3::new(0.0, 0.0, -1.0),
  Vec3::new(0.0, 0.0, 1.0),
  // Edges parallel to Z
  Vec3::new(-1.0, -1.0, 0.0),
  Vec3::new(-1.0, 1.0, 0.0),
  Vec3::new(1.0, -1.0, 0.0),
  Vec3::new(1.0, 1.0, 0.0),
  // Edges parallel to Y
  Vec3::new(-1.0, 0.0, -1.0),
  Vec3::new(-1.0, 0.0, 1.0),
  Vec3::new(1.0, 0.0, -1.0),
  Vec3::new(1.0, 0.0, 1.0),
  // Edges parallel to X
  Vec3::new(0.0, -1.0, -1.0),
  Vec3::new(0.0, -1.0, 1.0),
  Vec3::new(0.0, 1.0, -1.0),
  Vec3::new(0.0, 1.0, 1.0),
];

/// Growth applied to the mesh bounds before the root cube is fitted.
/// Bounds-expand semantics: the size grows by this amount, each side by half.
pub const BOUNDS_PADDING: f32 = 0.2;

/// Nodes processed between two progress ticks.
pub const DEFAULT_YIELD_INTERVAL: usize = 32;

/// Deepest supported octree level.
pub const MAX_DEPTH: i32 = 8;

/// Half-diagonal of a unit cube.
pub const SQRT_3: f32 = 1.732_050_8;

/// Marker stored in `first_child` for leaves.
pub const NO_CHILD: i32 = -1;

/// Compose a corner/octant index from per-axis "positive side" flags.
#[inline]
pub const fn octant_index(pos_x: bool, pos_y: bool, pos_z: bool) -> usize {
  (pos_x as usize) * OCTANT_X + (pos_y as usize) * OCTANT_Y + (pos_z as usize) * OCTANT_Z
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
