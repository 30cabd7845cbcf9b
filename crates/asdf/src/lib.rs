//! asdf - Adaptive sparse distance fields for triangle meshes
//!
//! Converts a triangle mesh into a compact, queryable signed distance volume.
//! The field is an octree stored as a flat node array: every node is a cube
//! with 8 signed distance samples at its corners, and queries descend from
//! the root to a leaf and trilinearly interpolate its corners.
//!
//! # Features
//!
//! - **Error-driven construction**: nodes near the surface are subdivided
//!   only while the trilinear reconstruction error exceeds a threshold
//! - **Flat node array**: index-based children (blocks of 8), trivially
//!   serializable and cache friendly
//! - **Cooperative builds**: the builder is an iterator that yields progress
//!   every few nodes and can be cancelled between ticks
//! - **Mesh oracle**: BVH-accelerated exact signed distance to a mesh with
//!   angle-weighted normals for sign
//!
//! # Example
//!
//! ```ignore
//! use asdf::{shapes, BuildConfig, DistanceFieldAsset};
//!
//! let mut asset = DistanceFieldAsset::with_mesh(shapes::uv_sphere(1.0, 32, 16));
//! asset.set_max_depth(5);
//!
//! for tick in asset.generate() {
//!     println!("{} ({:.0}%)", tick.message, tick.progress * 100.0);
//! }
//!
//! let inside = asset.sample(glam::Vec3::ZERO) < 0.0;
//! ```

pub mod constants;
pub mod error;
pub mod types;

pub use constants::{BOUNDS_PADDING, CORNER_OFFSETS, MAX_DEPTH, SAMPLE_OFFSETS};
pub use error::{AsdfError, AsdfResult};
pub use types::{Aabb, TriangleMesh};

// Octree node model, builder and queries
pub mod octree;
pub use octree::{AsdfBuild, BuildConfig, BuildProgress, DfNode};

// Ground-truth signed distance providers
pub mod oracle;
pub use oracle::{MeshOracle, SurfaceOracle};

// Immutable build result
pub mod field;
pub use field::{DistanceField, FieldStats};

// Asset-level orchestration
pub mod asset;
pub use asset::{DistanceFieldAsset, Generation};

// Background builds with cooperative cancellation
pub mod async_build;
pub use async_build::{AsyncBuild, CancelToken};

// Batch baking of independent assets
pub mod task_queue;
pub use task_queue::{BakeCompletion, BakeRequest, BakeStage};

pub mod metrics;
pub mod persist;
pub mod shapes;
pub mod volume;
pub use persist::{PersistedField, FORMAT_VERSION};
pub use volume::VolumeTexture;
