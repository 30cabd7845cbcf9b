//! Sparse distance octree stored as a flat node array.
//!
//! Node 0 is the root. A subdivided node records the index of the first of
//! its 8 children, which always sit in one contiguous block. Leaves store -1.
//!
//! ```text
//! nodes: [root, c0 c1 c2 c3 c4 c5 c6 c7, c3.0 .. c3.7, ...]
//!          |     ^                        ^
//!          +-----+ first_child = 1        |
//!                  c3.first_child = 9 ----+
//! ```
//!
//! # Module Structure
//!
//! - [`node`]: `DfNode` - cube with 8 corner distances, trilinear sampling
//! - [`config`]: `BuildConfig` - error threshold, depth limit, yield interval
//! - [`build`]: `AsdfBuild` - breadth-first, error-driven construction
//! - [`query`]: root-to-leaf descent over a node slice

pub mod build;
pub mod config;
pub mod node;
pub mod query;

pub use build::{build, build_from_mesh, AsdfBuild, BuildProgress};
pub use config::BuildConfig;
pub use node::DfNode;
