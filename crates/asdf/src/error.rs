//! Error types for configuration, mesh validation and persistence.
//!
//! Build and query paths never fail: degenerate input degrades to an empty
//! field. Errors only surface at these boundaries.

use thiserror::Error;

/// Result type for fallible field operations.
pub type AsdfResult<T> = Result<T, AsdfError>;

/// Errors that can occur outside the build/query hot paths.
#[derive(Debug, Error)]
pub enum AsdfError {
  /// Reading or writing a persisted field failed.
  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  /// A persisted field could not be encoded or decoded.
  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  /// A persisted field was written by an incompatible format version.
  #[error("unsupported field format version {found} (expected {expected})")]
  UnsupportedVersion {
    /// Version found in the file.
    found: u32,
    /// Version this build reads and writes.
    expected: u32,
  },

  /// Build parameters are out of range.
  #[error("invalid build configuration: {0}")]
  InvalidConfig(String),

  /// Mesh indices or vertices are malformed.
  #[error("invalid mesh: {0}")]
  InvalidMesh(String),

  /// A node array violates the octree invariants.
  #[error("corrupt distance field: {0}")]
  CorruptField(String),
}
